//! Matchers: the reverse of rendering.
//!
//! A [`Matcher`] is a regular expression derived from a [`NamingTemplate`]
//! with one named capture group per placeholder, anchored to a whole path
//! segment. Literal template text is escaped before capture groups are
//! inserted, so a template such as `[Chapter {chapter}]` matches its brackets
//! literally.

use std::fmt;

use regex::Regex;
use tracing::trace;

use super::naming::Segment;
use super::{FieldKind, FieldSet, FieldValue, NamingTemplate, Placeholder, TemplateError};

// ASCII only, the digits `NumericKey` parses.
const NUMERIC_PATTERN: &str = r"[0-9]+(?:\.[0-9]+)?";

/// A compiled recognizer that extracts field values from a path segment.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    fields: Vec<Placeholder>,
}

impl Matcher {
    pub(crate) fn derive(template: &NamingTemplate) -> Result<Self, TemplateError> {
        let segments = template.segments();
        let mut pattern = String::from("^");
        for (idx, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Field { placeholder, .. } => {
                    let name = placeholder.name();
                    let capture = match placeholder.kind() {
                        FieldKind::Numeric => NUMERIC_PATTERN,
                        // Lazy when another placeholder follows, so text cannot
                        // swallow the next field.
                        FieldKind::Text
                            if segments[idx + 1..]
                                .iter()
                                .any(|s| matches!(s, Segment::Field { .. })) =>
                        {
                            ".+?"
                        }
                        FieldKind::Text => ".+",
                    };
                    pattern.push_str(&format!("(?P<{name}>{capture})"));
                }
            }
        }
        pattern.push('$');
        Self::from_pattern(&pattern)
    }

    /// Compiles a matcher from a serialized pattern (as stored in a layout sidecar).
    ///
    /// Capture groups whose names are not in the placeholder vocabulary are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Pattern`] if the pattern is not a valid regex.
    pub fn from_pattern(pattern: &str) -> Result<Self, TemplateError> {
        let regex = Regex::new(pattern).map_err(|source| TemplateError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let fields = regex
            .capture_names()
            .flatten()
            .filter_map(Placeholder::from_name)
            .collect();
        Ok(Self { regex, fields })
    }

    /// Returns the pattern source, suitable for persisting.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the placeholders this matcher captures.
    #[must_use]
    pub fn fields(&self) -> &[Placeholder] {
        &self.fields
    }

    /// Extracts field values from a path segment.
    ///
    /// Returns `None` when the segment does not conform to the template. This
    /// is the expected outcome for unrelated directory entries, not an error.
    #[must_use]
    pub fn extract(&self, segment: &str) -> Option<FieldSet> {
        let captures = self.regex.captures(segment)?;
        let mut fields = FieldSet::new();
        for placeholder in &self.fields {
            let Some(text) = captures.name(placeholder.name()) else {
                continue;
            };
            let value = match placeholder.kind() {
                FieldKind::Text => FieldValue::Text(text.as_str().to_string()),
                FieldKind::Numeric => match text.as_str().parse() {
                    Ok(key) => FieldValue::Numeric(key),
                    Err(_) => {
                        trace!(segment, field = placeholder.name(), "captured value is not numeric");
                        return None;
                    }
                },
            };
            fields.insert(*placeholder, value);
        }
        Some(fields)
    }

    /// Returns `true` if the segment conforms to the template.
    #[must_use]
    pub fn is_match(&self, segment: &str) -> bool {
        self.regex.is_match(segment)
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Matcher {}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::template::{Level, NumericKey};

    fn num(s: &str) -> NumericKey {
        s.parse().unwrap()
    }

    fn round_trip(level: Level, source: &str, fields: &FieldSet) -> FieldSet {
        let template = NamingTemplate::parse(level, source).unwrap();
        let rendered = template.render(fields).unwrap();
        template
            .derive_matcher()
            .unwrap()
            .extract(&rendered)
            .unwrap_or_else(|| panic!("{rendered:?} should match {source:?}"))
    }

    #[test]
    fn test_round_trip_chapter_with_brackets_in_title() {
        let fields = FieldSet::new()
            .with_number(Placeholder::Chapter, num("3"))
            .with_text(Placeholder::Title, "[Oneshot] The (Lost) Chapter");
        let extracted = round_trip(Level::Chapter, "Chapter {chapter} - {title}", &fields);
        assert_eq!(extracted, fields);
    }

    #[test]
    fn test_round_trip_literal_brackets_in_template() {
        let fields = FieldSet::new()
            .with_number(Placeholder::Chapter, num("3"))
            .with_text(Placeholder::Title, "Start");
        let extracted = round_trip(Level::Chapter, "[Chapter {chapter}] ({title})", &fields);
        assert_eq!(extracted, fields);
    }

    #[test]
    fn test_round_trip_title_before_chapter() {
        let fields = FieldSet::new()
            .with_text(Placeholder::Title, "Arc 2 - Finale")
            .with_number(Placeholder::Chapter, num("12"));
        let extracted = round_trip(Level::Chapter, "{title} #{chapter}", &fields);
        assert_eq!(extracted, fields);
    }

    #[test]
    fn test_round_trip_fullwidth_digit_stays_in_title() {
        let fields = FieldSet::new()
            .with_text(Placeholder::Title, "Vol\u{ff13}")
            .with_number(Placeholder::Chapter, num("4"));
        let extracted = round_trip(Level::Chapter, "{title}{chapter}", &fields);
        assert_eq!(extracted, fields);
    }

    #[test]
    fn test_round_trip_fractional_chapter() {
        let fields = FieldSet::new()
            .with_number(Placeholder::Chapter, num("10.5"))
            .with_text(Placeholder::Title, "Bonus");
        let extracted = round_trip(Level::Chapter, "{chapter} {title}", &fields);
        let chapter = extracted.number(Placeholder::Chapter).unwrap();
        assert!((chapter.as_f64() - 10.5).abs() < f64::EPSILON);
        assert!(num("10") < *chapter && *chapter < num("11"));
    }

    #[test]
    fn test_round_trip_padded_page_is_numerically_equal() {
        let fields = FieldSet::new()
            .with_number(Placeholder::Page, NumericKey::from_index(7))
            .with_text(Placeholder::Ext, "jpg");
        let extracted = round_trip(Level::Page, "{page:03}.{ext}", &fields);
        assert_eq!(extracted.number(Placeholder::Page).unwrap().as_str(), "007");
        assert!(extracted.equivalent(&fields));
    }

    #[test]
    fn test_round_trip_fractional_page_with_extension() {
        let fields = FieldSet::new()
            .with_number(Placeholder::Page, num("3.5"))
            .with_text(Placeholder::Ext, "png");
        let extracted = round_trip(Level::Page, "{page}.{ext}", &fields);
        assert_eq!(extracted, fields);
    }

    #[test]
    fn test_round_trip_regex_metacharacters_in_literals() {
        let fields = FieldSet::new().with_number(Placeholder::Volume, num("4"));
        let extracted = round_trip(Level::Volume, "Vol.+*?^$|{{{volume}}}", &fields);
        assert_eq!(extracted, fields);
    }

    #[test]
    fn test_extract_rejects_unrelated_segments() {
        let template = NamingTemplate::parse(Level::Chapter, "Chapter {chapter} - {title}").unwrap();
        let matcher = template.derive_matcher().unwrap();
        assert!(matcher.extract("Extras").is_none());
        assert!(matcher.extract("Chapter ten - Words").is_none());
        // Anchored: a conforming segment embedded in a longer name is rejected.
        assert!(matcher.extract("old Chapter 1 - Intro").is_none());
        assert!(!matcher.is_match("Chapter 1 -"));
    }

    #[test]
    fn test_literal_dot_is_not_a_wildcard() {
        let template = NamingTemplate::parse(Level::Volume, "v.{volume}").unwrap();
        let matcher = template.derive_matcher().unwrap();
        assert!(matcher.is_match("v.1"));
        assert!(!matcher.is_match("vX1"));
    }

    #[test]
    fn test_from_pattern_round_trips_source() {
        let template = NamingTemplate::parse(Level::Page, "{page}.{ext}").unwrap();
        let derived = template.derive_matcher().unwrap();
        let restored = Matcher::from_pattern(derived.as_str()).unwrap();
        assert_eq!(restored, derived);
        assert_eq!(restored.fields(), &[Placeholder::Page, Placeholder::Ext]);
    }

    #[test]
    fn test_from_pattern_rejects_invalid_regex() {
        assert!(matches!(
            Matcher::from_pattern("(?P<page>"),
            Err(TemplateError::Pattern { .. })
        ));
    }
}
