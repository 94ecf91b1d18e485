//! Naming template parsing and rendering.
//!
//! A template is a single path segment with `{placeholder}` holes, for example
//! `Chapter {chapter:03} - {title}`. `{{` and `}}` stand for literal braces.
//! Numeric placeholders accept a zero-padding width (`{page:03}`).

use std::collections::HashSet;
use std::fmt;

use super::{FieldKind, FieldSet, FieldValue, Level, Matcher, Placeholder, TemplateError};

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Field {
        placeholder: Placeholder,
        width: Option<usize>,
    },
}

/// An immutable, validated naming template for one level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTemplate {
    level: Level,
    source: String,
    segments: Vec<Segment>,
}

impl NamingTemplate {
    /// Parses and validates a template for the given level.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] for unbalanced braces, unsupported
    /// format specs, or path separators outside the root level;
    /// [`TemplateError::UnknownPlaceholder`] for placeholders outside the level's
    /// vocabulary; [`TemplateError::DuplicatePlaceholder`] when a placeholder
    /// repeats.
    pub fn parse(level: Level, source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let segments = parse_segments(level, &source)?;
        Ok(Self {
            level,
            source,
            segments,
        })
    }

    /// Returns the level this template names.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the template source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Iterates over the placeholders the template references, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field { placeholder, .. } => Some(*placeholder),
            Segment::Literal(_) => None,
        })
    }

    /// Returns `true` if the template references `placeholder`.
    #[must_use]
    pub fn references(&self, placeholder: Placeholder) -> bool {
        self.placeholders().any(|p| p == placeholder)
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Renders the template into a concrete path segment.
    ///
    /// Values for placeholders the template does not reference are ignored.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::TemplateFieldMissing`] if a referenced placeholder has no value
    /// - [`TemplateError::FieldKindMismatch`] if a value has the wrong kind
    /// - [`TemplateError::InvalidFieldValue`] if a text value contains a path
    ///   separator or control character, or the result is not a usable segment
    pub fn render(&self, fields: &FieldSet) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { placeholder, width } => {
                    let value = fields.get(*placeholder).ok_or_else(|| {
                        TemplateError::TemplateFieldMissing {
                            name: placeholder.name(),
                            template: self.source.clone(),
                        }
                    })?;
                    match (placeholder.kind(), value) {
                        (FieldKind::Text, FieldValue::Text(text)) => {
                            validate_text_value(text)?;
                            out.push_str(text);
                        }
                        (FieldKind::Numeric, FieldValue::Numeric(key)) => match width {
                            Some(width) => out.push_str(&key.padded(*width)),
                            None => out.push_str(key.as_str()),
                        },
                        (expected, _) => {
                            return Err(TemplateError::FieldKindMismatch {
                                name: placeholder.name(),
                                expected: expected.as_str(),
                            });
                        }
                    }
                }
            }
        }

        if self.level != Level::Root {
            validate_rendered_segment(&out)?;
        }
        Ok(out)
    }

    /// Derives a [`Matcher`] that recognizes segments rendered by this template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Pattern`] if the derived pattern fails to compile.
    pub fn derive_matcher(&self) -> Result<Matcher, TemplateError> {
        Matcher::derive(self)
    }
}

impl fmt::Display for NamingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segments(level: Level, source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut seen = HashSet::new();
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(TemplateError::syntax(source, "unmatched '}'")),
            '{' => {
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => {
                            return Err(TemplateError::syntax(source, "nested '{' in placeholder"));
                        }
                        Some(c) => inner.push(c),
                        None => return Err(TemplateError::syntax(source, "unclosed '{'")),
                    }
                }
                let field = parse_field(level, source, &inner)?;
                if let Segment::Field { placeholder, .. } = &field
                    && !seen.insert(*placeholder)
                {
                    return Err(TemplateError::DuplicatePlaceholder {
                        name: placeholder.name().to_string(),
                        template: source.to_string(),
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(field);
            }
            '/' | '\\' if level != Level::Root => {
                return Err(TemplateError::syntax(
                    source,
                    "path separators are not allowed in a segment template",
                ));
            }
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_field(level: Level, source: &str, inner: &str) -> Result<Segment, TemplateError> {
    let (name, spec) = match inner.split_once(':') {
        Some((name, spec)) => (name.trim(), Some(spec.trim())),
        None => (inner.trim(), None),
    };
    if name.is_empty() {
        return Err(TemplateError::syntax(source, "empty placeholder name"));
    }

    let placeholder = Placeholder::from_name(name)
        .filter(|p| level.placeholders().contains(p))
        .ok_or_else(|| TemplateError::UnknownPlaceholder {
            name: name.to_string(),
            level,
            template: source.to_string(),
        })?;

    let width = match spec {
        None => None,
        Some(spec) => {
            if placeholder.kind() != FieldKind::Numeric {
                return Err(TemplateError::syntax(
                    source,
                    format!("format spec on text placeholder {placeholder}"),
                ));
            }
            let digits = spec.strip_prefix('0').filter(|d| {
                !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit())
            });
            let width = digits.and_then(|d| d.parse::<usize>().ok()).ok_or_else(|| {
                TemplateError::syntax(source, format!("unsupported format spec {spec:?}"))
            })?;
            Some(width)
        }
    };

    Ok(Segment::Field { placeholder, width })
}

fn validate_text_value(value: &str) -> Result<(), TemplateError> {
    if value.contains(['/', '\\']) {
        return Err(TemplateError::invalid_value(value, "contains a path separator"));
    }
    if value.chars().any(char::is_control) {
        return Err(TemplateError::invalid_value(value, "contains a control character"));
    }
    Ok(())
}

fn validate_rendered_segment(segment: &str) -> Result<(), TemplateError> {
    match segment {
        "" => Err(TemplateError::invalid_value(segment, "rendered segment is empty")),
        "." | ".." => Err(TemplateError::invalid_value(segment, "rendered segment is a relative path component")),
        _ => Ok(()),
    }
}

/// Makes free text safe to use as a text placeholder value.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters) with `_` and trims surrounding
/// whitespace. Brackets and parentheses are preserved.
#[must_use]
pub fn sanitize_segment(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = sanitized.trim();

    match trimmed {
        "" => "_".to_string(),
        "." | ".." => trimmed.replace('.', "_"),
        _ => trimmed.to_string(),
    }
}
