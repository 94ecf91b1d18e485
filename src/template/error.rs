//! Error types for the template module.
//!
//! Template errors describe misuse of a naming template: bad syntax,
//! placeholders outside the level's vocabulary, or missing field values.
//! A matcher that does not recognize a path segment is not an error; see
//! [`Matcher::extract`](super::Matcher::extract).

use thiserror::Error;

use super::Level;

/// Errors that can occur while parsing, rendering, or compiling a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template string is malformed (unbalanced braces, bad format spec).
    #[error("invalid template {template:?}: {reason}")]
    Syntax {
        /// The offending template source.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The template names a placeholder that is not valid at its level.
    #[error("unknown placeholder {{{name}}} in {level} template {template:?}")]
    UnknownPlaceholder {
        /// The placeholder name as written.
        name: String,
        /// The level the template belongs to.
        level: Level,
        /// The offending template source.
        template: String,
    },

    /// The same placeholder appears more than once.
    #[error("placeholder {{{name}}} appears more than once in {template:?}")]
    DuplicatePlaceholder {
        /// The repeated placeholder name.
        name: String,
        /// The offending template source.
        template: String,
    },

    /// A placeholder referenced by the template has no value in the field set.
    #[error("no value supplied for placeholder {{{name}}} in {template:?}")]
    TemplateFieldMissing {
        /// The missing placeholder name.
        name: &'static str,
        /// The template being rendered.
        template: String,
    },

    /// A field value has the wrong kind for its placeholder.
    #[error("placeholder {{{name}}} expects a {expected} value")]
    FieldKindMismatch {
        /// The placeholder name.
        name: &'static str,
        /// The kind the placeholder requires.
        expected: &'static str,
    },

    /// A value (or the rendered result) cannot be used as a path segment.
    #[error("invalid path segment value {value:?}: {reason}")]
    InvalidFieldValue {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A numeric key is not of the form `digits` or `digits.digits`.
    #[error("invalid numeric key {value:?}")]
    InvalidNumber {
        /// The rejected text.
        value: String,
    },

    /// The derived or stored pattern failed to compile.
    #[error("invalid matcher pattern {pattern:?}: {source}")]
    Pattern {
        /// The pattern source.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

impl TemplateError {
    /// Creates a syntax error.
    pub fn syntax(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Syntax {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid field value error.
    pub fn invalid_value(value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidFieldValue {
            value: value.into(),
            reason,
        }
    }

    /// Creates an invalid numeric key error.
    pub fn invalid_number(value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            value: value.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_template_field_missing_display_names_placeholder() {
        let error = TemplateError::TemplateFieldMissing {
            name: "title",
            template: "{chapter} - {title}".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("{title}"), "Expected placeholder in: {msg}");
        assert!(msg.contains("{chapter} - {title}"), "Expected template in: {msg}");
    }

    #[test]
    fn test_unknown_placeholder_display_names_level() {
        let error = TemplateError::UnknownPlaceholder {
            name: "title".to_string(),
            level: Level::Volume,
            template: "Vol {title}".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("volume"), "Expected level in: {msg}");
        assert!(msg.contains("{title}"), "Expected placeholder in: {msg}");
    }
}
