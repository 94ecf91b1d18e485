//! Field values supplied to, and extracted from, naming templates.

use std::collections::BTreeMap;

use super::{FieldKind, NumericKey, Placeholder};

/// A single placeholder value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free text (`{series}`, `{title}`, `{ext}`).
    Text(String),
    /// A numeric key (`{volume}`, `{chapter}`, `{page}`).
    Numeric(NumericKey),
}

impl FieldValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Numeric(_) => FieldKind::Numeric,
        }
    }

    /// Returns the value as text, as it would be written into a path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Numeric(key) => key.as_str(),
        }
    }
}

/// Mapping from placeholder to value.
///
/// Used both as the input to [`NamingTemplate::render`](super::NamingTemplate::render)
/// and as the output of [`Matcher::extract`](super::Matcher::extract).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeMap<Placeholder, FieldValue>,
}

impl FieldSet {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text value, returning the updated set.
    #[must_use]
    pub fn with_text(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.insert(placeholder, FieldValue::Text(value.into()));
        self
    }

    /// Adds a numeric value, returning the updated set.
    #[must_use]
    pub fn with_number(mut self, placeholder: Placeholder, value: NumericKey) -> Self {
        self.insert(placeholder, FieldValue::Numeric(value));
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, placeholder: Placeholder, value: FieldValue) {
        self.values.insert(placeholder, value);
    }

    /// Returns the value for a placeholder.
    #[must_use]
    pub fn get(&self, placeholder: Placeholder) -> Option<&FieldValue> {
        self.values.get(&placeholder)
    }

    /// Returns a text value, or `None` when absent or numeric.
    #[must_use]
    pub fn text(&self, placeholder: Placeholder) -> Option<&str> {
        match self.values.get(&placeholder)? {
            FieldValue::Text(text) => Some(text),
            FieldValue::Numeric(_) => None,
        }
    }

    /// Returns a numeric value, or `None` when absent or text.
    #[must_use]
    pub fn number(&self, placeholder: Placeholder) -> Option<&NumericKey> {
        match self.values.get(&placeholder)? {
            FieldValue::Numeric(key) => Some(key),
            FieldValue::Text(_) => None,
        }
    }

    /// Returns the number of values in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the set holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = (Placeholder, &FieldValue)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    /// Compares two sets: text values must match exactly, numeric values by
    /// value (`"010"` matches `"10"`).
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().all(|(placeholder, value)| {
                match (value, other.values.get(placeholder)) {
                    (FieldValue::Text(a), Some(FieldValue::Text(b))) => a == b,
                    (FieldValue::Numeric(a), Some(FieldValue::Numeric(b))) => a.numeric_eq(b),
                    _ => false,
                }
            })
    }
}
