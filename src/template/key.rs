//! Text-preserving numeric keys for volumes, chapters, and pages.
//!
//! Keys keep the exact text they were parsed from (so `"010"` renders back as
//! `"010"` and `"10.50"` keeps its trailing zero), but compare numerically:
//! `9 < 10 < 10.5 < 11`. Two keys that are numerically equal but spelled
//! differently are ordered by their text so that [`Ord`] agrees with [`Eq`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::TemplateError;

/// A decimal identifier of the form `digits` or `digits.digits`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumericKey {
    raw: String,
    /// Byte offset of the `.` in `raw`, if fractional.
    dot: Option<usize>,
}

impl NumericKey {
    /// Creates a key from an integer.
    #[must_use]
    pub fn from_index(value: usize) -> Self {
        Self {
            raw: value.to_string(),
            dot: None,
        }
    }

    /// Returns the key exactly as it was written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the integer part as written (may carry leading zeros).
    #[must_use]
    pub fn integer_part(&self) -> &str {
        match self.dot {
            Some(dot) => &self.raw[..dot],
            None => &self.raw,
        }
    }

    /// Returns the fractional digits, if any.
    #[must_use]
    pub fn fraction_part(&self) -> Option<&str> {
        self.dot.map(|dot| &self.raw[dot + 1..])
    }

    /// Returns `true` if the key has a fractional component.
    #[must_use]
    pub fn is_fractional(&self) -> bool {
        self.dot.is_some()
    }

    /// Compares two keys by value only, ignoring spelling.
    #[must_use]
    pub fn numeric_cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (
            self.integer_part().trim_start_matches('0'),
            other.integer_part().trim_start_matches('0'),
        );
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| {
                let a = self.fraction_part().unwrap_or("").trim_end_matches('0');
                let b = other.fraction_part().unwrap_or("").trim_end_matches('0');
                // Equal-length prefixes compare digit by digit; the longer one
                // is larger once trailing zeros are gone.
                a.cmp(b)
            })
    }

    /// Returns `true` if both keys denote the same number (`"010"` and `"10"`).
    #[must_use]
    pub fn numeric_eq(&self, other: &Self) -> bool {
        self.numeric_cmp(other) == Ordering::Equal
    }

    /// Converts the key to a float, for display and arithmetic only.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        // Every key is a valid float literal.
        self.raw.parse().unwrap_or(f64::NAN)
    }

    /// Renders the key with its integer part zero-padded to `width` digits.
    #[must_use]
    pub fn padded(&self, width: usize) -> String {
        let integer = format!("{:0>width$}", self.integer_part());
        match self.fraction_part() {
            Some(fraction) => format!("{integer}.{fraction}"),
            None => integer,
        }
    }
}

impl FromStr for NumericKey {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (integer, fraction) = match s.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (s, None),
        };
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || fraction.is_some_and(|f| !all_digits(f)) {
            return Err(TemplateError::invalid_number(s));
        }
        Ok(Self {
            raw: s.to_string(),
            dot: fraction.map(|_| integer.len()),
        })
    }
}

impl Ord for NumericKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric_cmp(other).then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for NumericKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NumericKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key(s: &str) -> NumericKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_accepts_integers_and_decimals() {
        assert_eq!(key("10").as_str(), "10");
        assert_eq!(key("10.5").fraction_part(), Some("5"));
        assert_eq!(key("007").integer_part(), "007");
        assert!(key("10.5").is_fractional());
        assert!(!key("10").is_fractional());
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for bad in ["", ".", "10.", ".5", "1.2.3", "-1", "ten", "1e3", " 1"] {
            assert!(bad.parse::<NumericKey>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_fractional_key_sorts_between_neighbours() {
        let mut keys = vec![key("11"), key("10.5"), key("9"), key("10"), key("2")];
        keys.sort();
        let sorted: Vec<&str> = keys.iter().map(NumericKey::as_str).collect();
        assert_eq!(sorted, ["2", "9", "10", "10.5", "11"]);
    }

    #[test]
    fn test_numeric_comparison_ignores_spelling() {
        assert!(key("010").numeric_eq(&key("10")));
        assert!(key("10.50").numeric_eq(&key("10.5")));
        assert!(key("10.0").numeric_eq(&key("10")));
        assert_ne!(key("010"), key("10"));
        assert!(key("10.25") < key("10.5"));
        assert!(key("10.05") < key("10.5"));
        assert!(key("99") < key("100"));
    }

    #[test]
    fn test_padded_keeps_fraction() {
        assert_eq!(key("7").padded(3), "007");
        assert_eq!(key("10.5").padded(3), "010.5");
        assert_eq!(key("1234").padded(3), "1234");
    }

    #[test]
    fn test_as_f64() {
        assert!((key("10.5").as_f64() - 10.5).abs() < f64::EPSILON);
        assert!((NumericKey::from_index(3).as_f64() - 3.0).abs() < f64::EPSILON);
    }
}
