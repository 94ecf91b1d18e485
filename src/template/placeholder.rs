//! Placeholder vocabulary and the levels of the library hierarchy.

use std::fmt;

/// One level of the on-disk hierarchy, each with its own naming template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// The collection root (`manga_dir`); a literal path, no placeholders.
    Root,
    /// A series directory (`series_dir`).
    Series,
    /// A volume directory (`volume_dir`).
    Volume,
    /// A chapter directory (`chapter_dir`).
    Chapter,
    /// A page file (`page_filename`).
    Page,
}

impl Level {
    /// Returns the placeholders a template at this level may use.
    #[must_use]
    pub fn placeholders(self) -> &'static [Placeholder] {
        match self {
            Self::Root => &[],
            Self::Series => &[Placeholder::Series],
            Self::Volume => &[Placeholder::Volume],
            Self::Chapter => &[Placeholder::Chapter, Placeholder::Title],
            Self::Page => &[Placeholder::Page, Placeholder::Ext],
        }
    }

    /// Returns the placeholder that identifies an entry at this level, if any.
    #[must_use]
    pub fn key_placeholder(self) -> Option<Placeholder> {
        match self {
            Self::Root => None,
            Self::Series => Some(Placeholder::Series),
            Self::Volume => Some(Placeholder::Volume),
            Self::Chapter => Some(Placeholder::Chapter),
            Self::Page => Some(Placeholder::Page),
        }
    }

    /// Returns the configuration key naming this level's template.
    #[must_use]
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Root => "manga_dir",
            Self::Series => "series_dir",
            Self::Volume => "volume_dir",
            Self::Chapter => "chapter_dir",
            Self::Page => "page_filename",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Series => "series",
            Self::Volume => "volume",
            Self::Chapter => "chapter",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a placeholder's value is captured and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, captured as one or more of any character.
    Text,
    /// A decimal number with an optional fractional part (`10`, `10.5`).
    Numeric,
}

impl FieldKind {
    /// Returns a short label used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
        }
    }
}

/// A named placeholder drawn from the fixed template vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    /// `{series}`
    Series,
    /// `{volume}`
    Volume,
    /// `{chapter}`
    Chapter,
    /// `{title}`
    Title,
    /// `{page}`
    Page,
    /// `{ext}`
    Ext,
}

impl Placeholder {
    /// Every placeholder in the vocabulary.
    pub const ALL: [Placeholder; 6] = [
        Self::Series,
        Self::Volume,
        Self::Chapter,
        Self::Title,
        Self::Page,
        Self::Ext,
    ];

    /// Returns the placeholder name as written between braces.
    ///
    /// The name doubles as the capture group name in derived matchers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Series => "series",
            Self::Volume => "volume",
            Self::Chapter => "chapter",
            Self::Title => "title",
            Self::Page => "page",
            Self::Ext => "ext",
        }
    }

    /// Returns the kind of value this placeholder carries.
    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Volume | Self::Chapter | Self::Page => FieldKind::Numeric,
            Self::Series | Self::Title | Self::Ext => FieldKind::Text,
        }
    }

    /// Looks up a placeholder by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips_every_placeholder() {
        for placeholder in Placeholder::ALL {
            assert_eq!(Placeholder::from_name(placeholder.name()), Some(placeholder));
        }
        assert_eq!(Placeholder::from_name("num"), None);
    }

    #[test]
    fn test_numeric_kinds() {
        assert_eq!(Placeholder::Chapter.kind(), FieldKind::Numeric);
        assert_eq!(Placeholder::Volume.kind(), FieldKind::Numeric);
        assert_eq!(Placeholder::Page.kind(), FieldKind::Numeric);
        assert_eq!(Placeholder::Title.kind(), FieldKind::Text);
        assert_eq!(Placeholder::Ext.kind(), FieldKind::Text);
    }

    #[test]
    fn test_level_vocabulary() {
        assert!(Level::Root.placeholders().is_empty());
        assert_eq!(
            Level::Chapter.placeholders(),
            &[Placeholder::Chapter, Placeholder::Title]
        );
        assert_eq!(Level::Page.key_placeholder(), Some(Placeholder::Page));
        assert_eq!(Level::Page.config_key(), "page_filename");
    }

    #[test]
    fn test_placeholder_display_uses_braces() {
        assert_eq!(Placeholder::Title.to_string(), "{title}");
    }
}
