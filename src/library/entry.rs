//! The in-memory collection hierarchy rebuilt by [`LibraryIndex`](super::LibraryIndex).
//!
//! Each level owns its children in a map keyed by [`NumericKey`], so iteration
//! is in numeric order (`9`, `10`, `10.5`, `11`). Upward navigation goes through
//! the borrowing views [`ChapterRef`] and [`PageRef`], which hold references to
//! every enclosing level for as long as the [`Series`] is alive.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::template::NumericKey;

/// A series directory and everything indexed beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    /// The series name recovered from the directory name.
    pub name: String,
    /// The unsanitized title recorded in the sidecar, if any.
    pub title: Option<String>,
    /// The series directory.
    pub path: PathBuf,
    /// Volumes by key.
    pub volumes: BTreeMap<NumericKey, Volume>,
}

/// A volume directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// The volume key; `0` when the layout carries no volume number.
    pub key: NumericKey,
    /// The volume directory.
    pub path: PathBuf,
    /// Chapters by key.
    pub chapters: BTreeMap<NumericKey, Chapter>,
}

/// A chapter directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// The chapter key, possibly fractional (`10.5`).
    pub key: NumericKey,
    /// The chapter title, when the chapter template has one.
    pub title: Option<String>,
    /// The chapter directory.
    pub path: PathBuf,
    /// Pages by key.
    pub pages: BTreeMap<NumericKey, Page>,
}

/// A page image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The page key as written in the file name (`007` stays `007`).
    pub key: NumericKey,
    /// The page file.
    pub path: PathBuf,
    /// The file extension, when the page template has one.
    pub extension: Option<String>,
}

impl Series {
    /// Creates an empty series.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            title: None,
            path: path.into(),
            volumes: BTreeMap::new(),
        }
    }

    /// Returns the recorded title, falling back to the directory name.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Iterates over every chapter in volume, then chapter, order.
    pub fn chapters(&self) -> impl Iterator<Item = ChapterRef<'_>> {
        self.volumes.values().flat_map(move |volume| {
            volume.chapters.values().map(move |chapter| ChapterRef {
                series: self,
                volume,
                chapter,
            })
        })
    }

    /// Iterates over every page in reading order.
    pub fn pages(&self) -> impl Iterator<Item = PageRef<'_>> {
        self.chapters().flat_map(ChapterRef::pages)
    }

    /// Finds a chapter by numeric value, in any volume.
    ///
    /// `10.50` finds chapter `10.5`.
    #[must_use]
    pub fn chapter(&self, key: &NumericKey) -> Option<ChapterRef<'_>> {
        self.chapters().find(|c| c.chapter.key.numeric_eq(key))
    }

    /// Returns `true` if a chapter with this numeric value is present.
    #[must_use]
    pub fn has_chapter(&self, key: &NumericKey) -> bool {
        self.chapter(key).is_some()
    }

    /// Number of chapters across all volumes.
    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.volumes.values().map(|v| v.chapters.len()).sum()
    }

    /// Number of pages across all chapters.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.chapters().map(|c| c.chapter.pages.len()).sum()
    }
}

/// A chapter together with the volume and series that contain it.
#[derive(Debug, Clone, Copy)]
pub struct ChapterRef<'a> {
    series: &'a Series,
    volume: &'a Volume,
    chapter: &'a Chapter,
}

impl<'a> ChapterRef<'a> {
    /// The owning series.
    #[must_use]
    pub fn series(&self) -> &'a Series {
        self.series
    }

    /// The owning volume.
    #[must_use]
    pub fn volume(&self) -> &'a Volume {
        self.volume
    }

    /// The chapter itself.
    #[must_use]
    pub fn chapter(&self) -> &'a Chapter {
        self.chapter
    }

    /// Iterates over the chapter's pages.
    pub fn pages(self) -> impl Iterator<Item = PageRef<'a>> {
        self.chapter
            .pages
            .values()
            .map(move |page| PageRef { chapter: self, page })
    }
}

/// A page together with every level that contains it.
#[derive(Debug, Clone, Copy)]
pub struct PageRef<'a> {
    chapter: ChapterRef<'a>,
    page: &'a Page,
}

impl<'a> PageRef<'a> {
    /// The owning series.
    #[must_use]
    pub fn series(&self) -> &'a Series {
        self.chapter.series
    }

    /// The owning volume.
    #[must_use]
    pub fn volume(&self) -> &'a Volume {
        self.chapter.volume
    }

    /// The owning chapter.
    #[must_use]
    pub fn chapter(&self) -> &'a Chapter {
        self.chapter.chapter
    }

    /// The page itself.
    #[must_use]
    pub fn page(&self) -> &'a Page {
        self.page
    }
}
