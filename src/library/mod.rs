//! Library indexing: reconstructs series from the directory tree.
//!
//! The tree under the collection root is the only record of what has been
//! downloaded. [`LibraryIndex`] reads each series' layout sidecar to obtain the
//! volume, chapter, and page matchers that produced it, then walks the tree one
//! level at a time. Entries a matcher rejects are foreign content and are
//! skipped without error.
//!
//! # Overview
//!
//! - [`LibraryIndex`] - `load` one series by name, or `list_all`
//! - [`Series`], [`Volume`], [`Chapter`], [`Page`] - the rebuilt hierarchy
//! - [`ChapterRef`], [`PageRef`] - views that reach the enclosing levels
//! - [`LibraryError`] - indexing failures

mod entry;
mod error;
mod index;

pub use entry::{Chapter, ChapterRef, Page, PageRef, Series, Volume};
pub use error::LibraryError;
pub use index::LibraryIndex;
