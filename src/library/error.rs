//! Error types for library indexing.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sidecar::SidecarError;
use crate::template::TemplateError;

/// Errors that can occur while indexing the on-disk collection.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No series directory matches the requested name.
    #[error("no series named '{name}' in the collection")]
    SeriesNotFound {
        /// The requested series name.
        name: String,
    },

    /// The series directory exists but its layout sidecar is absent or unusable.
    #[error("cannot index {path}: layout sidecar is missing or unreadable")]
    LayoutUnrecoverable {
        /// The series directory.
        path: PathBuf,
        /// The sidecar failure, or `None` when there is no sidecar at all.
        #[source]
        source: Option<SidecarError>,
    },

    /// A directory could not be listed.
    #[error("I/O error listing {path}: {source}")]
    Io {
        /// The directory being listed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The series template could not produce a matcher.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl LibraryError {
    /// Creates an I/O error with the directory that was being listed.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns `true` for the "this entry is not ours" outcomes that
    /// collection-wide listing skips.
    #[must_use]
    pub fn is_expected_absence(&self) -> bool {
        matches!(
            self,
            Self::SeriesNotFound { .. } | Self::LayoutUnrecoverable { .. }
        )
    }
}
