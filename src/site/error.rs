//! Error types for site providers.

use std::path::PathBuf;

use thiserror::Error;

use super::SiteId;

/// Errors raised while searching or enumerating remote content.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A configured site name is not a known provider.
    #[error("unknown site '{name}'")]
    UnknownSite {
        /// The configured name.
        name: String,
    },

    /// An enabled site has no registered provider because a setting is missing.
    #[error("site '{site}' is enabled but `sites.{key}` is not set")]
    NotConfigured {
        /// The site lacking configuration.
        site: SiteId,
        /// The missing config key.
        key: &'static str,
    },

    /// No enabled provider returned a match.
    #[error("no search results for '{title}'")]
    NoSearchResults {
        /// The searched title.
        title: String,
    },

    /// A chapter reference no longer resolves.
    #[error("chapter not found: {url}")]
    ChapterNotFound {
        /// The chapter URL.
        url: String,
    },

    /// A manifest file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The file or directory being read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A manifest file is not valid JSON for the manifest shape.
    #[error("malformed manifest {path}: {source}")]
    Manifest {
        /// The manifest path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A manifest parses but holds an unusable value.
    #[error("invalid manifest {path}: {reason}")]
    InvalidManifest {
        /// The manifest path.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },
}

impl SiteError {
    /// Creates an I/O error with the path being read.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
