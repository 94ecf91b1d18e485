//! Layout sidecar: the hidden file that records how a series tree was named.
//!
//! When the download pipeline writes into a series directory it also writes
//! `.manga-dl.toml` there, holding the matcher patterns derived from the
//! volume, chapter, and page templates in force at the time. The library index
//! reads those patterns back, so a tree can be parsed without knowing which
//! templates produced it.
//!
//! ```toml
//! [layout]
//! version = 1
//! series_title = 'Re: Zero'
//! volume_pattern = '^Volume (?P<volume>[0-9]+(?:\.[0-9]+)?)$'
//! chapter_pattern = '...'
//! page_pattern = '...'
//! ```
//!
//! `series_title` is the display title the series was downloaded under. The
//! directory name holds its sanitized form, which may not be searchable.
//!
//! The file is overwritten, never merged, on every chapter write. Changing
//! templates part-way through a series therefore invalidates earlier chapters;
//! that is an accepted limitation.
//!
//! # Module structure note
//!
//! This module is a single file (`mod.rs`-only); the feature scope is small
//! enough to not warrant sub-files.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::NamingTemplates;
use crate::template::{Matcher, TemplateError};

/// File name of the sidecar inside a series directory.
pub const SIDECAR_FILE_NAME: &str = ".manga-dl.toml";

/// Newest sidecar schema version this build reads and the one it writes.
pub const SIDECAR_VERSION: u32 = 1;

/// Errors produced by sidecar reads and writes.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// I/O error reading or writing the sidecar file.
    #[error("I/O error on sidecar {path}: {source}")]
    Io {
        /// The sidecar path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The sidecar is not a valid layout document.
    #[error("malformed sidecar {path}: {source}")]
    Parse {
        /// The sidecar path.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// TOML serialization error (shouldn't occur for well-formed structs).
    #[error("sidecar serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The sidecar was written by a newer schema.
    #[error("sidecar {path} has version {found}, newest supported is {SIDECAR_VERSION}")]
    UnsupportedVersion {
        /// The sidecar path.
        path: PathBuf,
        /// The version found in the file.
        found: u32,
    },

    /// A stored pattern does not compile.
    #[error("sidecar {path} holds an invalid pattern: {source}")]
    Pattern {
        /// The sidecar path.
        path: PathBuf,
        /// The underlying template error.
        #[source]
        source: TemplateError,
    },
}

/// The matchers for the levels below a series directory.
///
/// Series-level matching is only needed when listing the collection root, so
/// it is not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMatchers {
    /// Recognizes volume directories.
    pub volume: Matcher,
    /// Recognizes chapter directories.
    pub chapter: Matcher,
    /// Recognizes page files.
    pub page: Matcher,
}

impl LayoutMatchers {
    /// Derives matchers from the configured templates.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Pattern`] if a derived pattern fails to compile.
    pub fn derive(templates: &NamingTemplates) -> Result<Self, TemplateError> {
        Ok(Self {
            volume: templates.volume.derive_matcher()?,
            chapter: templates.chapter.derive_matcher()?,
            page: templates.page.derive_matcher()?,
        })
    }
}

/// Everything a sidecar records about a series directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLayout {
    /// Matchers for the tree below the series directory.
    pub matchers: LayoutMatchers,
    /// The unsanitized display title, if the writer knew it.
    pub series_title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SidecarDocument {
    layout: LayoutSection,
}

#[derive(Debug, Serialize, Deserialize)]
struct LayoutSection {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    series_title: Option<String>,
    volume_pattern: String,
    chapter_pattern: String,
    page_pattern: String,
}

/// Returns the sidecar path for a series directory.
#[must_use]
pub fn sidecar_path(series_path: &Path) -> PathBuf {
    series_path.join(SIDECAR_FILE_NAME)
}

/// Writes (or overwrites) the sidecar inside `series_path`.
///
/// `series_title` is stored verbatim when given.
///
/// On Windows the file is additionally marked hidden, since the leading dot
/// does not hide it there. That step is best-effort: failure is logged.
///
/// Returns the sidecar path.
///
/// # Errors
///
/// Returns [`SidecarError`] on I/O or serialization failure.
#[instrument(skip(matchers), fields(series_path = %series_path.display()))]
pub fn write_sidecar(
    series_path: &Path,
    matchers: &LayoutMatchers,
    series_title: Option<&str>,
) -> Result<PathBuf, SidecarError> {
    let path = sidecar_path(series_path);
    let document = SidecarDocument {
        layout: LayoutSection {
            version: SIDECAR_VERSION,
            series_title: series_title.map(str::to_string),
            volume_pattern: matchers.volume.as_str().to_string(),
            chapter_pattern: matchers.chapter.as_str().to_string(),
            page_pattern: matchers.page.as_str().to_string(),
        },
    };
    let contents = toml::to_string_pretty(&document)?;

    let io_err = |source| SidecarError::Io {
        path: path.clone(),
        source,
    };
    // Windows refuses to truncate-on-open a hidden file, so open first and
    // truncate afterwards.
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(io_err)?;
    file.set_len(0).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    drop(file);

    mark_hidden(&path);
    debug!(path = %path.display(), "sidecar written");
    Ok(path)
}

/// Reads the sidecar inside `series_path`.
///
/// Returns `Ok(None)` when there is no sidecar: the directory was not created
/// by this tool (or predates the sidecar). Callers treat that as "cannot index
/// this series", not as a failure.
///
/// # Errors
///
/// Returns [`SidecarError`] if the file exists but cannot be read, parsed,
/// compiled, or has an unsupported version.
#[instrument(fields(series_path = %series_path.display()))]
pub fn read_sidecar(series_path: &Path) -> Result<Option<SeriesLayout>, SidecarError> {
    let path = sidecar_path(series_path);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no sidecar present");
            return Ok(None);
        }
        Err(source) => return Err(SidecarError::Io { path, source }),
    };

    let document: SidecarDocument = toml::from_str(&raw).map_err(|source| SidecarError::Parse {
        path: path.clone(),
        source,
    })?;
    let layout = document.layout;
    if layout.version > SIDECAR_VERSION {
        return Err(SidecarError::UnsupportedVersion {
            path,
            found: layout.version,
        });
    }

    let compile = |pattern: &str| {
        Matcher::from_pattern(pattern).map_err(|source| SidecarError::Pattern {
            path: path.clone(),
            source,
        })
    };
    let matchers = LayoutMatchers {
        volume: compile(&layout.volume_pattern)?,
        chapter: compile(&layout.chapter_pattern)?,
        page: compile(&layout.page_pattern)?,
    };
    Ok(Some(SeriesLayout {
        matchers,
        series_title: layout.series_title,
    }))
}

#[cfg(windows)]
fn mark_hidden(path: &Path) {
    use tracing::warn;

    match std::process::Command::new("attrib").arg("+h").arg(path).output() {
        Ok(output) if output.status.success() => {}
        Ok(output) => warn!(
            path = %path.display(),
            status = %output.status,
            "failed to mark sidecar hidden"
        ),
        Err(error) => warn!(
            path = %path.display(),
            error = %error,
            "failed to mark sidecar hidden"
        ),
    }
}

#[cfg(not(windows))]
fn mark_hidden(_path: &Path) {}
