//! Error types for page fetches and the chapter pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::sidecar::SidecarError;
use crate::site::SiteError;
use crate::template::{NumericKey, TemplateError};

/// Errors from fetching a single resource to disk.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while writing the download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Errors from saving a chapter.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A directory or file name could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A chapter directory could not be created.
    #[error("failed to create {path}: {source}")]
    Io {
        /// The directory being created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The layout sidecar could not be written.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),

    /// A page has no image to fetch; the title is likely gone upstream.
    #[error("chapter {chapter}, page {page}: no image resource (likely delisted upstream)")]
    ImageResourceUnavailable {
        /// The chapter key.
        chapter: NumericKey,
        /// The 1-based page index.
        page: usize,
    },

    /// A page fetch failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The site provider failed while enumerating pages.
    #[error(transparent)]
    Site(#[from] SiteError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_http_status_display() {
        let error = DownloadError::http_status("https://example.com/001.jpg", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/001.jpg"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_download_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/001.jpg"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/001.jpg"), "Expected path in: {msg}");
    }

    #[test]
    fn test_download_error_invalid_url_display() {
        let msg = DownloadError::invalid_url("not-a-url").to_string();
        assert!(msg.contains("invalid URL"), "Expected 'invalid URL' in: {msg}");
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_image_unavailable_mentions_delisting() {
        let error = PipelineError::ImageResourceUnavailable {
            chapter: "10.5".parse().unwrap(),
            page: 3,
        };
        let msg = error.to_string();
        assert!(msg.contains("chapter 10.5"), "Expected chapter in: {msg}");
        assert!(msg.contains("page 3"), "Expected page in: {msg}");
        assert!(msg.contains("delisted"), "Expected hint in: {msg}");
    }
}
