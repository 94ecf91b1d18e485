//! Manga library core.
//!
//! Maintains a local manga collection laid out as
//! `series / volume / chapter / page` whose directory and file names come from
//! user-configurable naming templates. The same templates are used to write
//! new chapters and to read existing trees back into structured metadata.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`template`] - Naming templates, rendering, and derived matchers
//! - [`sidecar`] - Per-series layout file recording the matchers in use
//! - [`library`] - Rebuilds series from the directory tree
//! - [`download`] - Throttled, sequential chapter downloads
//! - [`site`] - Remote content providers and the site registry
//! - [`config`] - Configuration loading and validation
//! - [`workflow`] - Chapter selection helpers for the CLI

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod library;
pub mod sidecar;
pub mod site;
pub mod template;
pub mod workflow;

// Re-export commonly used types
pub use config::{ConfigError, LibraryConfig, NamingTemplates};
pub use download::{DownloadError, DownloadPipeline, HttpClient, PipelineError, SavedChapter};
pub use library::{LibraryError, LibraryIndex, Series};
pub use site::{SiteError, SiteId, SiteProvider, SiteRegistry};
pub use template::{Matcher, NamingTemplate, NumericKey, TemplateError};
