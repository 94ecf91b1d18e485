//! Library configuration: collection root, naming templates, throttle, sites.
//!
//! Configuration is loaded once at process start and passed by reference into
//! [`LibraryIndex`](crate::library::LibraryIndex) and
//! [`DownloadPipeline`](crate::download::DownloadPipeline). Nothing re-reads it
//! afterwards.
//!
//! # File format
//!
//! ```toml
//! [paths]
//! manga_dir = "/srv/manga"
//! series_dir = "{series}"
//! volume_dir = "Volume {volume}"
//! chapter_dir = "Chapter {chapter} - {title}"
//! page_filename = "{page:03}.{ext}"
//!
//! [download]
//! throttle_ms = 1000
//!
//! [sites]
//! enabled = ["manifest"]
//! manifest_dir = "/srv/manga-manifests"
//! ```
//!
//! Unknown keys are ignored.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::template::{Level, NamingTemplate, Placeholder, TemplateError};

/// Default pause between page fetches, in milliseconds.
pub const DEFAULT_THROTTLE_MS: u64 = 1000;

/// Largest accepted `throttle_ms` value.
pub const MAX_THROTTLE_MS: u64 = 60_000;

/// Site enabled when the config file does not list any.
pub const DEFAULT_SITE: &str = "manifest";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The config file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected shape.
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required key is absent.
    #[error("missing required config key `{section}.{key}`")]
    MissingKey {
        /// The TOML table the key belongs to.
        section: &'static str,
        /// The missing key.
        key: &'static str,
    },

    /// A template failed to parse.
    #[error("invalid `{key}` template: {source}")]
    Template {
        /// The config key of the template.
        key: &'static str,
        /// The underlying template error.
        #[source]
        source: TemplateError,
    },

    /// A template lacks the placeholder that identifies entries at its level.
    #[error("`{key}` template must reference {placeholder}")]
    MissingKeyPlaceholder {
        /// The config key of the template.
        key: &'static str,
        /// The required placeholder.
        placeholder: Placeholder,
    },

    /// A numeric setting is out of range.
    #[error("invalid config value for `{key}`: {value}. Expected range: {range}")]
    OutOfRange {
        /// The config key.
        key: &'static str,
        /// The rejected value.
        value: u64,
        /// The accepted range, for display.
        range: &'static str,
    },
}

/// The validated naming templates for every level below the collection root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTemplates {
    /// Series directory template (`{series}`).
    pub series: NamingTemplate,
    /// Volume directory template (`{volume}`).
    pub volume: NamingTemplate,
    /// Chapter directory template (`{chapter}`, `{title}`).
    pub chapter: NamingTemplate,
    /// Page filename template (`{page}`, `{ext}`).
    pub page: NamingTemplate,
}

impl NamingTemplates {
    /// Parses and validates the four level templates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] if a template is malformed or uses a
    /// placeholder outside its level, and [`ConfigError::MissingKeyPlaceholder`]
    /// if a template cannot identify its entries.
    pub fn new(series: &str, volume: &str, chapter: &str, page: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            series: parse_level(Level::Series, series)?,
            volume: parse_level(Level::Volume, volume)?,
            chapter: parse_level(Level::Chapter, chapter)?,
            page: parse_level(Level::Page, page)?,
        })
    }
}

fn parse_level(level: Level, source: &str) -> Result<NamingTemplate, ConfigError> {
    let key = level.config_key();
    let template =
        NamingTemplate::parse(level, source).map_err(|source| ConfigError::Template { key, source })?;
    if let Some(placeholder) = level.key_placeholder()
        && !template.references(placeholder)
    {
        return Err(ConfigError::MissingKeyPlaceholder { key, placeholder });
    }
    Ok(template)
}

/// Source-site settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    /// Enabled site identifiers, in priority order.
    pub enabled: Vec<String>,
    /// Directory holding series manifests for the `manifest` site.
    pub manifest_dir: Option<PathBuf>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            enabled: vec![DEFAULT_SITE.to_string()],
            manifest_dir: None,
        }
    }
}

/// Process-wide library configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// The collection root; series directories live directly beneath it.
    pub manga_dir: PathBuf,
    /// Naming templates for series, volume, chapter, and page levels.
    pub templates: NamingTemplates,
    /// Pause between successive page fetches.
    pub throttle: Duration,
    /// Source-site settings.
    pub sites: SiteSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    paths: RawPaths,
    #[serde(default)]
    download: RawDownload,
    #[serde(default)]
    sites: RawSites,
}

#[derive(Debug, Default, Deserialize)]
struct RawPaths {
    manga_dir: Option<String>,
    series_dir: Option<String>,
    volume_dir: Option<String>,
    chapter_dir: Option<String>,
    page_filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDownload {
    throttle_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSites {
    enabled: Option<Vec<String>>,
    manifest_dir: Option<PathBuf>,
}

impl LibraryConfig {
    /// Creates a configuration with default throttle and site settings.
    #[must_use]
    pub fn new(manga_dir: impl Into<PathBuf>, templates: NamingTemplates) -> Self {
        Self {
            manga_dir: manga_dir.into(),
            templates,
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            sites: SiteSettings::default(),
        }
    }

    /// Replaces the throttle duration.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise the
    /// same errors as [`parse_str`](Self::parse_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&raw)
    }

    /// Parses and validates config TOML.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Toml`] for malformed TOML or wrongly typed values
    /// - [`ConfigError::MissingKey`] for absent `[paths]` keys
    /// - [`ConfigError::Template`] / [`ConfigError::MissingKeyPlaceholder`] for bad templates
    /// - [`ConfigError::OutOfRange`] for `throttle_ms` above [`MAX_THROTTLE_MS`]
    pub fn parse_str(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(raw)?;
        let paths = raw.paths;

        let manga_dir = require("manga_dir", paths.manga_dir)?;
        // The root is a literal path: reject anything that looks like a placeholder.
        NamingTemplate::parse(Level::Root, manga_dir.as_str()).map_err(|source| {
            ConfigError::Template {
                key: Level::Root.config_key(),
                source,
            }
        })?;

        let templates = NamingTemplates::new(
            &require("series_dir", paths.series_dir)?,
            &require("volume_dir", paths.volume_dir)?,
            &require("chapter_dir", paths.chapter_dir)?,
            &require("page_filename", paths.page_filename)?,
        )?;

        let throttle_ms = raw.download.throttle_ms.unwrap_or(DEFAULT_THROTTLE_MS);
        if throttle_ms > MAX_THROTTLE_MS {
            return Err(ConfigError::OutOfRange {
                key: "throttle_ms",
                value: throttle_ms,
                range: "0..=60000",
            });
        }

        let mut sites = SiteSettings::default();
        if let Some(enabled) = raw.sites.enabled {
            sites.enabled = enabled;
        }
        sites.manifest_dir = raw.sites.manifest_dir;

        Ok(Self {
            manga_dir: PathBuf::from(manga_dir),
            templates,
            throttle: Duration::from_millis(throttle_ms),
            sites,
        })
    }
}

fn require(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::MissingKey {
        section: "paths",
        key,
    })
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/manga-dl/config.toml`
/// 2. `$HOME/.config/manga-dl/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("manga-dl")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("manga-dl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}
