//! Rebuilds the collection hierarchy from the directory tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace, warn};

use super::{Chapter, LibraryError, Page, Series, Volume};
use crate::config::LibraryConfig;
use crate::sidecar::{LayoutMatchers, read_sidecar};
use crate::template::{Matcher, NumericKey, Placeholder, sanitize_segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
}

/// Indexes series stored under the collection root.
///
/// Holds no cached state: every [`load`](Self::load) walks the tree afresh.
#[derive(Debug, Clone)]
pub struct LibraryIndex {
    root: PathBuf,
    series_matcher: Matcher,
}

impl LibraryIndex {
    /// Creates an index for the configured collection root.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Template`] if the series template cannot produce a matcher.
    pub fn new(config: &LibraryConfig) -> Result<Self, LibraryError> {
        Ok(Self {
            root: config.manga_dir.clone(),
            series_matcher: config.templates.series.derive_matcher()?,
        })
    }

    /// Returns the collection root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the series whose name matches `name` case-insensitively.
    ///
    /// `name` may be either the stored directory name or the display title it
    /// was sanitized from (`Re: Zero` finds `Re_ Zero`). Directory names are
    /// compared in lexical order and the first match wins.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::SeriesNotFound`] if no series directory matches
    /// - [`LibraryError::LayoutUnrecoverable`] if the match has no usable sidecar
    /// - [`LibraryError::Io`] if a directory cannot be listed
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self, name: &str) -> Result<Series, LibraryError> {
        let wanted = name.to_lowercase();
        let sanitized = sanitize_segment(name).to_lowercase();
        for (dir_name, path) in list_entries(&self.root, EntryKind::Directory)? {
            let Some(series_name) = self.series_name(&dir_name) else {
                continue;
            };
            let candidate = series_name.to_lowercase();
            if candidate == wanted || candidate == sanitized {
                return load_series(series_name, path);
            }
        }
        Err(LibraryError::SeriesNotFound {
            name: name.to_string(),
        })
    }

    /// Loads every indexable series under the root.
    ///
    /// Directories that do not match the series template, or that lack a
    /// usable sidecar, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Io`] if a directory cannot be listed.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn list_all(&self) -> Result<Vec<Series>, LibraryError> {
        let mut all = Vec::new();
        for (dir_name, path) in list_entries(&self.root, EntryKind::Directory)? {
            let Some(series_name) = self.series_name(&dir_name) else {
                trace!(dir_name, "not a series directory");
                continue;
            };
            match load_series(series_name, path) {
                Ok(series) => all.push(series),
                Err(error) if error.is_expected_absence() => {
                    debug!(dir_name, error = %error, "skipping directory");
                }
                Err(error) => return Err(error),
            }
        }
        debug!(count = all.len(), "collection listed");
        Ok(all)
    }

    /// Deletes the series matching `name` and everything beneath it.
    ///
    /// Only a directory with a readable sidecar is removed, so folders this
    /// tool did not create are never touched. Returns the series as it was
    /// indexed just before deletion.
    ///
    /// # Errors
    ///
    /// The errors of [`load`](Self::load), or [`LibraryError::Io`] if the
    /// directory cannot be removed.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn remove(&self, name: &str) -> Result<Series, LibraryError> {
        let series = self.load(name)?;
        fs::remove_dir_all(&series.path).map_err(|source| LibraryError::io(&series.path, source))?;
        info!(series = %series.name, path = %series.path.display(), "series removed");
        Ok(series)
    }

    fn series_name(&self, dir_name: &str) -> Option<String> {
        let fields = self.series_matcher.extract(dir_name)?;
        fields.text(Placeholder::Series).map(str::to_string)
    }
}

fn load_series(name: String, path: PathBuf) -> Result<Series, LibraryError> {
    let layout = match read_sidecar(&path) {
        Ok(Some(layout)) => layout,
        Ok(None) => return Err(LibraryError::LayoutUnrecoverable { path, source: None }),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "unusable layout sidecar");
            return Err(LibraryError::LayoutUnrecoverable {
                path,
                source: Some(error),
            });
        }
    };

    let mut series = Series::new(name, path);
    series.title = layout.series_title;
    walk_volumes(&mut series, &layout.matchers)?;
    debug!(
        series = %series.name,
        volumes = series.volumes.len(),
        chapters = series.chapter_count(),
        pages = series.page_count(),
        "series indexed"
    );
    Ok(series)
}

fn walk_volumes(series: &mut Series, matchers: &LayoutMatchers) -> Result<(), LibraryError> {
    for (dir_name, path) in list_entries(&series.path, EntryKind::Directory)? {
        let Some(fields) = matchers.volume.extract(&dir_name) else {
            trace!(dir_name, "skipping non-volume entry");
            continue;
        };
        let key = fields
            .number(Placeholder::Volume)
            .cloned()
            .unwrap_or_else(|| NumericKey::from_index(0));
        if series.volumes.contains_key(&key) {
            warn!(dir_name, volume = %key, "duplicate volume key, keeping first");
            continue;
        }

        let mut volume = Volume {
            key: key.clone(),
            path,
            chapters: BTreeMap::new(),
        };
        walk_chapters(&mut volume, matchers)?;
        series.volumes.insert(key, volume);
    }
    Ok(())
}

fn walk_chapters(volume: &mut Volume, matchers: &LayoutMatchers) -> Result<(), LibraryError> {
    for (dir_name, path) in list_entries(&volume.path, EntryKind::Directory)? {
        let Some(fields) = matchers.chapter.extract(&dir_name) else {
            trace!(dir_name, "skipping non-chapter entry");
            continue;
        };
        let Some(key) = fields.number(Placeholder::Chapter).cloned() else {
            trace!(dir_name, "chapter entry has no chapter number");
            continue;
        };
        if volume.chapters.contains_key(&key) {
            warn!(dir_name, chapter = %key, "duplicate chapter key, keeping first");
            continue;
        }

        let mut chapter = Chapter {
            key: key.clone(),
            title: fields.text(Placeholder::Title).map(str::to_string),
            path,
            pages: BTreeMap::new(),
        };
        walk_pages(&mut chapter, matchers)?;
        volume.chapters.insert(key, chapter);
    }
    Ok(())
}

fn walk_pages(chapter: &mut Chapter, matchers: &LayoutMatchers) -> Result<(), LibraryError> {
    for (file_name, path) in list_entries(&chapter.path, EntryKind::File)? {
        let Some(fields) = matchers.page.extract(&file_name) else {
            trace!(file_name, "skipping non-page entry");
            continue;
        };
        let Some(key) = fields.number(Placeholder::Page).cloned() else {
            continue;
        };
        let page = Page {
            key: key.clone(),
            path,
            extension: fields.text(Placeholder::Ext).map(str::to_string),
        };
        chapter.pages.entry(key).or_insert(page);
    }
    Ok(())
}

/// Lists the entries of `dir` of one kind, sorted lexically by name.
///
/// Names that are not valid UTF-8 cannot have been rendered from a template
/// and are skipped.
fn list_entries(dir: &Path, kind: EntryKind) -> Result<Vec<(String, PathBuf)>, LibraryError> {
    let read_dir = fs::read_dir(dir).map_err(|source| LibraryError::io(dir, source))?;
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| LibraryError::io(dir, source))?;
        let path = entry.path();
        let wanted = match kind {
            EntryKind::Directory => path.is_dir(),
            EntryKind::File => path.is_file(),
        };
        if !wanted {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => entries.push((name, path)),
            Err(name) => trace!(?name, "skipping non-UTF-8 entry"),
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
