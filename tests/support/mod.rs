//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use manga_dl_core::download::ProgressObserver;
use manga_dl_core::site::{
    ImageResource, RemoteChapter, RemotePage, RemoteSeries, SiteError, SiteId, SiteProvider,
};
use manga_dl_core::{LibraryConfig, NamingTemplates};

pub fn templates() -> NamingTemplates {
    NamingTemplates::new(
        "{series}",
        "Volume {volume}",
        "Chapter {chapter} - {title}",
        "{page:03}.{ext}",
    )
    .expect("valid templates")
}

/// Config rooted at `root` with no pause between pages.
pub fn config(root: &Path) -> LibraryConfig {
    LibraryConfig::new(root, templates()).with_throttle(Duration::ZERO)
}

pub fn remote_chapter(series: &str, volume: Option<&str>, key: &str, title: &str) -> RemoteChapter {
    RemoteChapter {
        series: series.to_string(),
        volume: volume.map(|v| v.parse().expect("numeric volume")),
        key: key.parse().expect("numeric chapter"),
        title: title.to_string(),
        url: format!("stub://{series}#{key}"),
    }
}

/// Provider serving the same page list for every chapter.
///
/// `None` entries are pages whose image is gone.
pub struct StubProvider {
    pub images: Vec<Option<String>>,
}

impl StubProvider {
    pub fn new(base: &str, names: &[Option<&str>]) -> Self {
        Self {
            images: names
                .iter()
                .map(|name| name.map(|n| format!("{base}/{n}")))
                .collect(),
        }
    }
}

#[async_trait]
impl SiteProvider for StubProvider {
    fn id(&self) -> SiteId {
        SiteId::Manifest
    }

    async fn search(&self, _title: &str) -> Result<Vec<RemoteSeries>, SiteError> {
        Ok(Vec::new())
    }

    async fn chapters(&self, _series: &RemoteSeries) -> Result<Vec<RemoteChapter>, SiteError> {
        Ok(Vec::new())
    }

    async fn pages(&self, chapter: &RemoteChapter) -> Result<Vec<RemotePage>, SiteError> {
        Ok(self
            .images
            .iter()
            .enumerate()
            .map(|(idx, image)| RemotePage {
                index: idx + 1,
                url: format!("{}/{}", chapter.url, idx + 1),
                image: image.clone().map(ImageResource::new),
            })
            .collect())
    }
}

/// Observer that records every callback.
#[derive(Default)]
pub struct RecordingObserver {
    calls: Mutex<Vec<(usize, usize)>>,
}

impl RecordingObserver {
    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().expect("observer lock").clone()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_page(&self, current: usize, total: usize) {
        self.calls.lock().expect("observer lock").push((current, total));
    }
}
