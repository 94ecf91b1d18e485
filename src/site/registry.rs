//! Site registry: explicit `SiteId` to provider lookup.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use super::{ManifestProvider, RemoteSeries, SiteError, SiteId, SiteProvider};
use crate::config::SiteSettings;

/// Registered providers keyed by site.
///
/// At most one provider is registered per [`SiteId`]; registering a second one
/// replaces the first. Priority is not a property of the provider but of the
/// `enabled` list passed to [`search`](Self::search).
#[derive(Default)]
pub struct SiteRegistry {
    providers: BTreeMap<SiteId, Box<dyn SiteProvider>>,
}

impl std::fmt::Debug for SiteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteRegistry")
            .field("sites", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SiteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry holding a provider for every enabled site.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::UnknownSite`] for an unrecognized name and
    /// [`SiteError::NotConfigured`] when an enabled site lacks its settings.
    pub fn from_settings(settings: &SiteSettings) -> Result<Self, SiteError> {
        let mut registry = Self::new();
        for name in &settings.enabled {
            match name.parse::<SiteId>()? {
                SiteId::Manifest => {
                    let dir = settings.manifest_dir.as_ref().ok_or(SiteError::NotConfigured {
                        site: SiteId::Manifest,
                        key: "manifest_dir",
                    })?;
                    registry.register(Box::new(ManifestProvider::new(dir)));
                }
            }
        }
        Ok(registry)
    }

    /// Registers a provider under its own [`SiteId`].
    pub fn register(&mut self, provider: Box<dyn SiteProvider>) {
        let id = provider.id();
        debug!(site = %id, "registering site provider");
        if self.providers.insert(id, provider).is_some() {
            warn!(site = %id, "replaced previously registered provider");
        }
    }

    /// Returns the provider for `id`, if registered.
    #[must_use]
    pub fn get(&self, id: SiteId) -> Option<&dyn SiteProvider> {
        self.providers.get(&id).map(AsRef::as_ref)
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolves configured site names to ids, preserving their order.
    ///
    /// Duplicate names keep their first position.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::UnknownSite`] for an unrecognized name.
    pub fn enabled(&self, names: &[String]) -> Result<Vec<SiteId>, SiteError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = name.parse::<SiteId>()?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Searches the enabled sites in order and returns the first non-empty result.
    ///
    /// A failing provider is logged and skipped; enabled sites with no
    /// registered provider are skipped too.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NoSearchResults`] when no provider finds a match.
    #[instrument(skip(self, enabled))]
    pub async fn search(
        &self,
        title: &str,
        enabled: &[SiteId],
    ) -> Result<(SiteId, Vec<RemoteSeries>), SiteError> {
        for &id in enabled {
            let Some(provider) = self.get(id) else {
                debug!(site = %id, "site enabled but not registered");
                continue;
            };
            match provider.search(title).await {
                Ok(results) if results.is_empty() => {
                    debug!(site = %id, "no matches");
                }
                Ok(results) => {
                    info!(site = %id, count = results.len(), "search matched");
                    return Ok((id, results));
                }
                Err(error) => {
                    warn!(site = %id, error = %error, "site search failed, trying next site");
                }
            }
        }
        Err(SiteError::NoSearchResults {
            title: title.to_string(),
        })
    }
}
