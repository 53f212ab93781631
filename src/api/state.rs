use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        Catalog, CatalogRecommender, OmdbProvider, Recommender, SearchProvider, ServerRegistry,
        VideoLibrary, WatchlistStore,
    },
};

/// Shared application state
///
/// Everything here is built once at startup and handed to handlers; nothing
/// is read from globals.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SearchProvider>,
    pub registry: Arc<ServerRegistry>,
    pub catalog: Arc<Catalog>,
    pub library: VideoLibrary,
    pub recommender: Arc<dyn Recommender>,
    pub watchlist: WatchlistStore,
}

impl AppState {
    /// Creates state around an explicit provider, registry and catalog
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        registry: ServerRegistry,
        catalog: Catalog,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            provider,
            registry: Arc::new(registry),
            recommender: Arc::new(CatalogRecommender::new(catalog.clone())),
            library: VideoLibrary::new(catalog.clone()),
            catalog,
            watchlist: WatchlistStore::new(),
        }
    }

    /// Builds the production state from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = OmdbProvider::new(config.omdb_api_key.clone(), config.omdb_api_url.clone());

        let registry = match config.playback_servers.as_deref() {
            Some(json) => ServerRegistry::from_json(json)?,
            None => ServerRegistry::default(),
        };

        let catalog = Catalog::builtin()?;

        if config.omdb_api_key.is_none() {
            tracing::warn!("OMDB_API_KEY is not set; searches will fail");
        }

        tracing::info!(
            provider = provider.name(),
            servers = registry.len(),
            videos = catalog.videos().len(),
            "Application state initialized"
        );

        Ok(Self::new(Arc::new(provider), registry, catalog))
    }
}
