//! Application core.

use radzi_core::config::RadziConfig;
use radzi_core::RadziError;

use super::effects::AppEffects;
use crate::preferences::{MapLayerStore, MapModeStore};
use crate::queries::{QueryCache, QueryPolicies, StalenessWindows};
use crate::workflows::{Bootstrap, ShareCodeScreen};

/// Headless client core.
///
/// Owns the process-wide query cache and the preference stores. Screens are
/// created per visit through [`AppCore::bootstrap`] and
/// [`AppCore::share_code_screen`].
#[derive(Debug)]
pub struct AppCore {
    config: RadziConfig,
    effects: AppEffects,
    cache: QueryCache,
    queries: QueryPolicies,
    map_layer: MapLayerStore,
    map_mode: MapModeStore,
}

impl AppCore {
    /// Build the core. Must be called inside a tokio runtime.
    pub fn new(
        config: RadziConfig,
        effects: AppEffects,
        is_dark_theme: bool,
    ) -> Result<Self, RadziError> {
        config.validate()?;

        let cache = QueryCache::new(effects.time.clone(), config.cache.capacity);
        let queries = QueryPolicies::new(
            cache.clone(),
            effects.api.clone(),
            StalenessWindows::from(&config.cache),
        );
        let map_layer = MapLayerStore::new(effects.storage.clone(), is_dark_theme)?;
        let map_mode = MapModeStore::new(effects.storage.clone())?;

        tracing::debug!(
            base_url = %config.api.base_url,
            capacity = config.cache.capacity,
            "app core created"
        );

        Ok(Self {
            config,
            effects,
            cache,
            queries,
            map_layer,
            map_mode,
        })
    }

    /// Rehydrate both preference stores concurrently.
    pub async fn initialize_preferences(&self) {
        tokio::join!(self.map_layer.initialize(), self.map_mode.initialize());
    }

    /// Cached read endpoints.
    pub fn queries(&self) -> &QueryPolicies {
        &self.queries
    }

    /// The shared query cache.
    pub fn query_cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Map layer preference.
    pub fn map_layer(&self) -> &MapLayerStore {
        &self.map_layer
    }

    /// Map mode preference.
    pub fn map_mode(&self) -> &MapModeStore {
        &self.map_mode
    }

    /// Mount the splash screen.
    pub fn bootstrap(&self) -> Bootstrap {
        Bootstrap::new(
            self.effects.auth.clone(),
            self.effects.time.clone(),
            self.effects.navigation.clone(),
            self.config.bootstrap.min_delay_ms,
        )
    }

    /// Mount the share-code screen.
    pub fn share_code_screen(&self) -> ShareCodeScreen {
        ShareCodeScreen::new(self.queries.clone(), self.effects.navigation.clone())
    }

    /// Wait for pending preference writes.
    pub async fn flush_preferences(&self) {
        tokio::join!(self.map_layer.flush(), self.map_mode.flush());
    }

    /// Active configuration.
    pub fn config(&self) -> &RadziConfig {
        &self.config
    }
}
