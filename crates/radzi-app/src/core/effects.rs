//! Effect handler bundle injected into `AppCore`.

use radzi_core::config::RadziConfig;
use radzi_core::effects::{
    AuthEffects, NavigationEffects, RadziApiEffects, StorageEffects, TimeEffects,
};
use radzi_core::RadziError;
use radzi_effects::{
    FilesystemStorageHandler, HttpApiHandler, RealTimeHandler, StoredTokenAuthHandler,
};
use std::sync::Arc;

/// Handlers for every side effect the core performs.
#[derive(Clone)]
pub struct AppEffects {
    /// Device key-value store
    pub storage: Arc<dyn StorageEffects>,
    /// Monotonic clock and timers
    pub time: Arc<dyn TimeEffects>,
    /// Remote read endpoints
    pub api: Arc<dyn RadziApiEffects>,
    /// Signed-in check
    pub auth: Arc<dyn AuthEffects>,
    /// Route replacement
    pub navigation: Arc<dyn NavigationEffects>,
}

impl std::fmt::Debug for AppEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEffects").finish_non_exhaustive()
    }
}

impl AppEffects {
    /// Production handlers from `radzi-effects`.
    ///
    /// Navigation is host-specific and always injected.
    pub fn production(
        config: &RadziConfig,
        navigation: Arc<dyn NavigationEffects>,
    ) -> Result<Self, RadziError> {
        let storage: Arc<dyn StorageEffects> =
            Arc::new(FilesystemStorageHandler::new(config.storage.base_path.clone()));
        let api = HttpApiHandler::from_config(&config.api)?;

        Ok(Self {
            auth: Arc::new(StoredTokenAuthHandler::new(Arc::clone(&storage))),
            storage,
            time: Arc::new(RealTimeHandler::new()),
            api: Arc::new(api),
            navigation,
        })
    }
}
