//! Selected base-map style.

use radzi_core::effects::StorageEffects;
use radzi_core::types::MapLayer;
use radzi_core::RadziError;
use std::sync::Arc;
use tokio::sync::watch;

use super::store::{PreferenceSnapshot, PreferenceStore};

/// Map layer preference, defaulting to the theme's layer.
#[derive(Debug, Clone)]
pub struct MapLayerStore {
    store: PreferenceStore<MapLayer>,
}

impl MapLayerStore {
    /// Create the store; the default follows the color scheme.
    pub fn new(storage: Arc<dyn StorageEffects>, is_dark_theme: bool) -> Result<Self, RadziError> {
        Ok(Self {
            store: PreferenceStore::new(storage, MapLayer::default_for_theme(is_dark_theme))?,
        })
    }

    /// Rehydrate from storage. Runs once.
    pub async fn initialize(&self) {
        self.store.initialize().await;
    }

    /// Active layer.
    pub fn map_layer(&self) -> MapLayer {
        self.store.value()
    }

    /// Whether the persisted layer is still being read.
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Switch layers; persisted in the background.
    pub fn select_layer(&self, layer: MapLayer) {
        tracing::debug!(layer = %layer, "map layer selected");
        self.store.select(layer);
    }

    /// Wait for queued writes.
    pub async fn flush(&self) {
        self.store.flush().await;
    }

    /// Observe layer changes.
    pub fn subscribe(&self) -> watch::Receiver<PreferenceSnapshot<MapLayer>> {
        self.store.subscribe()
    }
}
