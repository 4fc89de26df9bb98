//! Map mode tuple: view, heatmap source, feedback source.

use radzi_core::effects::StorageEffects;
use radzi_core::types::{FeedbackMode, HeatmapMode, MapModeState, ViewMode};
use radzi_core::RadziError;
use std::sync::Arc;
use tokio::sync::watch;

use super::store::{PreferenceSnapshot, PreferenceStore};

/// Map mode preference.
///
/// The toggles read the current in-memory state, so toggling twice always
/// restores the starting value, loaded or not.
#[derive(Debug, Clone)]
pub struct MapModeStore {
    store: PreferenceStore<MapModeState>,
}

impl MapModeStore {
    /// Create the store with the default mode.
    pub fn new(storage: Arc<dyn StorageEffects>) -> Result<Self, RadziError> {
        Ok(Self {
            store: PreferenceStore::new(storage, MapModeState::default())?,
        })
    }

    /// Rehydrate from storage. Runs once.
    pub async fn initialize(&self) {
        self.store.initialize().await;
    }

    /// Full state.
    pub fn state(&self) -> MapModeState {
        self.store.value()
    }

    /// Active view.
    pub fn view_mode(&self) -> ViewMode {
        self.state().view_mode
    }

    /// Heatmap source.
    pub fn heatmap_mode(&self) -> HeatmapMode {
        self.state().heatmap_mode
    }

    /// Feedback source.
    pub fn feedback_mode(&self) -> FeedbackMode {
        self.state().feedback_mode
    }

    /// Whether the persisted state is still being read.
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Personal ↔ global.
    pub fn toggle_heatmap_mode(&self) -> HeatmapMode {
        self.store
            .update(|state| state.with_heatmap_toggled())
            .heatmap_mode
    }

    /// Community ↔ personal.
    pub fn toggle_feedback_mode(&self) -> FeedbackMode {
        self.store
            .update(|state| state.with_feedback_toggled())
            .feedback_mode
    }

    /// Switch between markers and heatmap.
    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.store.update(|state| state.with_view_mode(view_mode));
    }

    /// Wait for queued writes.
    pub async fn flush(&self) {
        self.store.flush().await;
    }

    /// Observe mode changes.
    pub fn subscribe(&self) -> watch::Receiver<PreferenceSnapshot<MapModeState>> {
        self.store.subscribe()
    }
}
