//! Persisted map preferences.

pub mod map_layer;
pub mod map_mode;
pub mod store;

pub use map_layer::MapLayerStore;
pub use map_mode::MapModeStore;
pub use store::{load, save, Preference, PreferenceSnapshot, PreferenceStore};
