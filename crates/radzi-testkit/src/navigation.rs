//! Navigation handler that records every replacement.

use parking_lot::Mutex;
use radzi_core::effects::NavigationEffects;
use radzi_core::types::Route;
use std::sync::Arc;

/// Records route replacements in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All replacements so far.
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }

    /// Number of replacements so far.
    pub fn count(&self) -> usize {
        self.routes.lock().len()
    }
}

impl NavigationEffects for RecordingNavigator {
    fn replace(&self, route: &Route) {
        self.routes.lock().push(route.clone());
    }
}
