//! Screen liveness shared between a screen and the tasks it started.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mounted flag of one screen visit.
///
/// Clones share the flag. Work that completes after `unmount` must not
/// navigate.
#[derive(Debug, Clone)]
pub struct ScreenLifetime {
    mounted: Arc<AtomicBool>,
}

impl Default for ScreenLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenLifetime {
    /// A mounted screen.
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the screen gone. Idempotent.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Whether the screen is still shown.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let lifetime = ScreenLifetime::new();
        let task_view = lifetime.clone();
        assert!(task_view.is_mounted());

        lifetime.unmount();
        lifetime.unmount();
        assert!(!task_view.is_mounted());
    }
}
