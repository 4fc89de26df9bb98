//! Simulated time effect handler for testing

use async_trait::async_trait;
use parking_lot::Mutex;
use radzi_core::effects::{TimeEffects, TimeError};
use std::sync::Arc;

/// Manually driven clock.
///
/// `sleep_ms` advances the clock by the requested amount and yields once,
/// so code under test never waits on wall time.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTimeHandler {
    current_ms: Arc<Mutex<u64>>,
}

impl SimulatedTimeHandler {
    /// Create a clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            current_ms: Arc::new(Mutex::new(start_ms)),
        }
    }

    /// Move the clock forward.
    pub fn advance_ms(&self, ms: u64) {
        *self.current_ms.lock() += ms;
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs * 1000);
    }

    /// Current reading.
    pub fn now_ms(&self) -> u64 {
        *self.current_ms.lock()
    }
}

#[async_trait]
impl TimeEffects for SimulatedTimeHandler {
    fn monotonic_ms(&self) -> u64 {
        self.now_ms()
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        self.advance_ms(ms);
        tokio::task::yield_now().await;
        Ok(())
    }
}
