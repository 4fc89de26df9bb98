//! Real time effect handler for production use
//!
//! Built on tokio's clock, so a runtime with paused time (tests) drives it
//! deterministically.

use async_trait::async_trait;
use radzi_core::effects::{TimeEffects, TimeError};
use std::time::Duration;
use tokio::time::{self, Instant};

/// Real time handler for production use
#[derive(Debug, Clone)]
pub struct RealTimeHandler {
    origin: Instant,
}

impl Default for RealTimeHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RealTimeHandler {
    /// Create a handler whose monotonic origin is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

#[async_trait]
impl TimeEffects for RealTimeHandler {
    fn monotonic_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}
