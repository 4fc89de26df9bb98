//! Time effect traits.
//!
//! The client only needs a monotonic clock (for staleness windows) and a
//! way to sleep (for the bootstrap's minimum presentation delay).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for time operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// Timer could not be armed
    #[error("Time service unavailable")]
    ServiceUnavailable,
    /// Other failure
    #[error("Operation failed: {reason}")]
    OperationFailed {
        /// Failure detail
        reason: String,
    },
}

/// Monotonic clock and timers.
#[async_trait]
pub trait TimeEffects: Send + Sync {
    /// Milliseconds elapsed on a monotonic clock with an arbitrary origin.
    ///
    /// Only differences between two readings from the same handler are
    /// meaningful.
    fn monotonic_ms(&self) -> u64;

    /// Suspend the calling task for `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError>;
}
