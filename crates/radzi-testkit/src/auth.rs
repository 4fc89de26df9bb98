//! Authentication handler with scripted outcome and latency.

use async_trait::async_trait;
use radzi_core::effects::{AuthEffects, AuthError};
use std::time::Duration;

/// Answers `is_authenticated` with a fixed outcome after a fixed delay.
///
/// The delay uses tokio's clock, so tests running with paused time control
/// it precisely.
#[derive(Debug, Clone)]
pub struct ScriptedAuth {
    outcome: Result<bool, AuthError>,
    delay: Duration,
}

impl ScriptedAuth {
    /// Signed in, answering immediately.
    pub fn authenticated() -> Self {
        Self {
            outcome: Ok(true),
            delay: Duration::ZERO,
        }
    }

    /// Signed out, answering immediately.
    pub fn unauthenticated() -> Self {
        Self {
            outcome: Ok(false),
            delay: Duration::ZERO,
        }
    }

    /// The check itself fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(AuthError::Unavailable {
                reason: reason.into(),
            }),
            delay: Duration::ZERO,
        }
    }

    /// Answer only after `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl AuthEffects for ScriptedAuth {
    async fn is_authenticated(&self) -> Result<bool, AuthError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}
