//! Authentication capability.
//!
//! Token management lives elsewhere; the client core only asks whether a
//! signed-in session exists.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for the authentication check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AuthError {
    /// Secure storage or session backend unavailable
    #[error("Auth backend unavailable: {reason}")]
    Unavailable {
        /// Failure detail
        reason: String,
    },
    /// Stored session could not be interpreted
    #[error("Invalid session: {reason}")]
    InvalidSession {
        /// Failure detail
        reason: String,
    },
}

/// Opaque "is the user signed in" capability.
#[async_trait]
pub trait AuthEffects: Send + Sync {
    /// Whether a signed-in session exists.
    async fn is_authenticated(&self) -> Result<bool, AuthError>;
}
