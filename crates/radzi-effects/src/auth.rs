//! Stored-token authentication check.
//!
//! The sign-in flow (out of scope here) writes the session token under
//! [`AUTH_TOKEN_KEY`]. The client core only needs to know whether one is
//! present.

use async_trait::async_trait;
use radzi_core::effects::{AuthEffects, AuthError, StorageEffects};
use std::sync::Arc;

/// Storage key of the session token.
pub const AUTH_TOKEN_KEY: &str = "@radzi:auth_token";

/// Reports "authenticated" when a non-empty session token is stored.
pub struct StoredTokenAuthHandler {
    storage: Arc<dyn StorageEffects>,
}

impl StoredTokenAuthHandler {
    /// Check tokens in `storage`.
    pub fn new(storage: Arc<dyn StorageEffects>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl AuthEffects for StoredTokenAuthHandler {
    async fn is_authenticated(&self) -> Result<bool, AuthError> {
        let token = self
            .storage
            .retrieve(AUTH_TOKEN_KEY)
            .await
            .map_err(|e| AuthError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(token.is_some_and(|t| !t.iter().all(u8::is_ascii_whitespace)))
    }
}
