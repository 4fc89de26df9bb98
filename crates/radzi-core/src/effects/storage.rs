//! Storage effect trait.
//!
//! A flat string-keyed byte store, the shape of the device key-value store
//! preferences are persisted to. Single-key writes are atomic; nothing
//! stronger is promised.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Key rejected by the backend
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// Read failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Write failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Device key-value store.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Read the value under `key`; `Ok(None)` when nothing was stored.
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
}
