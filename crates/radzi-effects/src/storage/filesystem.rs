//! Filesystem-backed device storage.
//!
//! Every key becomes one file under `base_path`. Keys such as
//! `@radzi:map_layer` contain characters that are not portable in file
//! names, so names are percent-encoded. Writes go to a temporary sibling
//! first and are renamed into place, which keeps single-key writes atomic.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use radzi_core::effects::{StorageEffects, StorageError};
use std::path::PathBuf;
use tokio::fs;

const FILE_SUFFIX: &str = ".dat";

const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Filesystem-based storage handler for production use
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    /// Base directory for storage files
    base_path: PathBuf,
}

impl FilesystemStorageHandler {
    /// Create a handler rooted at `base_path`. The directory is created on
    /// first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let name = utf8_percent_encode(key, KEY_ENCODE_SET).to_string();
        self.base_path.join(format!("{name}{FILE_SUFFIX}"))
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            reason: "Key cannot be empty".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        validate_key(key)?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to create directory: {e}")))?;

        let file_path = self.file_path(key);
        let tmp_path = file_path.with_extension("tmp");
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write file: {e}")))?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to commit file: {e}")))?;

        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        match fs::read(self.file_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("Failed to read file: {e}"))),
        }
    }
}
