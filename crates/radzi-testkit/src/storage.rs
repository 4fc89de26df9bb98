//! Storage handler with failure injection.

use async_trait::async_trait;
use parking_lot::Mutex;
use radzi_core::effects::{StorageEffects, StorageError};
use radzi_effects::MemoryStorageHandler;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory storage whose reads and writes can be made to fail or lag.
///
/// Every attempted write is recorded (successful or not) so tests can check
/// ordering and fire-and-forget behavior.
#[derive(Debug, Clone, Default)]
pub struct FaultyStorage {
    inner: MemoryStorageHandler,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    read_delay: Arc<Mutex<Duration>>,
    write_delay: Arc<Mutex<Duration>>,
    write_log: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl FaultyStorage {
    /// Empty, healthy storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Healthy storage pre-populated with `entries`.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        Self {
            inner: MemoryStorageHandler::with_entries(entries),
            ..Self::default()
        }
    }

    /// Make every read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every read by `delay` (tokio clock).
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock() = delay;
    }

    /// Delay every write by `delay` (tokio clock).
    pub fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock() = delay;
    }

    /// Every attempted write, in the order it reached storage.
    pub fn write_log(&self) -> Vec<(String, Vec<u8>)> {
        self.write_log.lock().clone()
    }

    /// Current stored value, bypassing failure injection.
    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.retrieve(key).await.ok().flatten()
    }

    async fn pause(delay: &Mutex<Duration>) {
        let delay = *delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl StorageEffects for FaultyStorage {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        Self::pause(&self.write_delay).await;
        self.write_log.lock().push((key.to_string(), value.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("injected write failure".into()));
        }
        self.inner.store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Self::pause(&self.read_delay).await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed("injected read failure".into()));
        }
        self.inner.retrieve(key).await
    }
}
