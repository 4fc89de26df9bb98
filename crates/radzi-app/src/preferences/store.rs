//! Persistent preference store
//!
//! A preference is one small value persisted under a fixed storage key. The
//! in-memory value is authoritative: `select` updates it synchronously and
//! hands the new value to the store's writer task, which persists writes in
//! call order and logs (never retries) failures.
//!
//! Startup runs `initialize` once. Until it finishes the store reports
//! `is_loading` and serves the computed default. A `select` made before the
//! persisted value arrives wins over that value.

use parking_lot::Mutex;
use radzi_core::effects::StorageEffects;
use radzi_core::types::{MapLayer, MapModeState};
use radzi_core::RadziError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

// ─────────────────────────────────────────────────────────────────────────────
// Preference encoding
// ─────────────────────────────────────────────────────────────────────────────

/// A value persisted under a fixed storage key.
pub trait Preference: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Device storage key
    const STORAGE_KEY: &'static str;

    /// Bytes written to storage.
    fn encode(&self) -> Result<Vec<u8>, RadziError>;

    /// Parse bytes read from storage.
    fn decode(bytes: &[u8]) -> Result<Self, RadziError>;
}

impl Preference for MapLayer {
    const STORAGE_KEY: &'static str = "@radzi:map_layer";

    fn encode(&self) -> Result<Vec<u8>, RadziError> {
        Ok(self.as_str().as_bytes().to_vec())
    }

    /// Accepts the bare name and, for values written as JSON, a quoted one.
    fn decode(bytes: &[u8]) -> Result<Self, RadziError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| RadziError::serialization(format!("map layer is not UTF-8: {e}")))?
            .trim();
        let name = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text);
        name.parse()
    }
}

impl Preference for MapModeState {
    const STORAGE_KEY: &'static str = "@radzi:map_mode";

    fn encode(&self) -> Result<Vec<u8>, RadziError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn decode(bytes: &[u8]) -> Result<Self, RadziError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Read the persisted value of `P`, falling back to `default`.
///
/// Read and decode failures are logged and answered with the default.
pub async fn load<P: Preference>(storage: &dyn StorageEffects, default: P) -> P {
    match read_persisted::<P>(storage).await {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            tracing::warn!(key = P::STORAGE_KEY, error = %err, "failed to load preference, using default");
            default
        }
    }
}

/// Persist `value` under its storage key.
pub async fn save<P: Preference>(storage: &dyn StorageEffects, value: &P) -> Result<(), RadziError> {
    let bytes = value.encode()?;
    storage.store(P::STORAGE_KEY, bytes).await?;
    Ok(())
}

async fn read_persisted<P: Preference>(storage: &dyn StorageEffects) -> Result<Option<P>, RadziError> {
    match storage.retrieve(P::STORAGE_KEY).await? {
        Some(bytes) => P::decode(&bytes).map(Some),
        None => Ok(None),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Observable state of a preference store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSnapshot<P> {
    /// Current in-memory value
    pub value: P,
    /// The persisted value has not been read yet
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadPhase {
    NotStarted,
    Loading,
    Done,
}

#[derive(Debug)]
struct LoadState {
    phase: LoadPhase,
    selected_before_load: bool,
}

enum WriterCommand<P> {
    Write(P),
    Flush(oneshot::Sender<()>),
}

struct StoreInner<P: Preference> {
    storage: Arc<dyn StorageEffects>,
    snapshot: watch::Sender<PreferenceSnapshot<P>>,
    load: Mutex<LoadState>,
    writer: mpsc::UnboundedSender<WriterCommand<P>>,
}

/// In-memory preference backed by device storage.
///
/// Cloning is cheap; clones share the value and the writer task.
pub struct PreferenceStore<P: Preference> {
    inner: Arc<StoreInner<P>>,
}

impl<P: Preference> Clone for PreferenceStore<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Preference> fmt::Debug for PreferenceStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("key", &P::STORAGE_KEY)
            .field("snapshot", &*self.inner.snapshot.borrow())
            .finish()
    }
}

impl<P: Preference> PreferenceStore<P> {
    /// Create a store serving `default` until initialized.
    ///
    /// Spawns the writer task on the current tokio runtime.
    pub fn new(storage: Arc<dyn StorageEffects>, default: P) -> Result<Self, RadziError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| RadziError::internal(format!("preference store needs a tokio runtime: {e}")))?;

        let (writer, commands) = mpsc::unbounded_channel();
        runtime.spawn(run_writer::<P>(Arc::clone(&storage), commands));

        let (snapshot, _) = watch::channel(PreferenceSnapshot {
            value: default,
            is_loading: true,
        });

        Ok(Self {
            inner: Arc::new(StoreInner {
                storage,
                snapshot,
                load: Mutex::new(LoadState {
                    phase: LoadPhase::NotStarted,
                    selected_before_load: false,
                }),
                writer,
            }),
        })
    }

    /// Read the persisted value once.
    ///
    /// A second call, concurrent or later, returns immediately.
    pub async fn initialize(&self) {
        {
            let mut load = self.inner.load.lock();
            if load.phase != LoadPhase::NotStarted {
                return;
            }
            load.phase = LoadPhase::Loading;
        }

        let persisted = read_persisted::<P>(self.inner.storage.as_ref()).await;
        let loaded = match persisted {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key = P::STORAGE_KEY, error = %err, "failed to load preference, keeping default");
                None
            }
        };

        let mut load = self.inner.load.lock();
        load.phase = LoadPhase::Done;
        let selected = load.selected_before_load;
        if selected && loaded.is_some() {
            tracing::debug!(key = P::STORAGE_KEY, "selection made during load, discarding persisted value");
        }
        self.inner.snapshot.send_modify(|snapshot| {
            if let Some(value) = loaded.filter(|_| !selected) {
                snapshot.value = value;
            }
            snapshot.is_loading = false;
        });
    }

    /// Current value.
    pub fn value(&self) -> P {
        self.inner.snapshot.borrow().value.clone()
    }

    /// Whether the persisted value is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.inner.snapshot.borrow().is_loading
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> PreferenceSnapshot<P> {
        self.inner.snapshot.borrow().clone()
    }

    /// Set the value in memory and queue it for persistence.
    pub fn select(&self, value: P) {
        self.update(|_| value);
    }

    /// Replace the value with `f(current)`.
    ///
    /// The read, the publish and the queued write happen under one lock, so
    /// concurrent updates never act on a stale value.
    pub fn update(&self, f: impl FnOnce(&P) -> P) -> P {
        let mut load = self.inner.load.lock();
        let next = f(&self.inner.snapshot.borrow().value);
        if load.phase != LoadPhase::Done {
            load.selected_before_load = true;
        }
        self.inner
            .snapshot
            .send_modify(|snapshot| snapshot.value = next.clone());
        // queued under the lock so storage order matches memory order
        if self
            .inner
            .writer
            .send(WriterCommand::Write(next.clone()))
            .is_err()
        {
            tracing::warn!(key = P::STORAGE_KEY, "preference writer stopped, value not persisted");
        }
        next
    }

    /// Wait until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.inner.writer.send(WriterCommand::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Observe every change of value or loading state.
    pub fn subscribe(&self) -> watch::Receiver<PreferenceSnapshot<P>> {
        self.inner.snapshot.subscribe()
    }
}

async fn run_writer<P: Preference>(
    storage: Arc<dyn StorageEffects>,
    mut commands: mpsc::UnboundedReceiver<WriterCommand<P>>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            WriterCommand::Write(value) => {
                if let Err(err) = save(storage.as_ref(), &value).await {
                    tracing::warn!(key = P::STORAGE_KEY, error = %err, "failed to persist preference");
                }
            }
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::trace!(key = P::STORAGE_KEY, "preference writer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use radzi_core::types::{HeatmapMode, ViewMode};
    use radzi_testkit::FaultyStorage;
    use std::time::Duration;

    #[test]
    fn map_layer_encodes_bare_name() {
        assert_eq!(MapLayer::Satellite.encode().unwrap(), b"satellite".to_vec());
        assert_eq!(MapLayer::decode(b"outdoors").unwrap(), MapLayer::Outdoors);
        assert_eq!(MapLayer::decode(b"\"streets\"\n").unwrap(), MapLayer::Streets);
        assert!(MapLayer::decode(b"terrain").is_err());
    }

    #[test]
    fn map_mode_encodes_camel_case_json() {
        let bytes = MapModeState::default().encode().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"viewMode":"feedback","heatmapMode":"personal","feedbackMode":"community"}"#
        );
        let decoded = MapModeState::decode(
            br#"{"viewMode":"heatmap","heatmapMode":"global","feedbackMode":"community"}"#,
        )
        .unwrap();
        assert_eq!(decoded.view_mode, ViewMode::Heatmap);
        assert_eq!(decoded.heatmap_mode, HeatmapMode::Global);
    }

    #[tokio::test]
    async fn load_falls_back_on_garbage() {
        let storage = FaultyStorage::with_entries([(MapLayer::STORAGE_KEY, b"\xff\xfe".to_vec())]);
        assert_eq!(load(&storage, MapLayer::Dark).await, MapLayer::Dark);
    }

    #[tokio::test]
    async fn initialize_is_terminal() {
        let storage = FaultyStorage::with_entries([(MapLayer::STORAGE_KEY, b"streets".to_vec())]);
        let store = PreferenceStore::new(Arc::new(storage.clone()), MapLayer::Light).unwrap();
        assert!(store.is_loading());

        store.initialize().await;
        assert_eq!(store.value(), MapLayer::Streets);
        assert!(!store.is_loading());

        storage.set_fail_reads(true);
        store.initialize().await;
        assert_eq!(store.value(), MapLayer::Streets);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_during_load_wins() {
        let storage = FaultyStorage::with_entries([(MapLayer::STORAGE_KEY, b"outdoors".to_vec())]);
        storage.set_read_delay(Duration::from_millis(100));
        let store = PreferenceStore::new(Arc::new(storage.clone()), MapLayer::Light).unwrap();

        let loading = {
            let store = store.clone();
            tokio::spawn(async move { store.initialize().await })
        };
        tokio::task::yield_now().await;
        store.select(MapLayer::Satellite);
        loading.await.unwrap();

        assert_eq!(store.value(), MapLayer::Satellite);
        assert!(!store.is_loading());
        store.flush().await;
        assert_eq!(storage.raw(MapLayer::STORAGE_KEY).await, Some(b"satellite".to_vec()));
    }

    #[tokio::test]
    async fn writes_land_in_call_order() {
        let storage = FaultyStorage::new();
        let store = PreferenceStore::new(Arc::new(storage.clone()), MapLayer::Light).unwrap();

        store.select(MapLayer::Dark);
        store.select(MapLayer::Streets);
        store.select(MapLayer::Satellite);
        store.flush().await;

        let written: Vec<Vec<u8>> = storage.write_log().into_iter().map(|(_, v)| v).collect();
        assert_eq!(
            written,
            vec![b"dark".to_vec(), b"streets".to_vec(), b"satellite".to_vec()]
        );
    }

    #[tokio::test]
    async fn subscribers_see_selection() {
        let store =
            PreferenceStore::new(Arc::new(FaultyStorage::new()), MapModeState::default()).unwrap();
        let mut rx = store.subscribe();

        let next = store.update(|state| state.with_view_mode(ViewMode::Heatmap));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().value, next);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_never_lose_a_flip() {
        let storage = FaultyStorage::new();
        let store =
            PreferenceStore::new(Arc::new(storage.clone()), MapModeState::default()).unwrap();
        store.initialize().await;

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..1001 {
                        store.update(|state| state.with_heatmap_toggled());
                    }
                });
            }
        });

        assert_eq!(store.value(), MapModeState::default());
        store.flush().await;
        assert_eq!(storage.write_log().len(), 8 * 1001);
        assert_eq!(
            storage.raw(MapModeState::STORAGE_KEY).await,
            Some(MapModeState::default().encode().unwrap())
        );
    }
}
