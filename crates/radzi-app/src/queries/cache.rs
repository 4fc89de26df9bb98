//! Process-wide query cache
//!
//! One table shared by every screen, owned by `AppCore` and reachable only
//! through [`QueryCache::query`] and its companions. Remote reads are
//! idempotent GETs, so a staleness window is the whole consistency story:
//! there is no invalidation protocol beyond marking entries stale.
//!
//! # Coalescing
//!
//! Each key owns an async fetch lock and a generation counter that counts
//! completed fetches. A caller that finds the entry stale records the
//! generation, then waits for the lock. If the generation moved while it
//! waited, another caller fetched on its behalf and the waiter returns that
//! outcome (success or error) without calling its own fetcher.
//!
//! # Locking
//!
//! The table sits behind a `parking_lot` mutex that is never held across an
//! await. Mutations between two suspension points are therefore atomic with
//! respect to each other.

use parking_lot::Mutex;
use radzi_core::effects::TimeEffects;
use radzi_core::{CacheKey, RadziError};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

// ─────────────────────────────────────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// No fetch has completed yet
    Pending,
    /// Last fetch succeeded
    Success,
    /// Last fetch failed; `data` may still hold the last good value
    Error,
}

/// Per-call query options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// When false, no fetch is issued and the last known state is returned
    pub enabled: bool,
    /// Age after which a successful entry is refetched
    pub stale_after: Duration,
}

impl QueryOptions {
    /// Enabled query with the given staleness window.
    pub fn stale_after(stale_after: Duration) -> Self {
        Self {
            enabled: true,
            stale_after,
        }
    }

    /// Same options with the enable gate set.
    #[must_use]
    pub fn enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}

/// Snapshot of one cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEntry<T> {
    /// Last successfully fetched value
    pub data: Option<T>,
    /// Lifecycle state
    pub status: QueryStatus,
    /// Error of the last failed fetch, cleared on success
    pub error: Option<RadziError>,
    /// Cache clock reading (ms) of the last successful fetch
    pub last_fetched_at: Option<u64>,
    /// Staleness window the entry was last queried with
    pub stale_after: Duration,
    /// A fetch for this key is in flight
    pub is_fetching: bool,
}

impl<T> QueryEntry<T> {
    /// An entry nothing has been fetched for.
    pub fn pending(stale_after: Duration) -> Self {
        Self {
            data: None,
            status: QueryStatus::Pending,
            error: None,
            last_fetched_at: None,
            stale_after,
            is_fetching: false,
        }
    }

    /// Last fetch succeeded.
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// Last fetch failed.
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// No fetch has completed yet.
    pub fn is_pending(&self) -> bool {
        self.status == QueryStatus::Pending
    }
}

/// What happened to a key, as seen by watchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheEventKind {
    /// A fetch started
    FetchStarted,
    /// A fetch completed (success or error)
    Updated,
    /// Marked stale
    Invalidated,
    /// Dropped by `remove` or `clear`
    Removed,
    /// Dropped by capacity eviction
    Evicted,
}

/// Change notification for one key.
#[derive(Debug, Clone)]
struct CacheEvent {
    key: CacheKey,
    kind: CacheEventKind,
}

/// Diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Queries answered from a fresh entry
    pub hits: u64,
    /// Queries that found the entry stale or absent
    pub misses: u64,
    /// Fetcher invocations
    pub fetches: u64,
    /// Callers that waited on another caller's fetch
    pub coalesced: u64,
    /// Entries dropped for capacity
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Table internals
// ─────────────────────────────────────────────────────────────────────────────

struct Slot {
    value: Option<Box<dyn Any + Send + Sync>>,
    status: QueryStatus,
    error: Option<RadziError>,
    last_fetched_at: Option<u64>,
    stale_after: Duration,
    invalidated: bool,
    is_fetching: bool,
    last_accessed: u64,
    generation: u64,
    fetch_lock: Arc<tokio::sync::Mutex<()>>,
}

impl Slot {
    fn new(stale_after: Duration, tick: u64) -> Self {
        Self {
            value: None,
            status: QueryStatus::Pending,
            error: None,
            last_fetched_at: None,
            stale_after,
            invalidated: false,
            is_fetching: false,
            last_accessed: tick,
            generation: 0,
            fetch_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    fn is_stale(&self, now_ms: u64) -> bool {
        if self.invalidated || self.status != QueryStatus::Success {
            return true;
        }
        let window = u64::try_from(self.stale_after.as_millis()).unwrap_or(u64::MAX);
        self.last_fetched_at
            .map_or(true, |at| now_ms.saturating_sub(at) > window)
    }

    fn is_busy(&self) -> bool {
        self.is_fetching || Arc::strong_count(&self.fetch_lock) > 1
    }

    fn entry<T: Clone + 'static>(&self, key: &CacheKey) -> QueryEntry<T> {
        let data = self.value.as_ref().and_then(|v| {
            let typed = v.downcast_ref::<T>().cloned();
            if typed.is_none() {
                tracing::warn!(key = %key, "cached value has a different type than requested");
            }
            typed
        });
        QueryEntry {
            data,
            status: self.status,
            error: self.error.clone(),
            last_fetched_at: self.last_fetched_at,
            stale_after: self.stale_after,
            is_fetching: self.is_fetching,
        }
    }
}

#[derive(Default)]
struct Table {
    slots: HashMap<CacheKey, Slot>,
    tick: u64,
    stats: CacheStats,
}

impl Table {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn slot_mut(&mut self, key: &CacheKey, stale_after: Duration) -> &mut Slot {
        let tick = self.next_tick();
        let slot = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| Slot::new(stale_after, tick));
        slot.last_accessed = tick;
        slot
    }

    /// Drop least-recently-accessed idle entries until within `capacity`.
    fn evict(&mut self, capacity: usize) -> Vec<CacheKey> {
        let mut evicted = Vec::new();
        while self.slots.len() > capacity {
            let victim = self
                .slots
                .iter()
                .filter(|(_, slot)| !slot.is_busy())
                .min_by_key(|(_, slot)| slot.last_accessed)
                .map(|(key, _)| key.clone());
            let Some(key) = victim else {
                break;
            };
            self.slots.remove(&key);
            self.stats.evictions += 1;
            evicted.push(key);
        }
        evicted
    }
}

struct CacheInner {
    table: Mutex<Table>,
    time: Arc<dyn TimeEffects>,
    capacity: usize,
    events: broadcast::Sender<CacheEvent>,
}

impl CacheInner {
    fn emit(&self, key: &CacheKey, kind: CacheEventKind) {
        // No subscribers is fine
        let _ = self.events.send(CacheEvent {
            key: key.clone(),
            kind,
        });
    }
}

/// Clears `is_fetching` if the fetching caller is dropped before completion.
struct FetchGuard<'a> {
    inner: &'a CacheInner,
    key: &'a CacheKey,
    armed: bool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(slot) = self.inner.table.lock().slots.get_mut(self.key) {
            slot.is_fetching = false;
        }
        tracing::debug!(key = %self.key, "fetch abandoned by caller");
        self.inner.emit(self.key, CacheEventKind::Updated);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// QueryCache
// ─────────────────────────────────────────────────────────────────────────────

/// Shared, staleness-windowed cache for remote reads.
///
/// Cloning is cheap and every clone refers to the same table.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("capacity", &self.inner.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}

impl QueryCache {
    /// Create an empty cache holding at most `capacity` entries.
    pub fn new(time: Arc<dyn TimeEffects>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(CacheInner {
                table: Mutex::new(Table::default()),
                time,
                capacity: capacity.max(1),
                events,
            }),
        }
    }

    /// Run `fetcher` for `key` unless a fresh entry exists.
    ///
    /// - Disabled: no fetch; the last known entry or a pending one.
    /// - Fresh: the cached entry, fetcher untouched.
    /// - Stale or absent: one fetch per key across concurrent callers.
    ///
    /// On failure the previous data is kept next to the error.
    pub async fn query<T, F, Fut>(
        &self,
        key: &CacheKey,
        options: QueryOptions,
        fetcher: F,
    ) -> QueryEntry<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RadziError>>,
    {
        if !options.enabled {
            return self
                .read_entry(key, false)
                .unwrap_or_else(|| QueryEntry::pending(options.stale_after));
        }

        let now = self.inner.time.monotonic_ms();
        let (fetch_lock, observed_generation) = {
            let mut table = self.inner.table.lock();
            let slot = table.slot_mut(key, options.stale_after);
            slot.stale_after = options.stale_after;
            if !slot.is_stale(now) {
                let entry = slot.entry(key);
                table.stats.hits += 1;
                tracing::debug!(key = %key, "query cache hit");
                return entry;
            }
            let pair = (slot.fetch_lock.clone(), slot.generation);
            table.stats.misses += 1;
            pair
        };

        let _fetch_guard = fetch_lock.lock().await;

        {
            let mut table = self.inner.table.lock();
            let slot = table.slot_mut(key, options.stale_after);
            if slot.generation != observed_generation {
                let entry = slot.entry(key);
                table.stats.coalesced += 1;
                tracing::debug!(key = %key, "joined in-flight fetch");
                return entry;
            }
            slot.is_fetching = true;
            table.stats.fetches += 1;
        }
        self.inner.emit(key, CacheEventKind::FetchStarted);
        tracing::debug!(key = %key, "query cache miss, fetching");

        let mut abandon = FetchGuard {
            inner: &self.inner,
            key,
            armed: true,
        };
        let result = fetcher().await;
        abandon.armed = false;

        let completed_at = self.inner.time.monotonic_ms();
        let (entry, evicted) = {
            let mut table = self.inner.table.lock();
            let slot = table.slot_mut(key, options.stale_after);
            slot.generation += 1;
            slot.is_fetching = false;
            match result {
                Ok(data) => {
                    slot.value = Some(Box::new(data));
                    slot.status = QueryStatus::Success;
                    slot.error = None;
                    slot.last_fetched_at = Some(completed_at);
                    slot.invalidated = false;
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "query fetch failed");
                    slot.status = QueryStatus::Error;
                    slot.error = Some(err);
                }
            }
            let entry = slot.entry(key);
            let capacity = self.inner.capacity;
            (entry, table.evict(capacity))
        };

        self.inner.emit(key, CacheEventKind::Updated);
        for evicted_key in &evicted {
            tracing::debug!(key = %evicted_key, "evicted least recently used entry");
            self.inner.emit(evicted_key, CacheEventKind::Evicted);
        }
        entry
    }

    /// Current entry without fetching. Counts as an access for eviction.
    pub fn peek<T: Clone + Send + Sync + 'static>(&self, key: &CacheKey) -> Option<QueryEntry<T>> {
        self.read_entry(key, true)
    }

    fn read_entry<T: Clone + Send + Sync + 'static>(
        &self,
        key: &CacheKey,
        touch: bool,
    ) -> Option<QueryEntry<T>> {
        let mut table = self.inner.table.lock();
        let tick = if touch { Some(table.next_tick()) } else { None };
        let slot = table.slots.get_mut(key)?;
        if let Some(tick) = tick {
            slot.last_accessed = tick;
        }
        Some(slot.entry(key))
    }

    /// Mark `key` stale so the next enabled query refetches it.
    ///
    /// Cached data stays readable until the refetch completes.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let found = match self.inner.table.lock().slots.get_mut(key) {
            Some(slot) => {
                slot.invalidated = true;
                true
            }
            None => false,
        };
        if found {
            self.inner.emit(key, CacheEventKind::Invalidated);
        }
        found
    }

    /// Mark every key of the family `[domain, subdomain?]` stale.
    pub fn invalidate_prefix(&self, domain: &str, subdomain: Option<&str>) -> usize {
        let keys: Vec<CacheKey> = {
            let mut table = self.inner.table.lock();
            table
                .slots
                .iter_mut()
                .filter(|(key, _)| key.matches_prefix(domain, subdomain))
                .map(|(key, slot)| {
                    slot.invalidated = true;
                    key.clone()
                })
                .collect()
        };
        for key in &keys {
            self.inner.emit(key, CacheEventKind::Invalidated);
        }
        keys.len()
    }

    /// Drop the entry for `key`.
    pub fn remove(&self, key: &CacheKey) -> bool {
        let removed = self.inner.table.lock().slots.remove(key).is_some();
        if removed {
            self.inner.emit(key, CacheEventKind::Removed);
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let keys: Vec<CacheKey> = self.inner.table.lock().slots.drain().map(|(k, _)| k).collect();
        for key in &keys {
            self.inner.emit(key, CacheEventKind::Removed);
        }
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> CacheStats {
        let table = self.inner.table.lock();
        CacheStats {
            size: table.slots.len(),
            ..table.stats
        }
    }

    /// Register interest in `key`.
    pub fn subscribe<T: Clone + Send + Sync + 'static>(&self, key: &CacheKey) -> QueryWatcher<T> {
        QueryWatcher {
            cache: self.clone(),
            key: key.clone(),
            events: self.inner.events.subscribe(),
            _marker: PhantomData,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Watchers
// ─────────────────────────────────────────────────────────────────────────────

/// Observer for one key.
///
/// Independent of any rendering model: a consumer awaits [`changed`] and
/// re-renders from the returned snapshot.
///
/// [`changed`]: QueryWatcher::changed
pub struct QueryWatcher<T> {
    cache: QueryCache,
    key: CacheKey,
    events: broadcast::Receiver<CacheEvent>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Clone + Send + Sync + 'static> QueryWatcher<T> {
    /// The watched key.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Current snapshot, `None` if the key has no entry.
    pub fn current(&self) -> Option<QueryEntry<T>> {
        self.cache.read_entry(&self.key, false)
    }

    /// Wait for the next change to the key and return the new snapshot.
    ///
    /// Returns `Some(None)` when the entry was removed or evicted, and
    /// `None` once the cache itself is gone.
    pub async fn changed(&mut self) -> Option<Option<QueryEntry<T>>> {
        loop {
            match self.events.recv().await {
                Ok(event) if event.key == self.key => {
                    tracing::trace!(key = %self.key, kind = ?event.kind, "watched entry changed");
                    return Some(self.current());
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(key = %self.key, skipped, "watcher lagged, resyncing");
                    return Some(self.current());
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use radzi_testkit::SimulatedTimeHandler;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_with_clock(capacity: usize) -> (QueryCache, SimulatedTimeHandler) {
        let time = SimulatedTimeHandler::new(0);
        (QueryCache::new(Arc::new(time.clone()), capacity), time)
    }

    fn key(bbox: &str) -> CacheKey {
        CacheKey::new("feedback", "global").with_param("bbox", bbox)
    }

    fn two_minutes() -> QueryOptions {
        QueryOptions::stale_after(Duration::from_secs(120))
    }

    #[tokio::test]
    async fn fresh_entry_skips_fetcher() {
        let (cache, time) = cache_with_clock(16);
        let calls = &AtomicUsize::new(0);

        for _ in 0..3 {
            let entry = cache
                .query(&key("-10,35,20,65"), two_minutes(), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1u32, 2, 3])
                })
                .await;
            assert_eq!(entry.data, Some(vec![1, 2, 3]));
            time.advance_secs(30);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.fetches), (2, 1, 1));
    }

    #[tokio::test]
    async fn entry_refetches_once_window_has_passed() {
        let (cache, time) = cache_with_clock(16);
        let calls = &AtomicUsize::new(0);
        let fetch = move || async move {
            Ok::<_, RadziError>(calls.fetch_add(1, Ordering::SeqCst))
        };

        cache.query(&key("a"), two_minutes(), fetch).await;
        time.advance_secs(120);
        let at_boundary = cache.query(&key("a"), two_minutes(), fetch).await;
        assert_eq!(at_boundary.data, Some(0));

        time.advance_ms(1);
        let refreshed = cache.query(&key("a"), two_minutes(), fetch).await;
        assert_eq!(refreshed.data, Some(1));
        assert_eq!(refreshed.last_fetched_at, Some(120_001));
    }

    #[tokio::test]
    async fn disabled_query_never_fetches() {
        let (cache, _time) = cache_with_clock(16);
        let calls = &AtomicUsize::new(0);
        let entry: QueryEntry<u32> = cache
            .query(&key("a"), two_minutes().enabled(false), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(entry.is_pending());
        assert_eq!(entry.error, None);
        assert_eq!(cache.stats().size, 0);
    }

    #[tokio::test]
    async fn failure_keeps_last_good_data() {
        let (cache, time) = cache_with_clock(16);
        cache
            .query(&key("a"), two_minutes(), || async { Ok(7u32) })
            .await;
        time.advance_secs(121);

        let entry = cache
            .query(&key("a"), two_minutes(), || async {
                Err::<u32, _>(RadziError::network("offline"))
            })
            .await;

        assert!(entry.is_error());
        assert_eq!(entry.data, Some(7));
        assert_eq!(entry.last_fetched_at, Some(0));
        assert_eq!(entry.error, Some(RadziError::network("offline")));
    }

    #[tokio::test]
    async fn error_entry_is_retried_on_next_query() {
        let (cache, _time) = cache_with_clock(16);
        cache
            .query(&key("a"), two_minutes(), || async {
                Err::<u32, _>(RadziError::network("offline"))
            })
            .await;
        let entry = cache
            .query(&key("a"), two_minutes(), || async { Ok(1u32) })
            .await;
        assert!(entry.is_success());
        assert_eq!(entry.error, None);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch_but_keeps_data_visible() {
        let (cache, _time) = cache_with_clock(16);
        cache.query(&key("a"), two_minutes(), || async { Ok(1u32) }).await;

        assert!(cache.invalidate(&key("a")));
        assert_eq!(cache.peek::<u32>(&key("a")).unwrap().data, Some(1));

        let entry = cache.query(&key("a"), two_minutes(), || async { Ok(2u32) }).await;
        assert_eq!(entry.data, Some(2));
        assert!(!cache.invalidate(&key("missing")));
    }

    #[tokio::test]
    async fn invalidate_prefix_touches_only_family() {
        let (cache, _time) = cache_with_clock(16);
        let personal = CacheKey::new("road_sections", "personal");
        let community = CacheKey::new("road_sections", "community");
        for k in [&personal, &community, &key("a")] {
            cache.query(k, two_minutes(), || async { Ok(0u8) }).await;
        }

        assert_eq!(cache.invalidate_prefix("road_sections", None), 2);
        let fetched = &AtomicUsize::new(0);
        cache
            .query(&key("a"), two_minutes(), move || async move {
                fetched.fetch_add(1, Ordering::SeqCst);
                Ok(0u8)
            })
            .await;
        assert_eq!(fetched.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn least_recently_used_entry_is_evicted() {
        let (cache, _time) = cache_with_clock(2);
        cache.query(&key("a"), two_minutes(), || async { Ok(1u8) }).await;
        cache.query(&key("b"), two_minutes(), || async { Ok(2u8) }).await;
        // touch "a" so "b" becomes the oldest
        assert!(cache.peek::<u8>(&key("a")).is_some());
        cache.query(&key("c"), two_minutes(), || async { Ok(3u8) }).await;

        assert!(cache.peek::<u8>(&key("a")).is_some());
        assert!(cache.peek::<u8>(&key("b")).is_none());
        assert!(cache.peek::<u8>(&key("c")).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_with_fetch_in_flight_is_never_evicted() {
        let (cache, _time) = cache_with_clock(1);
        let slow_calls = &AtomicUsize::new(0);
        let slow_fetch = move || async move {
            slow_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(1u8)
        };

        let key_a = key("a");
        let (first, waiter, mut watcher) = tokio::join!(
            cache.query(&key_a, two_minutes(), slow_fetch),
            cache.query(&key_a, two_minutes(), slow_fetch),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let b = cache
                    .query(&key("b"), two_minutes(), || async { Ok(2u8) })
                    .await;
                assert_eq!(b.data, Some(2));

                // over capacity, but "a" is still fetching
                let a = cache.peek::<u8>(&key("a")).unwrap();
                assert!(a.is_fetching);
                assert_eq!(cache.stats().evictions, 0);
                cache.subscribe::<u8>(&key("b"))
            }
        );

        assert_eq!(first.data, Some(1));
        assert_eq!(waiter.data, Some(1));
        assert_eq!(slow_calls.load(Ordering::SeqCst), 1);

        // "a" completing pushed out the idle "b"
        assert_eq!(watcher.changed().await, Some(None));
        assert!(cache.peek::<u8>(&key("a")).is_some());
        assert!(cache.peek::<u8>(&key("b")).is_none());
        let stats = cache.stats();
        assert_eq!((stats.coalesced, stats.evictions, stats.size), (1, 1, 1));
    }

    #[tokio::test]
    async fn watcher_sees_fetch_lifecycle() {
        let (cache, _time) = cache_with_clock(16);
        let mut watcher = cache.subscribe::<u32>(&key("a"));

        cache.query(&key("a"), two_minutes(), || async { Ok(5u32) }).await;

        // fetch started, then updated
        for _ in 0..2 {
            let seen = watcher.changed().await.unwrap().unwrap();
            assert_eq!(seen.data, Some(5));
            assert!(!seen.is_fetching);
        }

        cache.remove(&key("a"));
        assert_eq!(watcher.changed().await, Some(None));
    }

    #[tokio::test]
    async fn watcher_ignores_other_keys() {
        let (cache, _time) = cache_with_clock(16);
        let mut watcher = cache.subscribe::<u32>(&key("a"));

        cache.query(&key("b"), two_minutes(), || async { Ok(1u32) }).await;
        cache.query(&key("a"), two_minutes(), || async { Ok(2u32) }).await;

        let first = watcher.changed().await.unwrap().unwrap();
        assert_eq!(first.data, Some(2));
        assert_eq!(watcher.key(), &key("a"));
        assert_eq!(watcher.current().unwrap().data, Some(2));
    }

    proptest! {
        #[test]
        fn fetches_only_after_window_elapses(steps in prop::collection::vec(0u64..200_000, 1..20)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (fetches, expected) = runtime.block_on(async {
                let (cache, time) = cache_with_clock(4);
                let calls = &AtomicUsize::new(0);
                let mut expected = 0usize;
                let mut last_fetch: Option<u64> = None;
                for step in &steps {
                    time.advance_ms(*step);
                    let now = time.now_ms();
                    if last_fetch.map_or(true, |at| now - at > 120_000) {
                        expected += 1;
                        last_fetch = Some(now);
                    }
                    cache
                        .query(&key("p"), two_minutes(), move || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .await;
                }
                (calls.load(Ordering::SeqCst), expected)
            });
            prop_assert_eq!(fetches, expected);
        }
    }
}
