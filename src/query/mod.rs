// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Async-cached query containers.
//!
//! [`CachedQuery`] coordinates one logical asynchronous value: concurrent
//! callers of an uncached query share a single underlying fetch, a previous
//! good value stays visible while a refetch is attempted
//! (stale-while-revalidate), and fetch failures are recorded on the query
//! rather than thrown at whoever happened to trigger the fetch.
//!
//! # Workflow
//!
//! 1. Construct the query with a [`QueryFetcher`] describing how to load it
//! 2. Dependents call [`CachedQuery::await_ready`] once at bootstrap
//! 3. Subsequent reads are synchronous against the last good value
//! 4. `refetch`/`invalidate` refresh on demand; there is no built-in TTL
//!
//! # Example
//!
//! ```rust,ignore
//! use walletscan::{CachedQuery, QueryFetcher};
//!
//! struct TagFetcher { /* client, url */ }
//!
//! #[async_trait::async_trait]
//! impl QueryFetcher for TagFetcher {
//!     type Output = TagMap;
//!     async fn fetch(&self) -> Result<TagMap, QueryError> { /* GET + decode */ }
//! }
//!
//! let query = CachedQuery::new(TagFetcher { /* … */ });
//! query.await_ready().await;
//! let tags = query.data(); // synchronous from here on
//! ```
//!
//! Cancellation is not supported: an in-flight fetch always runs to
//! completion (driven by a spawned task) and its result is cached for
//! future consumers even if the original caller has moved on. Eviction and
//! TTL are caller policy, not enforced here.

mod observable;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::errors::QueryError;

pub use observable::{Observable, SubscriptionId};

/// Readiness of a [`CachedQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No fetch has been attempted yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded; `data()` is current
    Ready,
    /// The last fetch failed; `data()` may still hold a previous good value
    Error,
}

/// How a [`CachedQuery`] loads its value.
///
/// Implementations own everything the fetch needs (client, URL, decoding).
/// The trait is object-safe so queries can hold `Arc<dyn QueryFetcher>`.
#[async_trait]
pub trait QueryFetcher: Send + Sync + 'static {
    /// The value this fetcher produces.
    type Output: Clone + Send + Sync + 'static;

    /// Perform one fetch attempt.
    async fn fetch(&self) -> Result<Self::Output, QueryError>;
}

/// A coalesced in-flight fetch, awaitable by any number of callers.
type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, QueryError>>>;

struct QueryState<T> {
    data: Option<T>,
    status: QueryStatus,
    error: Option<QueryError>,
    in_flight: Option<SharedFetch<T>>,
    /// Incremented per started fetch; a settling fetch only writes back if
    /// it is still the current generation (a forced refetch supersedes it).
    generation: u64,
}

struct QueryInner<T> {
    state: Mutex<QueryState<T>>,
    status_feed: Observable<QueryStatus>,
    fetcher: Arc<dyn QueryFetcher<Output = T>>,
    coalesce: AtomicBool,
}

impl<T: Clone + Send + Sync + 'static> QueryInner<T> {
    fn settle(&self, generation: u64, result: &Result<T, QueryError>) {
        let status = {
            let mut state = self.state.lock();
            if state.generation != generation {
                // Superseded by a forced refetch. The result still resolves
                // for callers awaiting this fetch, but state belongs to the
                // newer generation.
                return;
            }
            state.in_flight = None;
            match result {
                Ok(value) => {
                    state.data = Some(value.clone());
                    state.error = None;
                    state.status = QueryStatus::Ready;
                }
                Err(error) => {
                    debug!(error = %error, "query fetch failed");
                    // Stale-while-revalidate: previous good data survives.
                    state.error = Some(error.clone());
                    state.status = QueryStatus::Error;
                }
            }
            state.status
        };
        self.status_feed.publish(status);
    }
}

/// Generic async-cached container for one logical value.
///
/// Cloning is cheap and every clone views the same cache entry. See the
/// [module docs](self) for the lifecycle.
pub struct CachedQuery<T: Clone + Send + Sync + 'static> {
    inner: Arc<QueryInner<T>>,
}

impl<T: Clone + Send + Sync + 'static> Clone for CachedQuery<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> CachedQuery<T> {
    /// Create a query that loads through `fetcher`.
    pub fn new(fetcher: impl QueryFetcher<Output = T>) -> Self {
        Self::with_fetcher(Arc::new(fetcher))
    }

    /// Create a query from an already-shared fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn QueryFetcher<Output = T>>) -> Self {
        Self {
            inner: Arc::new(QueryInner {
                state: Mutex::new(QueryState {
                    data: None,
                    status: QueryStatus::Idle,
                    error: None,
                    in_flight: None,
                    generation: 0,
                }),
                status_feed: Observable::new(),
                fetcher,
                coalesce: AtomicBool::new(true),
            }),
        }
    }

    /// Enable or disable fetch coalescing (on by default).
    ///
    /// With coalescing off, `get` during a load starts a fresh fetch
    /// instead of joining the in-flight one.
    pub fn set_coalescing(&self, enabled: bool) {
        self.inner.coalesce.store(enabled, Ordering::Relaxed);
    }

    /// Last successfully fetched value, if any.
    pub fn data(&self) -> Option<T> {
        self.inner.state.lock().data.clone()
    }

    /// Current readiness.
    pub fn status(&self) -> QueryStatus {
        self.inner.state.lock().status
    }

    /// Error recorded by the most recent failed fetch, cleared by the next
    /// successful one (or by `refetch` starting a new attempt).
    pub fn error(&self) -> Option<QueryError> {
        self.inner.state.lock().error.clone()
    }

    /// Whether a fetch is currently in flight.
    pub fn is_fetching(&self) -> bool {
        self.inner.state.lock().in_flight.is_some()
    }

    /// Subscribe to status transitions. Every started fetch publishes
    /// `Loading`, every settled fetch publishes `Ready` or `Error`.
    pub fn subscribe(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<QueryStatus>) {
        self.inner.status_feed.subscribe()
    }

    /// Remove a status subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.status_feed.unsubscribe(id);
    }

    /// Get the cached value, fetching it if necessary.
    ///
    /// Cached (`Ready`, or `Error` with surviving stale data) values return
    /// without touching the network. While a coalesced fetch is in flight
    /// every caller awaits that same fetch, so for N concurrent callers of an
    /// uncached query, exactly one underlying fetch executes.
    pub async fn get(&self) -> Result<T, QueryError> {
        let (fetch, started) = {
            let mut state = self.inner.state.lock();
            if matches!(state.status, QueryStatus::Ready | QueryStatus::Error) {
                if let Some(data) = &state.data {
                    return Ok(data.clone());
                }
            }
            match (&state.in_flight, self.inner.coalesce.load(Ordering::Relaxed)) {
                (Some(existing), true) => (existing.clone(), false),
                _ => (self.begin_fetch(&mut state), true),
            }
        };
        if started {
            self.drive(&fetch);
        }
        fetch.await
    }

    /// Discard any recorded error and fetch again.
    ///
    /// While a fetch is already in flight this joins it unless `force` is
    /// set, in which case a new fetch supersedes the old one. On success
    /// the value is replaced and the error cleared; on failure the previous
    /// good value (if any) stays visible and the error is recorded.
    pub async fn refetch(&self, force: bool) -> Result<T, QueryError> {
        let (fetch, started) = {
            let mut state = self.inner.state.lock();
            match (&state.in_flight, force) {
                (Some(existing), false) => (existing.clone(), false),
                _ => {
                    state.error = None;
                    (self.begin_fetch(&mut state), true)
                }
            }
        };
        if started {
            self.drive(&fetch);
        }
        fetch.await
    }

    /// Schedule a refetch without awaiting it.
    ///
    /// For reactive invalidation (e.g. the preferred currency changed): the
    /// publisher of the signal is never exposed to the fetch outcome; a
    /// failure is only visible through [`error`](Self::error).
    pub fn invalidate(&self) {
        let query = self.clone();
        tokio::spawn(async move {
            if let Err(error) = query.refetch(false).await {
                debug!(error = %error, "scheduled refetch failed");
            }
        });
    }

    /// Couple this query to an external invalidation signal: each received
    /// unit schedules a refetch, fire-and-forget. The coupling task ends
    /// when the sender side is dropped.
    pub fn refresh_on(&self, mut signal: mpsc::UnboundedReceiver<()>) {
        let query = self.clone();
        tokio::spawn(async move {
            while signal.recv().await.is_some() {
                query.invalidate();
            }
        });
    }

    /// Resolve once the first fetch attempt has settled, success or
    /// failure. An idle query is kicked off. Dependents call this once at
    /// bootstrap so their synchronous reads never observe a value-less
    /// query mid-load.
    pub async fn await_ready(&self) {
        loop {
            let pending = {
                let state = self.inner.state.lock();
                match state.status {
                    QueryStatus::Ready | QueryStatus::Error => return,
                    _ => state.in_flight.clone(),
                }
            };
            match pending {
                Some(fetch) => {
                    let _ = fetch.await;
                }
                None => {
                    let _ = self.get().await;
                }
            }
        }
    }

    /// Start a new fetch under the state lock. The caller publishes the
    /// `Loading` transition and spawns the driver after releasing it.
    fn begin_fetch(&self, state: &mut QueryState<T>) -> SharedFetch<T> {
        state.generation += 1;
        let generation = state.generation;
        let fetcher = Arc::clone(&self.inner.fetcher);
        let weak = Arc::downgrade(&self.inner);
        let fetch = async move {
            let result = fetcher.fetch().await;
            if let Some(inner) = weak.upgrade() {
                inner.settle(generation, &result);
            }
            result
        }
        .boxed()
        .shared();
        state.in_flight = Some(fetch.clone());
        state.status = QueryStatus::Loading;
        fetch
    }

    /// Drive a started fetch to completion independently of any caller.
    fn drive(&self, fetch: &SharedFetch<T>) {
        self.inner.status_feed.publish(QueryStatus::Loading);
        tokio::spawn(fetch.clone().map(|_| ()));
    }
}

/// Lazily-populated table of independent [`CachedQuery`] instances.
///
/// Entries are created on first access by the supplied factory and live for
/// the process lifetime (there is no eviction at this layer. Used for
/// per-chain query families where each key's fetch, cache, and failure
/// state must stay isolated from every other key's).
pub struct QueryStore<K, T>
where
    K: std::hash::Hash + Eq + Clone,
    T: Clone + Send + Sync + 'static,
{
    entries: dashmap::DashMap<K, CachedQuery<T>>,
    factory: Box<dyn Fn(&K) -> CachedQuery<T> + Send + Sync>,
}

impl<K, T> QueryStore<K, T>
where
    K: std::hash::Hash + Eq + Clone,
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty store; `factory` builds the query for a key on its
    /// first access.
    pub fn new(factory: impl Fn(&K) -> CachedQuery<T> + Send + Sync + 'static) -> Self {
        Self {
            entries: dashmap::DashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// The query for `key`, created on first access.
    pub fn entry(&self, key: &K) -> CachedQuery<T> {
        self.entries
            .entry(key.clone())
            .or_insert_with(|| (self.factory)(key))
            .value()
            .clone()
    }

    /// The query for `key` only if one already exists; never creates.
    pub fn peek(&self, key: &K) -> Option<CachedQuery<T>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Number of materialized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if any entry has been materialized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
        fail: AtomicBool,
        delay: Duration,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: AtomicBool::new(false),
                delay: Duration::from_millis(10),
            }
        }
    }

    #[async_trait]
    impl QueryFetcher for CountingFetcher {
        type Output = u64;

        async fn fetch(&self) -> Result<u64, QueryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
            tokio::time::sleep(self.delay).await;
            if self.fail.load(Ordering::SeqCst) {
                Err(QueryError::Network {
                    url: "mock://".to_string(),
                    message: "down".to_string(),
                })
            } else {
                Ok(call)
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_fetch() {
        let fetcher = CountingFetcher::new();
        let calls = Arc::clone(&fetcher.calls);
        let query = CachedQuery::new(fetcher);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let query = query.clone();
                tokio::spawn(async move { query.get().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_data_survives_failed_refetch() {
        struct FlakyFetcher {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl QueryFetcher for FlakyFetcher {
            type Output = u64;

            async fn fetch(&self) -> Result<u64, QueryError> {
                match self.calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Ok(7),
                    _ => Err(QueryError::Network {
                        url: "mock://".to_string(),
                        message: "down".to_string(),
                    }),
                }
            }
        }

        let query = CachedQuery::new(FlakyFetcher {
            calls: AtomicUsize::new(0),
        });
        assert_eq!(query.get().await.unwrap(), 7);

        let refetched = query.refetch(false).await;
        assert!(refetched.is_err());
        assert_eq!(query.status(), QueryStatus::Error);
        // Previous good value is still visible, and get() serves it.
        assert_eq!(query.data(), Some(7));
        assert_eq!(query.get().await.unwrap(), 7);
        assert!(query.error().is_some());
    }

    #[tokio::test]
    async fn test_await_ready_settles_on_failure_too() {
        struct AlwaysFails;

        #[async_trait]
        impl QueryFetcher for AlwaysFails {
            type Output = u64;

            async fn fetch(&self) -> Result<u64, QueryError> {
                Err(QueryError::Network {
                    url: "mock://".to_string(),
                    message: "down".to_string(),
                })
            }
        }

        let query = CachedQuery::new(AlwaysFails);
        query.await_ready().await;
        assert_eq!(query.status(), QueryStatus::Error);
        assert!(query.data().is_none());
    }

    #[tokio::test]
    async fn test_refetch_joins_in_flight_unless_forced() {
        let fetcher = CountingFetcher::new();
        let calls = Arc::clone(&fetcher.calls);
        let query = CachedQuery::new(fetcher);

        let first = {
            let query = query.clone();
            tokio::spawn(async move { query.get().await })
        };
        // Give the first fetch time to start.
        tokio::time::sleep(Duration::from_millis(2)).await;

        query.refetch(false).await.unwrap();
        first.await.unwrap().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        query.refetch(true).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_superseded_fetch_never_overwrites_newer_result() {
        // First call is slow, later calls are fast, so the superseded
        // fetch settles after the forced one.
        struct SlowFirstFetcher {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl QueryFetcher for SlowFirstFetcher {
            type Output = u64;

            async fn fetch(&self) -> Result<u64, QueryError> {
                let call = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
                let delay = if call == 0 { 50 } else { 1 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(call)
            }
        }

        let query = CachedQuery::new(SlowFirstFetcher {
            calls: AtomicUsize::new(0),
        });

        let slow = {
            let query = query.clone();
            tokio::spawn(async move { query.get().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(query.refetch(true).await.unwrap(), 1);
        // The superseded fetch still resolves for its original caller…
        assert_eq!(slow.await.unwrap().unwrap(), 0);
        // …but the cached value belongs to the forced refetch.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(query.data(), Some(1));
        assert_eq!(query.status(), QueryStatus::Ready);
    }

    #[tokio::test]
    async fn test_status_feed_publishes_transitions() {
        let query = CachedQuery::new(CountingFetcher {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: AtomicBool::new(false),
            delay: Duration::ZERO,
        });

        let (_id, mut rx) = query.subscribe();
        query.get().await.unwrap();

        assert_eq!(rx.recv().await, Some(QueryStatus::Loading));
        assert_eq!(rx.recv().await, Some(QueryStatus::Ready));
    }

    #[tokio::test]
    async fn test_query_store_creates_lazily_and_isolates_keys() {
        let store: QueryStore<String, u64> = QueryStore::new(|_key| {
            CachedQuery::new(CountingFetcher {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: AtomicBool::new(false),
                delay: Duration::ZERO,
            })
        });

        assert!(store.peek(&"a".to_string()).is_none());
        let a = store.entry(&"a".to_string());
        assert_eq!(store.len(), 1);

        a.get().await.unwrap();
        // A second key starts from scratch.
        let b = store.entry(&"b".to_string());
        assert_eq!(b.status(), QueryStatus::Idle);
        // Same key yields the same underlying query.
        assert_eq!(store.entry(&"a".to_string()).status(), QueryStatus::Ready);
    }
}
