// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deduplicating query cache.
//!
//! Values are cached per [`QueryKey`] and served without a fetch while they
//! are younger than the configured stale time. At most one fetch per key is
//! in flight at any moment: concurrent callers queue on a per-key async lock
//! and read the entry the winner installed. Fetch completions carry a
//! monotonically increasing sequence number, and an entry is only replaced
//! by a completion newer than the one installed, so a slow response can
//! never clobber a fresher one.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use burnwatch_config::model::SyncConfig;
use burnwatch_core::BurnwatchError;
use dashmap::DashMap;
use tokio::sync::{Mutex, broadcast};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::key::QueryKey;
use crate::retry::RetryPolicy;

/// Per-call knobs for [`QueryCache::query`].
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Age under which a cached value is served without fetching.
    pub stale_time: Duration,
    pub retry: RetryPolicy,
    /// When false the fetch is never invoked; the cached value is served at
    /// any age, and an empty cache is an error.
    pub enabled: bool,
}

impl QueryOptions {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            stale_time: Duration::from_millis(config.stale_time_ms),
            retry: RetryPolicy::from_config(config),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Presentation-facing view of one key's lifecycle.
#[derive(Debug, Clone, Default)]
pub struct QueryStatus {
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<String>,
    /// When the installed value was fetched, if any.
    pub updated_at: Option<Instant>,
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    updated_at: Instant,
    sequence: u64,
    /// Set by invalidation; a stale entry is refetched regardless of age.
    stale: bool,
}

#[derive(Debug, Default)]
struct KeyState {
    loading: bool,
    last_error: Option<String>,
}

/// All three maps are insert-only; there is no eviction. Keys come from the
/// [`QueryKey`] constructors, which enumerate a fixed set of backend
/// endpoints with a handful of parameter values, so the maps stay small for
/// the life of the process.
struct CacheInner {
    entries: DashMap<QueryKey, CacheEntry>,
    states: DashMap<QueryKey, KeyState>,
    /// One lock per key serializes fetches for that key.
    fetch_locks: DashMap<QueryKey, Arc<Mutex<()>>>,
    sequence: AtomicU64,
    invalidations: broadcast::Sender<QueryKey>,
}

/// Cloneable handle to the shared cache. Constructed explicitly and passed
/// down; there is no process-wide instance.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (invalidations, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(CacheInner {
                entries: DashMap::new(),
                states: DashMap::new(),
                fetch_locks: DashMap::new(),
                sequence: AtomicU64::new(0),
                invalidations,
            }),
        }
    }

    /// Resolve the query: serve a fresh cached value, or run `fetch` with
    /// retry and install the result. Concurrent callers for the same key
    /// share a single fetch.
    pub async fn query<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetch: F,
    ) -> Result<Arc<T>, BurnwatchError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, BurnwatchError>>,
    {
        if let Some(value) = self.fresh_value::<T>(key, options.stale_time) {
            trace!(%key, "cache hit");
            return Ok(value);
        }

        if !options.enabled {
            return self
                .value_any_age::<T>(key)
                .ok_or_else(|| BurnwatchError::Disabled(key.to_string()));
        }

        let lock = self.fetch_lock(key);
        let _guard = lock.lock().await;

        // Another caller may have fetched while we waited on the lock.
        if let Some(value) = self.fresh_value::<T>(key, options.stale_time) {
            trace!(%key, "cache filled while waiting");
            return Ok(value);
        }

        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.set_loading(key, true);
        let result = self.fetch_with_retry(key, options, fetch).await;
        match result {
            Ok(value) => {
                let value = Arc::new(value);
                self.install(key, value.clone(), sequence);
                self.finish(key, None);
                Ok(value)
            }
            Err(err) => {
                self.finish(key, Some(err.to_string()));
                Err(err)
            }
        }
    }

    async fn fetch_with_retry<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetch: F,
    ) -> Result<T, BurnwatchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, BurnwatchError>>,
    {
        let policy = &options.retry;
        let mut attempt: u32 = 0;
        loop {
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let out_of_attempts = attempt + 1 >= policy.max_attempts;
                    if out_of_attempts || !err.is_retryable() {
                        warn!(%key, attempt, error = %err, "query failed");
                        return Err(err);
                    }
                    let delay = policy.delay_for(attempt);
                    debug!(%key, attempt, ?delay, error = %err, "retrying query");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Install the value unless a newer completion already did.
    fn install(&self, key: &QueryKey, value: Arc<dyn Any + Send + Sync>, sequence: u64) {
        let mut replaced = true;
        self.inner
            .entries
            .entry(key.clone())
            .and_modify(|entry| {
                if sequence > entry.sequence {
                    entry.value = value.clone();
                    entry.updated_at = Instant::now();
                    entry.sequence = sequence;
                    entry.stale = false;
                } else {
                    replaced = false;
                }
            })
            .or_insert_with(|| CacheEntry {
                value,
                updated_at: Instant::now(),
                sequence,
                stale: false,
            });
        if !replaced {
            debug!(%key, sequence, "discarding superseded completion");
        }
    }

    fn fresh_value<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        stale_time: Duration,
    ) -> Option<Arc<T>> {
        let entry = self.inner.entries.get(key)?;
        if entry.stale || entry.updated_at.elapsed() > stale_time {
            return None;
        }
        entry.value.clone().downcast::<T>().ok()
    }

    fn value_any_age<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entry = self.inner.entries.get(key)?;
        entry.value.clone().downcast::<T>().ok()
    }

    fn fetch_lock(&self, key: &QueryKey) -> Arc<Mutex<()>> {
        self.inner
            .fetch_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn set_loading(&self, key: &QueryKey, loading: bool) {
        self.inner.states.entry(key.clone()).or_default().loading = loading;
    }

    fn finish(&self, key: &QueryKey, error: Option<String>) {
        let mut state = self.inner.states.entry(key.clone()).or_default();
        state.loading = false;
        state.last_error = error;
    }

    /// Mark the entry stale regardless of age and notify subscribers.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            entry.stale = true;
        }
        debug!(%key, "invalidated");
        let _ = self.inner.invalidations.send(key.clone());
    }

    /// Invalidate every cached entry under the prefix. A `None` name covers
    /// the whole domain.
    pub fn invalidate_prefix(&self, domain: &str, name: Option<&str>) {
        let mut hit = Vec::new();
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().matches_prefix(domain, name) {
                entry.stale = true;
                hit.push(entry.key().clone());
            }
        }
        debug!(domain, ?name, count = hit.len(), "prefix invalidated");
        for key in hit {
            let _ = self.inner.invalidations.send(key);
        }
    }

    /// Stream of keys whose entries were just invalidated.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.inner.invalidations.subscribe()
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        let (is_loading, error) = self
            .inner
            .states
            .get(key)
            .map(|s| (s.loading, s.last_error.clone()))
            .unwrap_or((false, None));
        QueryStatus {
            is_loading,
            is_error: error.is_some(),
            error,
            updated_at: self.inner.entries.get(key).map(|e| e.updated_at),
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn options() -> QueryOptions {
        QueryOptions {
            stale_time: Duration::from_secs(30),
            retry: RetryPolicy::none(),
            enabled: true,
        }
    }

    fn counting_fetch(
        calls: Arc<AtomicU32>,
    ) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Result<u64, BurnwatchError>> + Send>>
    {
        move || {
            let calls = calls.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7u64)
            })
        }
    }

    #[tokio::test]
    async fn concurrent_queries_share_one_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::dashboard();
        let opts = options();

        let slow_fetch = || {
            let calls = calls.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42u64)
            }
        };

        let (a, b) = tokio::join!(
            cache.query(&key, &opts, slow_fetch),
            cache.query(&key, &opts, slow_fetch),
        );
        assert_eq!(*a.unwrap(), 42);
        assert_eq!(*b.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fresh_entry_served_without_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::by_model();
        let opts = options();
        let fetch = counting_fetch(calls.clone());

        cache.query(&key, &opts, &fetch).await.unwrap();
        cache.query(&key, &opts, &fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_refetched_after_stale_time() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::by_model();
        let opts = options();
        let fetch = counting_fetch(calls.clone());

        cache.query(&key, &opts, &fetch).await.unwrap();
        tokio::time::advance(opts.stale_time + Duration::from_millis(1)).await;
        cache.query(&key, &opts, &fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch_regardless_of_age() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::plan_usage("pro");
        let opts = options();
        let fetch = counting_fetch(calls.clone());

        cache.query(&key, &opts, &fetch).await.unwrap();
        cache.invalidate(&key);
        cache.query(&key, &opts, &fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn prefix_invalidation_notifies_subscribers() {
        let cache = QueryCache::new();
        let mut events = cache.subscribe();
        let opts = options();
        let fetch = || async { Ok(1u64) };

        cache
            .query(&QueryKey::plan_usage("pro"), &opts, fetch)
            .await
            .unwrap();
        cache
            .query(&QueryKey::sessions(), &opts, fetch)
            .await
            .unwrap();

        cache.invalidate_prefix("usage", None);
        let key = events.recv().await.unwrap();
        assert_eq!(key, QueryKey::plan_usage("pro"));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_errors_retried_with_backoff() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::dashboard();
        let opts = QueryOptions {
            stale_time: Duration::from_secs(30),
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(100),
                max_delay: Duration::from_secs(5),
            },
            enabled: true,
        };

        let fetch = || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(BurnwatchError::Network {
                        message: "connection refused".into(),
                        source: None,
                    })
                } else {
                    Ok(9u64)
                }
            }
        };

        let value = cache.query(&key, &opts, fetch).await.unwrap();
        assert_eq!(*value, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_surfaces_immediately() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::session("nope");
        let opts = QueryOptions {
            stale_time: Duration::from_secs(30),
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(10),
                max_delay: Duration::from_secs(1),
            },
            enabled: true,
        };

        let fetch = || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u64, _>(BurnwatchError::Api {
                    status: 404,
                    code: "not_found".into(),
                    message: "no such session".into(),
                })
            }
        };

        let err = cache.query(&key, &opts, fetch).await.unwrap_err();
        assert!(matches!(err, BurnwatchError::Api { status: 404, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let status = cache.status(&key);
        assert!(status.is_error);
        assert!(!status.is_loading);
    }

    #[tokio::test]
    async fn disabled_query_never_fetches() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::recent_sessions(5);
        let fetch = counting_fetch(calls.clone());

        let disabled = options().disabled();
        let err = cache.query(&key, &disabled, &fetch).await.unwrap_err();
        assert!(matches!(err, BurnwatchError::Disabled(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Once populated, a disabled query serves the cached value at any age.
        cache.query(&key, &options(), &fetch).await.unwrap();
        cache.invalidate(&key);
        let value = cache.query(&key, &disabled, &fetch).await.unwrap();
        assert_eq!(*value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn superseded_completion_is_discarded() {
        let cache = QueryCache::new();
        let key = QueryKey::dashboard();

        cache.install(&key, Arc::new(2u64), 2);
        cache.install(&key, Arc::new(1u64), 1);
        let value = cache.value_any_age::<u64>(&key).unwrap();
        assert_eq!(*value, 2);

        cache.install(&key, Arc::new(3u64), 3);
        let value = cache.value_any_age::<u64>(&key).unwrap();
        assert_eq!(*value, 3);
    }
}
