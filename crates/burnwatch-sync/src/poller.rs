// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background refetch loop for a mounted query.
//!
//! Re-runs the query on a fixed interval and immediately when the cache
//! publishes an invalidation for the key. The task ends when the provided
//! [`CancellationToken`] is cancelled; teardown never leaves a timer behind.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::cache::{QueryCache, QueryOptions};
use crate::key::QueryKey;

/// Spawn a task that keeps `key` fresh until `cancel` fires.
///
/// `fetch` is the same closure handed to [`QueryCache::query`]; errors are
/// logged and the loop continues, so a flaky backend does not kill polling.
pub fn spawn_refetch<T, F, Fut>(
    cache: QueryCache,
    key: QueryKey,
    options: QueryOptions,
    interval: Duration,
    cancel: CancellationToken,
    fetch: F,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, burnwatch_core::BurnwatchError>> + Send,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut invalidations = cache.subscribe();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(%key, "refetch loop cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    trace!(%key, "interval refetch");
                }
                event = invalidations.recv() => {
                    match event {
                        Ok(invalidated) if invalidated == key => {
                            trace!(%key, "invalidation refetch");
                        }
                        // Lagged receivers refetch anyway; missed events can
                        // only mean missed invalidations.
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                            trace!(%key, "invalidation stream lagged");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
                        _ => continue,
                    }
                }
            }
            if let Err(err) = cache.query(&key, &options, &fetch).await {
                debug!(%key, error = %err, "background refetch failed");
            }
        }
    })
}
