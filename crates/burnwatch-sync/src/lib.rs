// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data-synchronization layer: a deduplicating, staleness-aware query cache
//! with retry, prefix invalidation, and background polling.
//!
//! The cache never talks to the network itself; callers supply an async
//! fetch closure (usually a `burnwatch-api` method) and the cache decides
//! whether to run it.

pub mod cache;
pub mod key;
pub mod poller;
pub mod retry;

pub use cache::{QueryCache, QueryOptions, QueryStatus};
pub use key::QueryKey;
pub use poller::spawn_refetch;
pub use retry::RetryPolicy;
