// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend API client for the Burnwatch dashboard.
//!
//! Translates domain calls into HTTP requests against the configured base
//! URL, enforces request timeouts, and normalizes backend wire shapes into
//! the stable internal model. This crate performs exactly one attempt per
//! call and never retries: retry policy belongs to `burnwatch-sync`.

pub mod client;
pub mod mock;
pub mod source;
pub mod transform;
pub mod wire;

pub use client::UsageApiClient;
pub use mock::MockDataSource;
pub use source::UsageDataSource;
