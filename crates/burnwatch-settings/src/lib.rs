// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted user settings.
//!
//! Settings live in one JSON file. Loading is forgiving: a missing or
//! unreadable file yields defaults, and a readable file with individual
//! broken fields keeps the good fields and defaults the bad ones, so one
//! corrupted value never wipes the rest. Saves are atomic (temp file plus
//! rename) and the in-memory snapshot is shared through `ArcSwap`.

pub mod model;
pub mod store;

pub use model::{DisplaySettings, NotificationSettings, UserSettings};
pub use store::SettingsStore;
