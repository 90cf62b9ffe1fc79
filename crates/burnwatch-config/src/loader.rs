// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./burnwatch.toml` > `~/.config/burnwatch/burnwatch.toml`
//! > `/etc/burnwatch/burnwatch.toml` with environment variable overrides via
//! the `BURNWATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BurnwatchConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/burnwatch/burnwatch.toml` (system-wide)
/// 3. `~/.config/burnwatch/burnwatch.toml` (user XDG config)
/// 4. `./burnwatch.toml` (local directory)
/// 5. `BURNWATCH_*` environment variables
pub fn load_config() -> Result<BurnwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BurnwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BurnwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BurnwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BurnwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for
/// diagnostic use so callers can inspect metadata before extraction).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BurnwatchConfig::default()))
        .merge(Toml::file("/etc/burnwatch/burnwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("burnwatch/burnwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("burnwatch.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BURNWATCH_API_BASE_URL` must map to
/// `api.base_url`, not `api.base.url`.
fn env_provider() -> Env {
    Env::prefixed("BURNWATCH_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: BURNWATCH_WEBSOCKET_RECONNECT_DELAY_MS -> "websocket_reconnect_delay_ms"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("websocket_", "websocket.", 1)
            .replacen("sync_", "sync.", 1)
            .replacen("settings_", "settings.", 1)
            .replacen("mock_", "mock.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
