// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Burnwatch client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Burnwatch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BurnwatchConfig {
    /// Backend REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Real-time WebSocket settings.
    #[serde(default)]
    pub websocket: WebSocketConfig,

    /// Query cache and polling settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// User settings persistence.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Mock data source toggle.
    #[serde(default)]
    pub mock: MockConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Backend REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL for the usage dashboard backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout budget in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Real-time WebSocket configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebSocketConfig {
    /// WebSocket endpoint URL.
    #[serde(default = "default_ws_url")]
    pub url: String,

    /// Seconds between outbound ping heartbeats.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_interval_secs: u64,

    /// Fixed delay before a reconnect attempt, in milliseconds.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Maximum automatic reconnect attempts before giving up.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Whether the real-time connection is enabled at startup.
    #[serde(default = "default_ws_enabled")]
    pub enabled: bool,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            url: default_ws_url(),
            heartbeat_interval_secs: default_heartbeat_secs(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            enabled: default_ws_enabled(),
        }
    }
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:8000/ws/realtime".to_string()
}

fn default_heartbeat_secs() -> u64 {
    30
}

fn default_reconnect_delay_ms() -> u64 {
    3_000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_ws_enabled() -> bool {
    true
}

/// Query cache and polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Age in milliseconds under which a cached value is served without
    /// refetching.
    #[serde(default = "default_stale_time_ms")]
    pub stale_time_ms: u64,

    /// Interval in milliseconds between background refetches in watch mode.
    #[serde(default = "default_refetch_interval_ms")]
    pub refetch_interval_ms: u64,

    /// Maximum fetch attempts per query (first try plus retries).
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// Base retry delay in milliseconds, doubled per attempt.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Cap on the retry delay in milliseconds.
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: default_stale_time_ms(),
            refetch_interval_ms: default_refetch_interval_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

fn default_stale_time_ms() -> u64 {
    30_000
}

fn default_refetch_interval_ms() -> u64 {
    10_000
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1_000
}

fn default_retry_max_delay_ms() -> u64 {
    30_000
}

/// User settings persistence configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Path to the settings JSON file. `None` uses the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SettingsConfig {
    /// Resolve the settings file path, falling back to the platform data dir.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("burnwatch").join("settings.json"))
                .unwrap_or_else(|| PathBuf::from("burnwatch-settings.json"))
        })
    }
}

/// Mock data source configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    /// Serve deterministic sample data instead of calling the backend.
    #[serde(default)]
    pub enabled: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
