// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend wire shapes, deserialized verbatim before normalization.
//!
//! The usage endpoints (`/usage/realtime`, `/usage/history`, `/stats/models`,
//! `/usage/plan-usage`, `/health`) use snake_case fields; the aggregation and
//! session endpoints (`/usage/by-period`, `/usage/by-model`, `/usage/stats`,
//! `/sessions*`) use camelCase. Every field the backend may omit carries
//! `#[serde(default)]` so partial payloads deserialize to zero/empty instead
//! of failing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Structured error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct WireErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}

// --- snake_case usage endpoints ---

#[derive(Debug, Default, Deserialize)]
pub struct WireTokenBreakdown {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_tokens: u64,
    #[serde(default)]
    pub cache_read_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub struct WireUsageEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_tokens: u64,
    #[serde(default)]
    pub cache_read_tokens: u64,
    #[serde(default)]
    pub cost_usd: f64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireSessionInfo {
    #[serde(default)]
    pub session_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remaining_minutes: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub tokens_in_window: u64,
    #[serde(default)]
    pub cost_in_window: f64,
}

#[derive(Debug, Deserialize)]
pub struct WireDailyStats {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub tokens: WireTokenBreakdown,
    #[serde(default)]
    pub total_cost_usd: f64,
    #[serde(default)]
    pub models_used: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireBurnRate {
    #[serde(default)]
    pub tokens_per_minute: f64,
    #[serde(default)]
    pub cost_per_hour: f64,
}

/// `GET /usage/realtime` response.
#[derive(Debug, Deserialize)]
pub struct WireRealtimeUsage {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub session: WireSessionInfo,
    pub today_stats: WireDailyStats,
    #[serde(default)]
    pub burn_rate: WireBurnRate,
    #[serde(default)]
    pub recent_entries: Vec<WireUsageEntry>,
}

/// `GET /usage/history?days=N` response.
#[derive(Debug, Deserialize)]
pub struct WireHistory {
    #[serde(default)]
    pub days_requested: u32,
    #[serde(default)]
    pub days_with_data: u32,
    #[serde(default)]
    pub daily_stats: Vec<WireDailyStats>,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub total_cost_usd: f64,
}

#[derive(Debug, Deserialize)]
pub struct WireModelStats {
    pub model: String,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub tokens: WireTokenBreakdown,
    #[serde(default)]
    pub total_cost_usd: f64,
    #[serde(default)]
    pub percentage_of_total: f64,
    #[serde(default)]
    pub first_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

/// `GET /stats/models` response.
#[derive(Debug, Deserialize)]
pub struct WireModelStatsList {
    #[serde(default)]
    pub models: Vec<WireModelStats>,
    #[serde(default)]
    pub total_models: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct WirePlanLimits {
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub token_limit: u64,
    #[serde(default)]
    pub cost_limit: f64,
    #[serde(default)]
    pub message_limit: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireUsageVsLimit {
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub limit: f64,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Deserialize)]
pub struct WireResetInfo {
    pub reset_time: DateTime<Utc>,
    #[serde(default)]
    pub remaining_minutes: f64,
}

/// `GET /usage/plan-usage?plan=<id>` response.
#[derive(Debug, Deserialize)]
pub struct WirePlanUsage {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub plan: WirePlanLimits,
    #[serde(default)]
    pub cost_usage: WireUsageVsLimit,
    #[serde(default)]
    pub token_usage: WireUsageVsLimit,
    #[serde(default)]
    pub message_usage: WireUsageVsLimit,
    #[serde(default)]
    pub reset_info: Option<WireResetInfo>,
    #[serde(default)]
    pub burn_rate: WireBurnRate,
    #[serde(default)]
    pub model_distribution: HashMap<String, f64>,
    #[serde(default)]
    pub predictions: HashMap<String, Option<String>>,
}

/// `GET /health` response.
#[derive(Debug, Deserialize)]
pub struct WireHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub data_path_valid: bool,
    pub timestamp: DateTime<Utc>,
}

// --- camelCase aggregation and session endpoints ---

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTokensCamel {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_tokens: u64,
    #[serde(default)]
    pub cache_read_tokens: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCostCamel {
    #[serde(default)]
    pub input_cost: f64,
    #[serde(default)]
    pub output_cost: f64,
    #[serde(default)]
    pub cache_creation_cost: f64,
    #[serde(default)]
    pub cache_read_cost: f64,
    #[serde(default)]
    pub total_cost: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePeriodUsage {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub request_count: u64,
    #[serde(default)]
    pub tokens: WireTokensCamel,
    #[serde(default)]
    pub cost: WireCostCamel,
}

/// `GET /usage/by-period?groupBy=...` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireByPeriod {
    #[serde(default)]
    pub group_by: String,
    #[serde(default)]
    pub periods: Vec<WirePeriodUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireModelUsage {
    pub model: String,
    #[serde(default)]
    pub request_count: u64,
    #[serde(default)]
    pub tokens: WireTokensCamel,
    #[serde(default)]
    pub cost: WireCostCamel,
}

/// `GET /usage/by-model` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireByModel {
    #[serde(default)]
    pub models: Vec<WireModelUsage>,
}

/// `GET /usage/stats?period=<p>` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUsageStats {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub total_cost: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSession {
    pub id: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tokens: WireTokensCamel,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub request_count: u64,
}

/// `GET /sessions` and `GET /sessions/recent` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSessionList {
    #[serde(default)]
    pub sessions: Vec<WireSession>,
}
