// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalized domain model shared across the Burnwatch workspace.
//!
//! The API client translates backend wire shapes into these types; the sync
//! layer, WebSocket client, and presentation code never see raw payloads.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a usage session window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Token counts broken down by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBreakdown {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
}

impl TokenBreakdown {
    /// Total tokens across all categories.
    pub fn total(&self) -> u64 {
        self.input_tokens
            + self.output_tokens
            + self.cache_creation_tokens
            + self.cache_read_tokens
    }
}

/// Per-category USD cost breakdown for a usage record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub input_cost: f64,
    pub output_cost: f64,
    pub cache_creation_cost: f64,
    pub cache_read_cost: f64,
    pub total_cost: f64,
}

/// One metered usage event. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub tokens: TokenBreakdown,
    pub cost: CostBreakdown,
    pub session_id: Option<SessionId>,
    pub message_id: String,
    pub request_id: String,
}

/// Lifecycle state of a usage session window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Idle,
    Expired,
    Paused,
}

/// A bounded usage window with accumulated totals.
///
/// Mutated only by new events arriving for the window; becomes immutable
/// once `Expired`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub tokens: TokenBreakdown,
    pub total_cost: f64,
    pub request_count: u64,
}

/// Observed consumption rate used for predictive display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BurnRate {
    pub tokens_per_minute: f64,
    pub cost_per_hour: f64,
}

/// Visual severity bucket for a usage-vs-limit percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    Low,
    Medium,
    High,
}

impl UsageLevel {
    /// Classify a usage percentage: >= 80 is high, >= 50 is medium,
    /// anything below is low.
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 80.0 {
            Self::High
        } else if pct >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Current consumption measured against a plan limit.
///
/// `percentage` may exceed 100 for overage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageVsLimit {
    pub current: f64,
    pub limit: f64,
    pub percentage: f64,
}

impl UsageVsLimit {
    pub fn level(&self) -> UsageLevel {
        UsageLevel::from_percentage(self.percentage)
    }
}

/// Plan limit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub plan: String,
    pub display_name: String,
    pub token_limit: u64,
    pub cost_limit: f64,
    pub message_limit: u64,
}

/// When the current limits reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetInfo {
    pub reset_time: DateTime<Utc>,
    pub remaining_minutes: f64,
}

/// Point-in-time snapshot of consumption vs. plan limits.
///
/// Fully replaced on each fetch, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanUsage {
    pub timestamp: DateTime<Utc>,
    pub plan: PlanLimits,
    pub cost_usage: UsageVsLimit,
    pub token_usage: UsageVsLimit,
    pub message_usage: UsageVsLimit,
    pub reset_info: Option<ResetInfo>,
    pub burn_rate: BurnRate,
    /// Model identifier -> share of total usage, in percent.
    pub model_distribution: HashMap<String, f64>,
    /// Prediction name -> human-readable prediction, if computable.
    pub predictions: HashMap<String, Option<String>>,
}

/// Aggregated statistics for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Date in YYYY-MM-DD form.
    pub date: String,
    pub total_requests: u64,
    pub tokens: TokenBreakdown,
    pub total_cost: f64,
    pub models_used: Vec<String>,
}

/// Session window information as reported by the realtime endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub remaining_minutes: f64,
    pub is_active: bool,
    pub tokens_in_window: u64,
    pub cost_in_window: f64,
}

/// Comprehensive realtime snapshot backing the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub timestamp: DateTime<Utc>,
    pub session: SessionWindow,
    pub today: DailyStats,
    pub burn_rate: BurnRate,
    pub recent_records: Vec<UsageRecord>,
}

/// Per-model aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    pub model: String,
    pub total_requests: u64,
    pub tokens: TokenBreakdown,
    pub total_cost: f64,
    pub percentage_of_total: f64,
    pub first_used: Option<DateTime<Utc>>,
    pub last_used: Option<DateTime<Utc>>,
}

/// Usage aggregated over one reporting period (day, week, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodUsage {
    /// Period label, e.g. "2026-08-01" or "2026-W31".
    pub period: String,
    pub request_count: u64,
    pub tokens: TokenBreakdown,
    pub cost: CostBreakdown,
}

/// Totals computed independently from a by-period series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_requests: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
}

/// Sum a by-period series into overall totals.
///
/// Dashboard summary cards and the by-period table are fed from the same
/// series, so these totals must agree with any independently computed ones.
pub fn summarize(periods: &[PeriodUsage]) -> UsageSummary {
    let mut summary = UsageSummary::default();
    for p in periods {
        summary.total_requests += p.request_count;
        summary.total_tokens += p.tokens.total();
        summary.total_cost += p.cost.total_cost;
    }
    summary
}

/// Backend health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub data_path_valid: bool,
    pub timestamp: DateTime<Utc>,
}
