// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Burnwatch usage dashboard client.
//!
//! This crate provides the error taxonomy and the normalized domain model
//! used throughout the Burnwatch workspace. The API client produces these
//! types; the sync layer caches them; the binary renders them.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BurnwatchError;
pub use types::{
    BurnRate, CostBreakdown, DailyStats, DashboardSnapshot, HealthReport, ModelStats,
    PeriodUsage, PlanLimits, PlanUsage, ResetInfo, Session, SessionId, SessionStatus,
    SessionWindow, TokenBreakdown, UsageLevel, UsageRecord, UsageSummary, UsageVsLimit,
    summarize,
};
