// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic mock data source for the `[mock]` config toggle.
//!
//! Produces a plausible, self-consistent picture of a mid-cycle Pro plan
//! without touching the network. Used for demos and for developing the
//! presentation layer against a dead backend.

use async_trait::async_trait;
use burnwatch_core::BurnwatchError;
use burnwatch_core::types::{
    BurnRate, CostBreakdown, DailyStats, DashboardSnapshot, HealthReport, ModelStats,
    PeriodUsage, PlanLimits, PlanUsage, ResetInfo, Session, SessionId, SessionStatus,
    SessionWindow, TokenBreakdown, UsageVsLimit,
};
use chrono::{Duration, Utc};

use crate::source::UsageDataSource;

/// Serves canned data shaped like a real backend mid-session.
#[derive(Debug, Default, Clone)]
pub struct MockDataSource;

impl MockDataSource {
    pub fn new() -> Self {
        Self
    }
}

fn mock_tokens(scale: u64) -> TokenBreakdown {
    TokenBreakdown {
        input_tokens: 12_000 * scale,
        output_tokens: 4_500 * scale,
        cache_creation_tokens: 800 * scale,
        cache_read_tokens: 6_200 * scale,
    }
}

#[async_trait]
impl UsageDataSource for MockDataSource {
    async fn dashboard(&self) -> Result<DashboardSnapshot, BurnwatchError> {
        let now = Utc::now();
        Ok(DashboardSnapshot {
            timestamp: now,
            session: SessionWindow {
                start: Some(now - Duration::hours(2)),
                end: Some(now + Duration::hours(3)),
                remaining_minutes: 180.0,
                is_active: true,
                tokens_in_window: mock_tokens(3).total(),
                cost_in_window: 1.84,
            },
            today: DailyStats {
                date: now.format("%Y-%m-%d").to_string(),
                total_requests: 42,
                tokens: mock_tokens(5),
                total_cost: 3.17,
                models_used: vec!["claude-sonnet-4".into(), "claude-haiku-4".into()],
            },
            burn_rate: BurnRate {
                tokens_per_minute: 215.0,
                cost_per_hour: 0.61,
            },
            recent_records: Vec::new(),
        })
    }

    async fn plan_usage(&self, plan: &str) -> Result<PlanUsage, BurnwatchError> {
        let now = Utc::now();
        Ok(PlanUsage {
            timestamp: now,
            plan: PlanLimits {
                plan: plan.to_string(),
                display_name: match plan {
                    "pro" => "Pro".to_string(),
                    "max5" => "Max 5x".to_string(),
                    "max20" => "Max 20x".to_string(),
                    other => other.to_string(),
                },
                token_limit: 19_000_000,
                cost_limit: 18.0,
                message_limit: 250,
            },
            cost_usage: UsageVsLimit {
                current: 11.5,
                limit: 18.0,
                percentage: 63.9,
            },
            token_usage: UsageVsLimit {
                current: 8_400_000.0,
                limit: 19_000_000.0,
                percentage: 44.2,
            },
            message_usage: UsageVsLimit {
                current: 212.0,
                limit: 250.0,
                percentage: 84.8,
            },
            reset_info: Some(ResetInfo {
                reset_time: now + Duration::hours(3),
                remaining_minutes: 180.0,
            }),
            burn_rate: BurnRate {
                tokens_per_minute: 215.0,
                cost_per_hour: 0.61,
            },
            model_distribution: [
                ("claude-sonnet-4".to_string(), 76.0),
                ("claude-haiku-4".to_string(), 24.0),
            ]
            .into_iter()
            .collect(),
            predictions: [(
                "tokens_run_out".to_string(),
                Some((now + Duration::hours(6)).to_rfc3339()),
            )]
            .into_iter()
            .collect(),
        })
    }

    async fn usage_by_period(
        &self,
        _group_by: &str,
        _start_date: Option<&str>,
        _end_date: Option<&str>,
    ) -> Result<Vec<PeriodUsage>, BurnwatchError> {
        let today = Utc::now().date_naive();
        Ok((0..7)
            .rev()
            .map(|offset| {
                let day = today - Duration::days(offset);
                let scale = (offset as u64 % 3) + 1;
                PeriodUsage {
                    period: day.format("%Y-%m-%d").to_string(),
                    request_count: 10 * scale,
                    tokens: mock_tokens(scale),
                    cost: CostBreakdown {
                        input_cost: 0.24 * scale as f64,
                        output_cost: 0.41 * scale as f64,
                        cache_creation_cost: 0.02 * scale as f64,
                        cache_read_cost: 0.04 * scale as f64,
                        total_cost: 0.71 * scale as f64,
                    },
                }
            })
            .collect())
    }

    async fn model_stats(&self) -> Result<Vec<ModelStats>, BurnwatchError> {
        let now = Utc::now();
        Ok(vec![
            ModelStats {
                model: "claude-sonnet-4".into(),
                total_requests: 31,
                tokens: mock_tokens(4),
                total_cost: 2.41,
                percentage_of_total: 76.0,
                first_used: Some(now - Duration::days(20)),
                last_used: Some(now),
            },
            ModelStats {
                model: "claude-haiku-4".into(),
                total_requests: 11,
                tokens: mock_tokens(1),
                total_cost: 0.76,
                percentage_of_total: 24.0,
                first_used: Some(now - Duration::days(12)),
                last_used: Some(now - Duration::hours(1)),
            },
        ])
    }

    async fn recent_sessions(&self, limit: u32) -> Result<Vec<Session>, BurnwatchError> {
        let now = Utc::now();
        let sessions = vec![
            Session {
                id: SessionId("mock-session-1".into()),
                start_time: Some(now - Duration::hours(2)),
                end_time: Some(now + Duration::hours(3)),
                status: SessionStatus::Active,
                tokens: mock_tokens(3),
                total_cost: 1.84,
                request_count: 18,
            },
            Session {
                id: SessionId("mock-session-0".into()),
                start_time: Some(now - Duration::hours(9)),
                end_time: Some(now - Duration::hours(4)),
                status: SessionStatus::Expired,
                tokens: mock_tokens(2),
                total_cost: 1.12,
                request_count: 24,
            },
        ];
        Ok(sessions.into_iter().take(limit as usize).collect())
    }

    async fn health(&self) -> Result<HealthReport, BurnwatchError> {
        Ok(HealthReport {
            status: "healthy".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            data_path_valid: true,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnwatch_core::summarize;

    #[tokio::test]
    async fn mock_by_period_sums_match_summary() {
        let source = MockDataSource::new();
        let periods = source.usage_by_period("day", None, None).await.unwrap();
        assert_eq!(periods.len(), 7);

        let summary = summarize(&periods);
        let requests: u64 = periods.iter().map(|p| p.request_count).sum();
        let cost: f64 = periods.iter().map(|p| p.cost.total_cost).sum();
        assert_eq!(summary.total_requests, requests);
        assert!((summary.total_cost - cost).abs() < 1e-9);
    }

    #[tokio::test]
    async fn mock_sessions_respect_limit() {
        let source = MockDataSource::new();
        let sessions = source.recent_sessions(1).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn mock_plan_usage_levels_span_buckets() {
        use burnwatch_core::UsageLevel;
        let source = MockDataSource::new();
        let plan = source.plan_usage("pro").await.unwrap();
        assert_eq!(plan.cost_usage.level(), UsageLevel::Medium);
        assert_eq!(plan.token_usage.level(), UsageLevel::Low);
        assert_eq!(plan.message_usage.level(), UsageLevel::High);
    }
}
