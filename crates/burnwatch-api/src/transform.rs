// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure wire-to-model normalization.
//!
//! Every function here is deterministic: given a backend payload, produce
//! the internal shape. Missing optional fields already defaulted during
//! deserialization; nothing in this module can fail or panic.

use std::str::FromStr;

use burnwatch_core::types::{
    BurnRate, CostBreakdown, DailyStats, DashboardSnapshot, HealthReport, ModelStats,
    PeriodUsage, PlanLimits, PlanUsage, ResetInfo, Session, SessionId, SessionStatus,
    SessionWindow, TokenBreakdown, UsageRecord, UsageVsLimit,
};

use crate::wire;

pub fn tokens(w: &wire::WireTokenBreakdown) -> TokenBreakdown {
    TokenBreakdown {
        input_tokens: w.input_tokens,
        output_tokens: w.output_tokens,
        cache_creation_tokens: w.cache_creation_tokens,
        cache_read_tokens: w.cache_read_tokens,
    }
}

pub fn tokens_camel(w: &wire::WireTokensCamel) -> TokenBreakdown {
    TokenBreakdown {
        input_tokens: w.input_tokens,
        output_tokens: w.output_tokens,
        cache_creation_tokens: w.cache_creation_tokens,
        cache_read_tokens: w.cache_read_tokens,
    }
}

pub fn cost_camel(w: &wire::WireCostCamel) -> CostBreakdown {
    CostBreakdown {
        input_cost: w.input_cost,
        output_cost: w.output_cost,
        cache_creation_cost: w.cache_creation_cost,
        cache_read_cost: w.cache_read_cost,
        total_cost: w.total_cost,
    }
}

pub fn burn_rate(w: &wire::WireBurnRate) -> BurnRate {
    BurnRate {
        tokens_per_minute: w.tokens_per_minute,
        cost_per_hour: w.cost_per_hour,
    }
}

pub fn usage_record(w: &wire::WireUsageEntry) -> UsageRecord {
    UsageRecord {
        timestamp: w.timestamp,
        model: w.model.clone(),
        tokens: TokenBreakdown {
            input_tokens: w.input_tokens,
            output_tokens: w.output_tokens,
            cache_creation_tokens: w.cache_creation_tokens,
            cache_read_tokens: w.cache_read_tokens,
        },
        // The usage entry wire shape reports only the total; per-category
        // costs are not broken out by this backend.
        cost: CostBreakdown {
            total_cost: w.cost_usd,
            ..Default::default()
        },
        session_id: w.session_id.clone().map(SessionId),
        message_id: w.message_id.clone(),
        request_id: w.request_id.clone(),
    }
}

pub fn daily_stats(w: &wire::WireDailyStats) -> DailyStats {
    DailyStats {
        date: w.date.clone(),
        total_requests: w.total_requests,
        tokens: tokens(&w.tokens),
        total_cost: w.total_cost_usd,
        models_used: w.models_used.clone(),
    }
}

pub fn dashboard(w: &wire::WireRealtimeUsage) -> DashboardSnapshot {
    DashboardSnapshot {
        timestamp: w.timestamp,
        session: SessionWindow {
            start: w.session.session_start,
            end: w.session.session_end,
            remaining_minutes: w.session.remaining_minutes,
            is_active: w.session.is_active,
            tokens_in_window: w.session.tokens_in_window,
            cost_in_window: w.session.cost_in_window,
        },
        today: daily_stats(&w.today_stats),
        burn_rate: burn_rate(&w.burn_rate),
        recent_records: w.recent_entries.iter().map(usage_record).collect(),
    }
}

pub fn history(w: &wire::WireHistory) -> Vec<DailyStats> {
    w.daily_stats.iter().map(daily_stats).collect()
}

pub fn model_stats(w: &wire::WireModelStatsList) -> Vec<ModelStats> {
    w.models
        .iter()
        .map(|m| ModelStats {
            model: m.model.clone(),
            total_requests: m.total_requests,
            tokens: tokens(&m.tokens),
            total_cost: m.total_cost_usd,
            percentage_of_total: m.percentage_of_total,
            first_used: m.first_used,
            last_used: m.last_used,
        })
        .collect()
}

fn usage_vs_limit(w: &wire::WireUsageVsLimit) -> UsageVsLimit {
    UsageVsLimit {
        current: w.current,
        limit: w.limit,
        percentage: w.percentage,
    }
}

pub fn plan_usage(w: &wire::WirePlanUsage) -> PlanUsage {
    PlanUsage {
        timestamp: w.timestamp,
        plan: PlanLimits {
            plan: w.plan.plan.clone(),
            display_name: w.plan.display_name.clone(),
            token_limit: w.plan.token_limit,
            cost_limit: w.plan.cost_limit,
            message_limit: w.plan.message_limit,
        },
        cost_usage: usage_vs_limit(&w.cost_usage),
        token_usage: usage_vs_limit(&w.token_usage),
        message_usage: usage_vs_limit(&w.message_usage),
        reset_info: w.reset_info.as_ref().map(|r| ResetInfo {
            reset_time: r.reset_time,
            remaining_minutes: r.remaining_minutes,
        }),
        burn_rate: burn_rate(&w.burn_rate),
        model_distribution: w.model_distribution.clone(),
        predictions: w.predictions.clone(),
    }
}

pub fn period_usage(w: &wire::WireByPeriod) -> Vec<PeriodUsage> {
    w.periods
        .iter()
        .map(|p| PeriodUsage {
            period: p.period.clone(),
            request_count: p.request_count,
            tokens: tokens_camel(&p.tokens),
            cost: cost_camel(&p.cost),
        })
        .collect()
}

/// Sessions with unrecognized or missing status strings normalize to `Idle`
/// rather than failing the whole payload.
pub fn session(w: &wire::WireSession) -> Session {
    let status = w
        .status
        .as_deref()
        .and_then(|s| SessionStatus::from_str(s).ok())
        .unwrap_or(SessionStatus::Idle);

    Session {
        id: SessionId(w.id.clone()),
        start_time: w.start_time,
        end_time: w.end_time,
        status,
        tokens: tokens_camel(&w.tokens),
        total_cost: w.total_cost,
        request_count: w.request_count,
    }
}

pub fn sessions(w: &wire::WireSessionList) -> Vec<Session> {
    w.sessions.iter().map(session).collect()
}

pub fn health(w: &wire::WireHealth) -> HealthReport {
    HealthReport {
        status: w.status.clone(),
        version: w.version.clone(),
        data_path_valid: w.data_path_valid,
        timestamp: w.timestamp,
    }
}
