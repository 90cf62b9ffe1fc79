// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data source seam between the binary and the backend.
//!
//! [`UsageDataSource`] abstracts the calls the presentation layer makes, so
//! the real HTTP client and the mock source are interchangeable behind the
//! `[mock]` config toggle.

use async_trait::async_trait;
use burnwatch_core::BurnwatchError;
use burnwatch_core::types::{
    DashboardSnapshot, HealthReport, ModelStats, PeriodUsage, PlanUsage, Session,
};

use crate::client::UsageApiClient;

/// Async data source for dashboard queries.
#[async_trait]
pub trait UsageDataSource: Send + Sync {
    async fn dashboard(&self) -> Result<DashboardSnapshot, BurnwatchError>;
    async fn plan_usage(&self, plan: &str) -> Result<PlanUsage, BurnwatchError>;
    async fn usage_by_period(
        &self,
        group_by: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<PeriodUsage>, BurnwatchError>;
    async fn model_stats(&self) -> Result<Vec<ModelStats>, BurnwatchError>;
    async fn recent_sessions(&self, limit: u32) -> Result<Vec<Session>, BurnwatchError>;
    async fn health(&self) -> Result<HealthReport, BurnwatchError>;
}

#[async_trait]
impl UsageDataSource for UsageApiClient {
    async fn dashboard(&self) -> Result<DashboardSnapshot, BurnwatchError> {
        UsageApiClient::dashboard(self).await
    }

    async fn plan_usage(&self, plan: &str) -> Result<PlanUsage, BurnwatchError> {
        UsageApiClient::plan_usage(self, plan).await
    }

    async fn usage_by_period(
        &self,
        group_by: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<PeriodUsage>, BurnwatchError> {
        UsageApiClient::usage_by_period(self, group_by, start_date, end_date).await
    }

    async fn model_stats(&self) -> Result<Vec<ModelStats>, BurnwatchError> {
        UsageApiClient::model_stats(self).await
    }

    async fn recent_sessions(&self, limit: u32) -> Result<Vec<Session>, BurnwatchError> {
        UsageApiClient::recent_sessions(self, limit).await
    }

    async fn health(&self) -> Result<HealthReport, BurnwatchError> {
        UsageApiClient::health(self).await
    }
}
