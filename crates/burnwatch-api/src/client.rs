// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the usage dashboard backend.
//!
//! Provides [`UsageApiClient`] which translates domain calls into GET
//! requests against the configured base URL, enforces the request timeout,
//! and classifies failures into the typed error taxonomy. Exactly one
//! attempt per call: retries are the sync layer's responsibility.

use std::time::Duration;

use burnwatch_config::model::ApiConfig;
use burnwatch_core::BurnwatchError;
use burnwatch_core::types::{
    DailyStats, DashboardSnapshot, HealthReport, ModelStats, PeriodUsage, PlanUsage, Session,
    UsageSummary,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{transform, wire};

/// HTTP client for the dashboard backend REST API.
#[derive(Debug, Clone)]
pub struct UsageApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl UsageApiClient {
    /// Creates a new API client from the `[api]` config section.
    pub fn new(config: &ApiConfig) -> Result<Self, BurnwatchError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BurnwatchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Issue a single GET request and decode the JSON body.
    ///
    /// Error classification:
    /// - timeout budget exceeded -> `Timeout`
    /// - connection-level failure -> `Network`
    /// - non-2xx -> `Api` with the server-supplied `{error, message}` body
    /// - undecodable success body -> `Parse`
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BurnwatchError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed: Option<wire::WireErrorBody> = serde_json::from_str(&body).ok();
            let (code, message) = match parsed {
                Some(b) if !b.error.is_empty() || !b.message.is_empty() => (b.error, b.message),
                _ => ("http_error".to_string(), body),
            };
            return Err(BurnwatchError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| BurnwatchError::Parse {
            message: format!("failed to decode {path} response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> BurnwatchError {
        if e.is_timeout() {
            BurnwatchError::Timeout {
                duration: self.timeout,
            }
        } else {
            BurnwatchError::Network {
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }

    /// `GET /usage/realtime` — the dashboard snapshot.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot, BurnwatchError> {
        let w: wire::WireRealtimeUsage = self.get("/usage/realtime", &[]).await?;
        Ok(transform::dashboard(&w))
    }

    /// `GET /usage/history?days=N` — daily stats for the trailing window.
    pub async fn history(&self, days: u32) -> Result<Vec<DailyStats>, BurnwatchError> {
        let w: wire::WireHistory = self
            .get("/usage/history", &[("days", days.to_string())])
            .await?;
        Ok(transform::history(&w))
    }

    /// `GET /stats/models` — per-model aggregate statistics.
    pub async fn model_stats(&self) -> Result<Vec<ModelStats>, BurnwatchError> {
        let w: wire::WireModelStatsList = self.get("/stats/models", &[]).await?;
        Ok(transform::model_stats(&w))
    }

    /// `GET /usage/plan-usage?plan=<id>` — consumption vs. plan limits.
    pub async fn plan_usage(&self, plan: &str) -> Result<PlanUsage, BurnwatchError> {
        let w: wire::WirePlanUsage = self
            .get("/usage/plan-usage", &[("plan", plan.to_string())])
            .await?;
        Ok(transform::plan_usage(&w))
    }

    /// `GET /usage/stats?period=<p>` — aggregate totals for a period.
    pub async fn usage_stats(&self, period: &str) -> Result<UsageSummary, BurnwatchError> {
        let w: wire::WireUsageStats = self
            .get("/usage/stats", &[("period", period.to_string())])
            .await?;
        Ok(UsageSummary {
            total_requests: w.total_requests,
            total_tokens: w.total_tokens,
            total_cost: w.total_cost,
        })
    }

    /// `GET /usage/by-period?groupBy=<g>&startDate&endDate`.
    pub async fn usage_by_period(
        &self,
        group_by: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<PeriodUsage>, BurnwatchError> {
        let mut query = vec![("groupBy", group_by.to_string())];
        if let Some(start) = start_date {
            query.push(("startDate", start.to_string()));
        }
        if let Some(end) = end_date {
            query.push(("endDate", end.to_string()));
        }
        let w: wire::WireByPeriod = self.get("/usage/by-period", &query).await?;
        Ok(transform::period_usage(&w))
    }

    /// `GET /usage/by-model` — usage grouped by model.
    pub async fn usage_by_model(&self) -> Result<Vec<ModelStats>, BurnwatchError> {
        let w: wire::WireByModel = self.get("/usage/by-model", &[]).await?;
        Ok(w.models
            .iter()
            .map(|m| ModelStats {
                model: m.model.clone(),
                total_requests: m.request_count,
                tokens: transform::tokens_camel(&m.tokens),
                total_cost: m.cost.total_cost,
                percentage_of_total: 0.0,
                first_used: None,
                last_used: None,
            })
            .collect())
    }

    /// `GET /sessions` — all known sessions.
    pub async fn sessions(&self) -> Result<Vec<Session>, BurnwatchError> {
        let w: wire::WireSessionList = self.get("/sessions", &[]).await?;
        Ok(transform::sessions(&w))
    }

    /// `GET /sessions/recent?limit=N`.
    pub async fn recent_sessions(&self, limit: u32) -> Result<Vec<Session>, BurnwatchError> {
        let w: wire::WireSessionList = self
            .get("/sessions/recent", &[("limit", limit.to_string())])
            .await?;
        Ok(transform::sessions(&w))
    }

    /// `GET /sessions/{id}`.
    pub async fn session(&self, id: &str) -> Result<Session, BurnwatchError> {
        let w: wire::WireSession = self.get(&format!("/sessions/{id}"), &[]).await?;
        Ok(transform::session(&w))
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthReport, BurnwatchError> {
        let w: wire::WireHealth = self.get("/health", &[]).await?;
        Ok(transform::health(&w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> UsageApiClient {
        UsageApiClient::new(&ApiConfig {
            base_url: "http://placeholder".into(),
            timeout_ms: 500,
        })
        .unwrap()
        .with_base_url(base_url.to_string())
    }

    fn plan_usage_body() -> serde_json::Value {
        serde_json::json!({
            "timestamp": "2026-08-20T10:00:00Z",
            "plan": {"plan": "pro", "display_name": "Pro", "token_limit": 19_000_000u64, "cost_limit": 18.0, "message_limit": 250},
            "cost_usage": {"current": 15.3, "limit": 18.0, "percentage": 85.0},
            "token_usage": {"current": 100.0, "limit": 200.0, "percentage": 50.0},
            "message_usage": {"current": 10.0, "limit": 250.0, "percentage": 4.0},
            "reset_info": {"reset_time": "2026-08-20T15:00:00Z", "remaining_minutes": 300.0},
            "burn_rate": {"tokens_per_minute": 25.0, "cost_per_hour": 0.9},
            "model_distribution": {"claude-sonnet-4": 80.0, "claude-haiku-4": 20.0},
            "predictions": {"tokens_run_out": "2026-08-20T14:10:00Z"}
        })
    }

    #[tokio::test]
    async fn plan_usage_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usage/plan-usage"))
            .and(query_param("plan", "pro"))
            .respond_with(ResponseTemplate::new(200).set_body_json(plan_usage_body()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let plan = client.plan_usage("pro").await.unwrap();
        assert_eq!(plan.plan.display_name, "Pro");
        assert!((plan.cost_usage.percentage - 85.0).abs() < 1e-12);
        assert!(plan.reset_info.is_some());
    }

    #[tokio::test]
    async fn non_2xx_yields_api_error_with_server_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usage/plan-usage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_plan",
                "message": "unknown plan: enterprise"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.plan_usage("enterprise").await.unwrap_err();
        match err {
            BurnwatchError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "invalid_plan");
                assert!(message.contains("enterprise"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_response_yields_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(serde_json::json!({"timestamp": "2026-08-20T10:00:00Z"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.health().await.unwrap_err();
        assert!(
            matches!(err, BurnwatchError::Timeout { .. }),
            "expected Timeout, got {err:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_host_yields_network_error() {
        // Nothing listens on this port; connection is refused immediately.
        let client = test_client("http://127.0.0.1:1");
        let err = client.health().await.unwrap_err();
        assert!(
            matches!(err, BurnwatchError::Network { .. }),
            "expected Network, got {err:?}"
        );
    }

    #[tokio::test]
    async fn malformed_success_body_yields_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usage/realtime"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.dashboard().await.unwrap_err();
        assert!(
            matches!(err, BurnwatchError::Parse { .. }),
            "expected Parse, got {err:?}"
        );
    }

    #[tokio::test]
    async fn failed_call_makes_exactly_one_attempt() {
        let server = MockServer::start().await;
        // expect(1) fails the test on drop if the client retried.
        Mock::given(method("GET"))
            .and(path("/usage/realtime"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "unavailable",
                "message": "overloaded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.dashboard().await.unwrap_err();
        assert!(matches!(err, BurnwatchError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn by_period_passes_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usage/by-period"))
            .and(query_param("groupBy", "day"))
            .and(query_param("startDate", "2026-08-01"))
            .and(query_param("endDate", "2026-08-20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "groupBy": "day",
                "periods": [
                    {"period": "2026-08-01", "requestCount": 3,
                     "tokens": {"inputTokens": 100, "outputTokens": 50},
                     "cost": {"totalCost": 0.5}}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let periods = client
            .usage_by_period("day", Some("2026-08-01"), Some("2026-08-20"))
            .await
            .unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].request_count, 3);
    }

    #[tokio::test]
    async fn sessions_list_normalizes_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions/recent"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sessions": [
                    {"id": "s1", "status": "active", "totalCost": 1.5, "requestCount": 4},
                    {"id": "s2", "status": "something-new"}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let sessions = client.recent_sessions(2).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(
            sessions[0].status,
            burnwatch_core::types::SessionStatus::Active
        );
        assert_eq!(
            sessions[1].status,
            burnwatch_core::types::SessionStatus::Idle
        );
    }
}
