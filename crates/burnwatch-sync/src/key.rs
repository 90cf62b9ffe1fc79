// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query keys: ordered (domain, name, parameters) identifier tuples.
//!
//! Two keys that compare equal refer to the same logical query and are
//! interchangeable for caching and deduplication. Parameter order is part
//! of the identity, so constructors below are the only place parameter
//! lists are assembled.

use serde::{Deserialize, Serialize};

/// Ordered identifier tuple for a logical data request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    /// Data domain, e.g. "usage" or "sessions".
    pub domain: String,
    /// Query name within the domain, e.g. "plan-usage".
    pub name: String,
    /// Ordered parameter pairs, part of the key identity.
    pub params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            params,
        }
    }

    /// Whether this key falls under the given prefix. A `None` name matches
    /// every query in the domain.
    pub fn matches_prefix(&self, domain: &str, name: Option<&str>) -> bool {
        self.domain == domain && name.is_none_or(|n| self.name == n)
    }

    // Known queries, one constructor each so call sites cannot disagree on
    // parameter order.

    pub fn dashboard() -> Self {
        Self::new("usage", "realtime", vec![])
    }

    pub fn history(days: u32) -> Self {
        Self::new("usage", "history", vec![("days".into(), days.to_string())])
    }

    pub fn plan_usage(plan: &str) -> Self {
        Self::new(
            "usage",
            "plan-usage",
            vec![("plan".into(), plan.to_string())],
        )
    }

    pub fn by_period(group_by: &str, start: Option<&str>, end: Option<&str>) -> Self {
        let mut params = vec![("groupBy".into(), group_by.to_string())];
        if let Some(s) = start {
            params.push(("startDate".into(), s.to_string()));
        }
        if let Some(e) = end {
            params.push(("endDate".into(), e.to_string()));
        }
        Self::new("usage", "by-period", params)
    }

    pub fn by_model() -> Self {
        Self::new("usage", "by-model", vec![])
    }

    pub fn model_stats() -> Self {
        Self::new("stats", "models", vec![])
    }

    pub fn sessions() -> Self {
        Self::new("sessions", "list", vec![])
    }

    pub fn recent_sessions(limit: u32) -> Self {
        Self::new(
            "sessions",
            "recent",
            vec![("limit".into(), limit.to_string())],
        )
    }

    pub fn session(id: &str) -> Self {
        Self::new("sessions", "by-id", vec![("id".into(), id.to_string())])
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.domain, self.name)?;
        for (k, v) in &self.params {
            write!(f, "?{k}={v}")?;
        }
        Ok(())
    }
}
