// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Burnwatch dashboard client.

use thiserror::Error;

/// The primary error type used across the Burnwatch workspace.
///
/// The first four variants form the wire-facing taxonomy surfaced to
/// presentation code: connection-level failures, exceeded request budgets,
/// structured server errors, and unparseable responses. The remaining
/// variants cover client-local concerns.
#[derive(Debug, Error)]
pub enum BurnwatchError {
    /// Connection-level failure (DNS, refused connection, dropped socket).
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request exceeded its timeout budget.
    #[error("request timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Non-2xx HTTP response with a server-supplied error code and message.
    #[error("API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Response body could not be parsed into the expected shape.
    #[error("malformed response: {message}")]
    Parse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, bad URLs, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The operation was deliberately cancelled. Never retried.
    #[error("operation cancelled")]
    Cancelled,

    /// The query is disabled and no cached value exists.
    #[error("query disabled: {0}")]
    Disabled(String),

    /// Internal or unclassified errors.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl BurnwatchError {
    /// Whether the sync layer should retry a failed fetch.
    ///
    /// Transport failures and timeouts are transient. Server errors are
    /// retried only for rate limiting and 5xx; a 4xx means the request
    /// itself is wrong and repeating it cannot help. Cancellation is
    /// deliberate and never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Stable machine-readable kind, used in logs and `--json` output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Api { .. } => "API_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::Disabled(_) => "DISABLED",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_and_timeout_are_retryable() {
        let network = BurnwatchError::Network {
            message: "connection refused".into(),
            source: None,
        };
        let timeout = BurnwatchError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        assert!(network.is_retryable());
        assert!(timeout.is_retryable());
    }

    #[test]
    fn api_errors_retry_only_429_and_5xx() {
        let rate_limited = BurnwatchError::Api {
            status: 429,
            code: "rate_limited".into(),
            message: "slow down".into(),
        };
        let server = BurnwatchError::Api {
            status: 503,
            code: "unavailable".into(),
            message: "overloaded".into(),
        };
        let bad_request = BurnwatchError::Api {
            status: 400,
            code: "invalid_plan".into(),
            message: "unknown plan".into(),
        };
        assert!(rate_limited.is_retryable());
        assert!(server.is_retryable());
        assert!(!bad_request.is_retryable());
    }

    #[test]
    fn cancellation_and_parse_are_not_retryable() {
        assert!(!BurnwatchError::Cancelled.is_retryable());
        let parse = BurnwatchError::Parse {
            message: "truncated body".into(),
            source: None,
        };
        assert!(!parse.is_retryable());
    }

    #[test]
    fn kind_matches_taxonomy() {
        let err = BurnwatchError::Timeout {
            duration: std::time::Duration::from_secs(1),
        };
        assert_eq!(err.kind(), "TIMEOUT");
        assert_eq!(BurnwatchError::Cancelled.kind(), "CANCELLED");
        assert_eq!(BurnwatchError::Unknown("x".into()).kind(), "UNKNOWN_ERROR");
    }
}
