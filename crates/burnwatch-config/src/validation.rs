// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as URL schemes and interval ordering.

use crate::diagnostic::ConfigError;
use crate::model::BurnwatchConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BurnwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let api_url = config.api.base_url.trim();
    if api_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not be empty".to_string(),
        });
    } else if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("api.base_url `{api_url}` must use the http or https scheme"),
        });
    }

    let ws_url = config.websocket.url.trim();
    if ws_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "websocket.url must not be empty".to_string(),
        });
    } else if !ws_url.starts_with("ws://") && !ws_url.starts_with("wss://") {
        errors.push(ConfigError::Validation {
            message: format!("websocket.url `{ws_url}` must use the ws or wss scheme"),
        });
    }

    if config.api.timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "api.timeout_ms must be positive".to_string(),
        });
    }

    if config.websocket.heartbeat_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "websocket.heartbeat_interval_secs must be positive".to_string(),
        });
    }

    if config.websocket.max_reconnect_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "websocket.max_reconnect_attempts must be at least 1".to_string(),
        });
    }

    if config.sync.refetch_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.refetch_interval_ms must be positive".to_string(),
        });
    }

    if config.sync.retry_max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.retry_max_attempts must be at least 1".to_string(),
        });
    }

    if config.sync.retry_max_delay_ms < config.sync.retry_base_delay_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "sync.retry_max_delay_ms ({}) must not be below sync.retry_base_delay_ms ({})",
                config.sync.retry_max_delay_ms, config.sync.retry_base_delay_ms
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = BurnwatchConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_base_url_fails_validation() {
        let mut config = BurnwatchConfig::default();
        config.api.base_url = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))
        ));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = BurnwatchConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("http"))
        ));
    }

    #[test]
    fn non_ws_websocket_url_fails_validation() {
        let mut config = BurnwatchConfig::default();
        config.websocket.url = "http://example.com/ws".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("ws or wss"))
        ));
    }

    #[test]
    fn zero_reconnect_attempts_fails_validation() {
        let mut config = BurnwatchConfig::default();
        config.websocket.max_reconnect_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("max_reconnect_attempts"))
        ));
    }

    #[test]
    fn retry_cap_below_base_fails_validation() {
        let mut config = BurnwatchConfig::default();
        config.sync.retry_base_delay_ms = 5_000;
        config.sync.retry_max_delay_ms = 1_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("retry_max_delay_ms"))
        ));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = BurnwatchConfig::default();
        config.api.base_url = String::new();
        config.websocket.url = String::new();
        config.api.timeout_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "expected all errors, got {errors:?}");
    }
}
