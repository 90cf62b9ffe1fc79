// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything the user can tune, all defaulted so a fresh install needs no
/// settings file at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub plan: String,
    pub currency: String,
    pub timezone: String,
    pub theme: String,
    pub notifications: NotificationSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub usage_warnings: bool,
    /// Percentage of a limit at which a warning fires.
    pub warning_threshold_pct: f64,
    pub sound: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub compact_mode: bool,
    pub show_cost: bool,
    pub show_tokens: bool,
    pub time_format: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            plan: "pro".to_string(),
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
            theme: "dark".to_string(),
            notifications: NotificationSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            usage_warnings: true,
            warning_threshold_pct: 80.0,
            sound: false,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            compact_mode: false,
            show_cost: true,
            show_tokens: true,
            time_format: "24h".to_string(),
        }
    }
}

impl UserSettings {
    /// Build settings from raw JSON, keeping every field that deserializes
    /// and defaulting the ones that do not. Non-object input yields pure
    /// defaults.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        let defaults = Self::default();
        Self {
            plan: field(&map, "plan", defaults.plan),
            currency: field(&map, "currency", defaults.currency),
            timezone: field(&map, "timezone", defaults.timezone),
            theme: field(&map, "theme", defaults.theme),
            notifications: field(&map, "notifications", defaults.notifications),
            display: field(&map, "display", defaults.display),
        }
    }
}

fn field<T: serde::de::DeserializeOwned>(map: &Map<String, Value>, key: &str, fallback: T) -> T {
    match map.get(key) {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or(fallback),
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_json_yields_defaults() {
        assert_eq!(UserSettings::from_json(json!(42)), UserSettings::default());
        assert_eq!(
            UserSettings::from_json(json!("nope")),
            UserSettings::default()
        );
    }

    #[test]
    fn bad_field_falls_back_without_losing_good_ones() {
        let settings = UserSettings::from_json(json!({
            "plan": "max20",
            "currency": 17,
            "display": {"compact_mode": true},
        }));
        assert_eq!(settings.plan, "max20");
        assert_eq!(settings.currency, "USD");
        assert!(settings.display.compact_mode);
        // Missing nested fields inside a valid object still default.
        assert_eq!(settings.display.time_format, "24h");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings = UserSettings::from_json(json!({"plan": "max5", "surprise": true}));
        assert_eq!(settings.plan, "max5");
    }
}
