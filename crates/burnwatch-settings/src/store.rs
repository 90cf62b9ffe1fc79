// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use burnwatch_core::BurnwatchError;
use tracing::{debug, warn};

use crate::model::UserSettings;

/// Owns the settings file and the shared in-memory snapshot.
pub struct SettingsStore {
    path: PathBuf,
    current: ArcSwap<UserSettings>,
}

impl SettingsStore {
    /// Load from `path`. Never fails: a missing or unreadable file and
    /// unparseable JSON both fall back to defaults, logged at warn.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(value) => UserSettings::from_json(value),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "settings file corrupt, using defaults");
                    UserSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                UserSettings::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "settings file unreadable, using defaults");
                UserSettings::default()
            }
        };
        Self {
            path,
            current: ArcSwap::from_pointee(settings),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cheap shared snapshot of the current settings.
    pub fn snapshot(&self) -> Arc<UserSettings> {
        self.current.load_full()
    }

    /// Apply a mutation, persist it, then publish the new snapshot. The
    /// in-memory state only changes if the write succeeds.
    pub fn update(
        &self,
        mutate: impl FnOnce(&mut UserSettings),
    ) -> Result<Arc<UserSettings>, BurnwatchError> {
        let mut next = (*self.snapshot()).clone();
        mutate(&mut next);
        self.persist(&next)?;
        let next = Arc::new(next);
        self.current.store(next.clone());
        Ok(next)
    }

    /// Write the current snapshot to disk.
    pub fn save(&self) -> Result<(), BurnwatchError> {
        self.persist(&self.snapshot())
    }

    // Atomic write: temp file in the same directory, then rename.
    fn persist(&self, settings: &UserSettings) -> Result<(), BurnwatchError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|err| BurnwatchError::Config(format!("serializing settings: {err}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    BurnwatchError::Config(format!(
                        "creating settings directory {}: {err}",
                        parent.display()
                    ))
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|err| {
            BurnwatchError::Config(format!("writing {}: {err}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            BurnwatchError::Config(format!("renaming into {}: {err}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"));
        assert_eq!(*store.snapshot(), UserSettings::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{{{ not json").unwrap();
        let store = SettingsStore::load(&path);
        assert_eq!(*store.snapshot(), UserSettings::default());
    }

    #[test]
    fn round_trip_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load(&path);
        let saved = store
            .update(|s| {
                s.plan = "max5".to_string();
                s.theme = "light".to_string();
                s.notifications.warning_threshold_pct = 90.0;
                s.display.compact_mode = true;
            })
            .unwrap();

        let reloaded = SettingsStore::load(&path);
        assert_eq!(*reloaded.snapshot(), *saved);
    }

    #[test]
    fn partial_file_keeps_good_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"plan": "max20", "notifications": "oops", "timezone": "Europe/Berlin"}"#,
        )
        .unwrap();

        let store = SettingsStore::load(&path);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.plan, "max20");
        assert_eq!(snapshot.timezone, "Europe/Berlin");
        assert_eq!(snapshot.notifications, Default::default());
    }

    #[test]
    fn update_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.json");
        let store = SettingsStore::load(&path);
        store.update(|s| s.currency = "EUR".to_string()).unwrap();
        assert_eq!(SettingsStore::load(&path).snapshot().currency, "EUR");
    }

    #[test]
    fn failed_write_leaves_snapshot_unchanged() {
        // A directory at the target path makes the rename fail.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::create_dir(&path).unwrap();

        let store = SettingsStore::load(&path);
        let before = store.snapshot();
        let result = store.update(|s| s.plan = "max20".to_string());
        assert!(result.is_err());
        assert_eq!(*store.snapshot(), *before);
    }
}
