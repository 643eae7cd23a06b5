//! TOML-based application settings.
//!
//! Holds the knobs around the timer rather than the schedule itself:
//! - Tick driver period
//! - Storage slot name
//! - Log filter
//!
//! Settings are stored at `<data_dir>/settings.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use super::slot::DEFAULT_SLOT_KEY;
use crate::error::{ConfigError, CoreError, Result};

/// Tick driver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSettings {
    #[serde(default = "default_tick_interval_ms")]
    pub interval_ms: u64,
}

/// Where the timer configuration is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// `tracing-subscriber` EnvFilter directive. `RUST_LOG` overrides it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Application settings.
///
/// Serialized to/from TOML at `<data_dir>/settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub timer: TickSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub log: LogSettings,
}

fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.into()
}
fn default_log_filter() -> String {
    "warn".into()
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            slot_key: default_slot_key(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown settings key".into(),
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf value".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("settings.toml"))
    }

    /// Load from `<data_dir>/settings.toml`, writing defaults if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed,
    /// or if the default settings cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Same as [`load`](Self::load) against an explicit path.
    ///
    /// # Errors
    /// See [`load`](Self::load).
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to `<data_dir>/settings.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// See [`save`](Self::save).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning defaults on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("using default settings: {e}");
                Self::default()
            }
        }
    }

    /// Get a settings value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.timer.interval_ms == 0 {
            return Err(CoreError::Config(ConfigError::InvalidValue {
                key: "timer.interval_ms".into(),
                message: "must be greater than zero".into(),
            }));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.interval_ms, 1000);
        assert_eq!(parsed.storage.slot_key, DEFAULT_SLOT_KEY);
        assert_eq!(parsed.log.filter, "warn");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Settings = toml::from_str("[timer]\ninterval_ms = 250\n").unwrap();
        assert_eq!(parsed.timer.interval_ms, 250);
        assert_eq!(parsed.storage.slot_key, DEFAULT_SLOT_KEY);
        assert_eq!(parsed.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let settings = Settings::default();
        assert_eq!(settings.get("timer.interval_ms").as_deref(), Some("1000"));
        assert_eq!(settings.get("log.filter").as_deref(), Some("warn"));
        assert!(settings.get("timer").is_none());
        assert!(settings.get("timer.missing").is_none());
        assert!(settings.get("").is_none());
    }

    #[test]
    fn set_updates_number_and_string() {
        let mut settings = Settings::default();
        settings.set("timer.interval_ms", "500").unwrap();
        settings.set("log.filter", "debug").unwrap();
        assert_eq!(settings.timer.interval_ms, 500);
        assert_eq!(settings.log.filter, "debug");
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("timer.nonexistent", "1").is_err());
        assert!(settings.set("timer.interval_ms", "fast").is_err());
        assert!(settings.set("timer.interval_ms", "0").is_err());
        assert!(settings.set("timer", "1").is_err());
    }

    #[test]
    fn rejected_set_leaves_settings_untouched() {
        let mut settings = Settings::default();
        settings.set("timer.interval_ms", "250").unwrap();
        assert!(settings.set("timer.interval_ms", "0").is_err());
        assert_eq!(settings.timer.interval_ms, 250);
        assert_eq!(settings.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.timer.interval_ms, 1000);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "timer = [[[").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
