//! Timer configuration model and factory.
//!
//! A [`TimerConfig`] is an ordered list of work/break [`TimerSection`]s plus a
//! long break that closes every loop. It is persisted as camelCase JSON.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::{clamp_minutes, minutes_to_seconds};

pub const DEFAULT_WORK_DURATION_MIN: u32 = 25;
pub const DEFAULT_BREAK_DURATION_MIN: u32 = 5;
pub const DEFAULT_LONG_BREAK_DURATION_MIN: u32 = 15;
pub const DEFAULT_SECTION_COUNT: usize = 4;

/// Bounds for minute fields edited by the user.
pub const MIN_DURATION_MIN: u32 = 1;
pub const MAX_DURATION_MIN: u32 = 120;

/// Bounds for the section count picker.
pub const MIN_SECTION_COUNT: usize = 1;
pub const MAX_SECTION_COUNT: usize = 10;

static SECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// How the schedule is edited. Has no effect on the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// One work/break pair applied to every section.
    #[default]
    Simple,
    /// Each section edited on its own.
    Complex,
}

impl std::str::FromStr for TimerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(TimerMode::Simple),
            "complex" => Ok(TimerMode::Complex),
            other => Err(ConfigError::InvalidValue {
                key: "mode".into(),
                message: format!("expected 'simple' or 'complex', got '{other}'"),
            }),
        }
    }
}

/// One work/break unit of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSection {
    pub id: String,
    pub work_duration_sec: u32,
    pub break_duration_sec: u32,
}

impl Default for TimerSection {
    fn default() -> Self {
        create_section(
            minutes_to_seconds(DEFAULT_WORK_DURATION_MIN),
            minutes_to_seconds(DEFAULT_BREAK_DURATION_MIN),
        )
    }
}

/// Partial update for a single section. `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    #[serde(default)]
    pub work_duration_sec: Option<u32>,
    #[serde(default)]
    pub break_duration_sec: Option<u32>,
}

impl SectionUpdate {
    pub fn is_empty(&self) -> bool {
        self.work_duration_sec.is_none() && self.break_duration_sec.is_none()
    }

    pub(crate) fn apply(&self, section: &mut TimerSection) {
        if let Some(work) = self.work_duration_sec {
            section.work_duration_sec = work;
        }
        if let Some(brk) = self.break_duration_sec {
            section.break_duration_sec = brk;
        }
    }
}

/// The full, persisted timer schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    pub sections: Vec<TimerSection>,
    pub long_break_duration_sec: u32,
    pub mode: TimerMode,
}

impl Default for TimerConfig {
    fn default() -> Self {
        create_default_config()
    }
}

impl TimerConfig {
    /// Check the invariants serde cannot express.
    ///
    /// # Errors
    /// Returns an error if there are no sections or if two sections share an id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.is_empty() {
            return Err(ConfigError::EmptySections);
        }
        let mut seen = HashSet::with_capacity(self.sections.len());
        for section in &self.sections {
            if section.id.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "sections.id".into(),
                    message: "section id is empty".into(),
                });
            }
            if !seen.insert(section.id.as_str()) {
                return Err(ConfigError::DuplicateSectionId(section.id.clone()));
            }
        }
        Ok(())
    }

    /// Parse and validate a persisted configuration blob.
    ///
    /// # Errors
    /// Returns `ParseFailed` for malformed JSON or a schema mismatch, and the
    /// [`validate`](Self::validate) error for structurally invalid data.
    pub fn from_json(blob: &str) -> Result<Self, ConfigError> {
        let config: TimerConfig =
            serde_json::from_str(blob).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn section(&self, id: &str) -> Option<&TimerSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Sum of every phase in one loop, in seconds.
    pub fn loop_duration_sec(&self) -> u64 {
        let sections: u64 = self
            .sections
            .iter()
            .map(|s| u64::from(s.work_duration_sec) + u64::from(s.break_duration_sec))
            .sum();
        sections + u64::from(self.long_break_duration_sec)
    }

    /// Simple-mode work edit: clamp `minutes` and apply it to every section,
    /// keeping section 0's break duration.
    pub fn with_simple_work_minutes(&self, minutes: f64) -> TimerConfig {
        let work = minutes_to_seconds(clamp_minutes(minutes, MIN_DURATION_MIN, MAX_DURATION_MIN));
        let brk = self.sections.first().map(|s| s.break_duration_sec).unwrap_or(0);
        create_simple_config(self, work, brk)
    }

    /// Simple-mode break edit: clamp `minutes` and apply it to every section,
    /// keeping section 0's work duration.
    pub fn with_simple_break_minutes(&self, minutes: f64) -> TimerConfig {
        let brk = minutes_to_seconds(clamp_minutes(minutes, MIN_DURATION_MIN, MAX_DURATION_MIN));
        let work = self.sections.first().map(|s| s.work_duration_sec).unwrap_or(0);
        create_simple_config(self, work, brk)
    }

    pub fn with_long_break_minutes(&self, minutes: f64) -> TimerConfig {
        TimerConfig {
            long_break_duration_sec: minutes_to_seconds(clamp_minutes(
                minutes,
                MIN_DURATION_MIN,
                MAX_DURATION_MIN,
            )),
            ..self.clone()
        }
    }
}

/// Create a section with a fresh, process-unique id.
pub fn create_section(work_duration_sec: u32, break_duration_sec: u32) -> TimerSection {
    let n = SECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    TimerSection {
        id: format!("section-{n}-{}", Utc::now().timestamp_millis()),
        work_duration_sec,
        break_duration_sec,
    }
}

pub fn create_default_config() -> TimerConfig {
    TimerConfig {
        sections: (0..DEFAULT_SECTION_COUNT)
            .map(|_| TimerSection::default())
            .collect(),
        long_break_duration_sec: minutes_to_seconds(DEFAULT_LONG_BREAK_DURATION_MIN),
        mode: TimerMode::Simple,
    }
}

/// Copy of `config` with every section set to the same work/break pair.
///
/// Section count, ids, long break and mode are unchanged.
pub fn create_simple_config(
    config: &TimerConfig,
    work_duration_sec: u32,
    break_duration_sec: u32,
) -> TimerConfig {
    TimerConfig {
        sections: config
            .sections
            .iter()
            .map(|s| TimerSection {
                id: s.id.clone(),
                work_duration_sec,
                break_duration_sec,
            })
            .collect(),
        long_break_duration_sec: config.long_break_duration_sec,
        mode: config.mode,
    }
}

/// Clamp a requested section count into the picker's range.
pub fn clamp_section_count(n: usize) -> usize {
    n.clamp(MIN_SECTION_COUNT, MAX_SECTION_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_section_uses_defaults() {
        let section = TimerSection::default();
        assert!(!section.id.is_empty());
        assert_eq!(section.work_duration_sec, DEFAULT_WORK_DURATION_MIN * 60);
        assert_eq!(section.break_duration_sec, DEFAULT_BREAK_DURATION_MIN * 60);
    }

    #[test]
    fn create_section_with_values() {
        let section = create_section(30 * 60, 10 * 60);
        assert_eq!(section.work_duration_sec, 1800);
        assert_eq!(section.break_duration_sec, 600);
    }

    #[test]
    fn section_ids_are_unique() {
        let ids: HashSet<String> = (0..100).map(|_| TimerSection::default().id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn default_config_shape() {
        let config = create_default_config();
        assert_eq!(config.sections.len(), DEFAULT_SECTION_COUNT);
        assert_eq!(config.long_break_duration_sec, DEFAULT_LONG_BREAK_DURATION_MIN * 60);
        assert_eq!(config.mode, TimerMode::Simple);
        for section in &config.sections {
            assert_eq!(section.work_duration_sec, DEFAULT_WORK_DURATION_MIN * 60);
            assert_eq!(section.break_duration_sec, DEFAULT_BREAK_DURATION_MIN * 60);
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn simple_config_overwrites_every_section() {
        let config = TimerConfig {
            mode: TimerMode::Complex,
            ..create_default_config()
        };
        let updated = create_simple_config(&config, 30 * 60, 10 * 60);
        assert_eq!(updated.sections.len(), config.sections.len());
        for (before, after) in config.sections.iter().zip(&updated.sections) {
            assert_eq!(before.id, after.id);
            assert_eq!(after.work_duration_sec, 1800);
            assert_eq!(after.break_duration_sec, 600);
        }
        assert_eq!(updated.long_break_duration_sec, config.long_break_duration_sec);
        assert_eq!(updated.mode, TimerMode::Complex);
    }

    #[test]
    fn json_uses_camel_case() {
        let config = TimerConfig {
            sections: vec![TimerSection {
                id: "a".into(),
                work_duration_sec: 1500,
                break_duration_sec: 300,
            }],
            long_break_duration_sec: 900,
            mode: TimerMode::Complex,
        };
        let json: serde_json::Value = serde_json::to_value(&config).unwrap();
        assert_eq!(json["sections"][0]["workDurationSec"], 1500);
        assert_eq!(json["sections"][0]["breakDurationSec"], 300);
        assert_eq!(json["longBreakDurationSec"], 900);
        assert_eq!(json["mode"], "complex");
    }

    #[test]
    fn from_json_accepts_valid_blob() {
        let blob = r#"{"sections":[{"id":"s1","workDurationSec":60,"breakDurationSec":30}],
                       "longBreakDurationSec":120,"mode":"simple"}"#;
        let config = TimerConfig::from_json(blob).unwrap();
        assert_eq!(config.sections[0].id, "s1");
        assert_eq!(config.long_break_duration_sec, 120);
    }

    #[test]
    fn from_json_rejects_schema_violations() {
        let cases = [
            "not json",
            "{}",
            r#"{"sections":[],"longBreakDurationSec":900,"mode":"simple"}"#,
            r#"{"sections":[{"id":"a","workDurationSec":"x","breakDurationSec":1}],"longBreakDurationSec":900,"mode":"simple"}"#,
            r#"{"sections":[{"id":"a","workDurationSec":1,"breakDurationSec":1}],"longBreakDurationSec":900,"mode":"fancy"}"#,
            r#"{"sections":[{"id":"a","workDurationSec":-1,"breakDurationSec":1}],"longBreakDurationSec":900,"mode":"simple"}"#,
        ];
        for blob in cases {
            assert!(TimerConfig::from_json(blob).is_err(), "accepted: {blob}");
        }
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let section = create_section(60, 60);
        let config = TimerConfig {
            sections: vec![section.clone(), section],
            long_break_duration_sec: 60,
            mode: TimerMode::Simple,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateSectionId(_))
        ));
    }

    #[test]
    fn simple_minute_edits_are_clamped() {
        let config = create_default_config();

        let updated = config.with_simple_work_minutes(500.0);
        assert!(updated
            .sections
            .iter()
            .all(|s| s.work_duration_sec == MAX_DURATION_MIN * 60
                && s.break_duration_sec == DEFAULT_BREAK_DURATION_MIN * 60));

        let updated = config.with_simple_break_minutes(f64::NAN);
        assert!(updated
            .sections
            .iter()
            .all(|s| s.break_duration_sec == MIN_DURATION_MIN * 60
                && s.work_duration_sec == DEFAULT_WORK_DURATION_MIN * 60));

        let updated = config.with_long_break_minutes(-3.0);
        assert_eq!(updated.long_break_duration_sec, MIN_DURATION_MIN * 60);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Simple".parse::<TimerMode>().unwrap(), TimerMode::Simple);
        assert_eq!("complex".parse::<TimerMode>().unwrap(), TimerMode::Complex);
        assert!("other".parse::<TimerMode>().is_err());
    }

    #[test]
    fn section_count_clamps() {
        assert_eq!(clamp_section_count(0), MIN_SECTION_COUNT);
        assert_eq!(clamp_section_count(3), 3);
        assert_eq!(clamp_section_count(99), MAX_SECTION_COUNT);
    }
}
