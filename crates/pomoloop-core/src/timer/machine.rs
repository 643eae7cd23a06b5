//! Timer state machine.
//!
//! [`transition`] is a pure reducer: it takes the current state, an action
//! and the active configuration, and returns the next state. It never reads a
//! clock. The store feeds it one `Tick` per second while running.
//!
//! ## Phase cycle
//!
//! ```text
//! work(0) -> break(0) -> work(1) -> ... -> break(n-1) -> longBreak -> work(0), loop + 1
//! ```

use serde::{Deserialize, Serialize};

use super::config::{TimerConfig, TimerSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    Work,
    Break,
    LongBreak,
}

/// Position of the timer within the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub current_section_index: usize,
    pub current_phase: TimerPhase,
    pub remaining_time_sec: u32,
    /// Duration of the current phase when it began.
    pub total_time_sec: u32,
    pub current_loop: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Start,
    Pause,
    Reset,
    Tick,
    Skip,
}

impl TimerAction {
    /// Parse an action name as sent by a host (`"START"`, `"tick"`, ...).
    ///
    /// Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "START" => Some(TimerAction::Start),
            "PAUSE" => Some(TimerAction::Pause),
            "RESET" => Some(TimerAction::Reset),
            "TICK" => Some(TimerAction::Tick),
            "SKIP" => Some(TimerAction::Skip),
            _ => None,
        }
    }
}

/// Fresh idle state at the start of section 0.
pub fn create_initial_state(config: &TimerConfig) -> TimerState {
    let work = config
        .sections
        .first()
        .map(|s| s.work_duration_sec)
        .unwrap_or(0);
    TimerState {
        status: TimerStatus::Idle,
        current_section_index: 0,
        current_phase: TimerPhase::Work,
        remaining_time_sec: work,
        total_time_sec: work,
        current_loop: 1,
    }
}

pub fn transition(state: &TimerState, action: TimerAction, config: &TimerConfig) -> TimerState {
    match action {
        TimerAction::Start => TimerState {
            status: TimerStatus::Running,
            ..state.clone()
        },
        TimerAction::Pause => TimerState {
            status: TimerStatus::Paused,
            ..state.clone()
        },
        TimerAction::Reset => create_initial_state(config),
        TimerAction::Tick => {
            if state.status != TimerStatus::Running {
                return state.clone();
            }
            if state.remaining_time_sec <= 1 {
                return next_phase(state, config);
            }
            TimerState {
                remaining_time_sec: state.remaining_time_sec - 1,
                ..state.clone()
            }
        }
        TimerAction::Skip => {
            if state.status == TimerStatus::Idle {
                return state.clone();
            }
            next_phase(state, config)
        }
    }
}

/// Apply an action given by name. Unknown names leave the state unchanged.
pub fn apply_named(state: &TimerState, name: &str, config: &TimerConfig) -> TimerState {
    match TimerAction::parse(name) {
        Some(action) => transition(state, action, config),
        None => state.clone(),
    }
}

/// Section at `index`, or the last one if the config shrank under a running
/// timer. `None` only for an empty config, which validation rules out.
fn section_at(config: &TimerConfig, index: usize) -> Option<&TimerSection> {
    config.sections.get(index).or_else(|| config.sections.last())
}

fn next_phase(state: &TimerState, config: &TimerConfig) -> TimerState {
    let index = state.current_section_index;
    let is_last_section = index + 1 >= config.sections.len();

    match state.current_phase {
        TimerPhase::Work => {
            let duration = section_at(config, index)
                .map(|s| s.break_duration_sec)
                .unwrap_or(0);
            TimerState {
                current_phase: TimerPhase::Break,
                remaining_time_sec: duration,
                total_time_sec: duration,
                ..state.clone()
            }
        }
        TimerPhase::Break if is_last_section => TimerState {
            current_phase: TimerPhase::LongBreak,
            remaining_time_sec: config.long_break_duration_sec,
            total_time_sec: config.long_break_duration_sec,
            ..state.clone()
        },
        TimerPhase::Break => {
            let next = index + 1;
            let duration = section_at(config, next)
                .map(|s| s.work_duration_sec)
                .unwrap_or(0);
            TimerState {
                current_phase: TimerPhase::Work,
                current_section_index: next,
                remaining_time_sec: duration,
                total_time_sec: duration,
                ..state.clone()
            }
        }
        TimerPhase::LongBreak => {
            let duration = section_at(config, 0)
                .map(|s| s.work_duration_sec)
                .unwrap_or(0);
            TimerState {
                current_phase: TimerPhase::Work,
                current_section_index: 0,
                remaining_time_sec: duration,
                total_time_sec: duration,
                current_loop: state.current_loop.saturating_add(1),
                ..state.clone()
            }
        }
    }
}
