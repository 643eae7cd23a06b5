//! Text helpers for hosts rendering the timer.

use crate::time::format_time;
use crate::timer::{
    create_initial_state, transition, TimerAction, TimerConfig, TimerPhase, TimerState, TimerStatus,
};

pub const APP_TITLE: &str = "Pomodoro Timer";

pub fn phase_label(phase: TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Work => "Work",
        TimerPhase::Break => "Break",
        TimerPhase::LongBreak => "Long Break",
    }
}

/// Share of the current phase still remaining, 0.0 ..= 100.0.
pub fn progress_pct(state: &TimerState) -> f64 {
    if state.total_time_sec == 0 {
        return 0.0;
    }
    f64::from(state.remaining_time_sec) / f64::from(state.total_time_sec) * 100.0
}

/// Window/tab title: the bare app name while idle, the countdown otherwise.
pub fn window_title(state: &TimerState) -> String {
    if state.status == TimerStatus::Idle {
        return APP_TITLE.to_string();
    }
    format!(
        "{} {} - {APP_TITLE}",
        format_time(state.remaining_time_sec),
        phase_label(state.current_phase)
    )
}

/// One-line summary, e.g. `Work 25:00  Section 1 / 4  Loop 1`.
pub fn status_line(state: &TimerState, total_sections: usize) -> String {
    let paused = if state.status == TimerStatus::Paused {
        "  (paused)"
    } else {
        ""
    };
    format!(
        "{} {}  Section {} / {}  Loop {}{paused}",
        phase_label(state.current_phase),
        format_time(state.remaining_time_sec),
        state.current_section_index + 1,
        total_sections,
        state.current_loop,
    )
}

/// One phase of a loop as walked by [`cycle_preview`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewStep {
    pub section_index: usize,
    pub phase: TimerPhase,
    pub duration_sec: u32,
}

/// Every phase of one loop, in order, ending with the long break.
pub fn cycle_preview(config: &TimerConfig) -> Vec<PreviewStep> {
    let mut state = transition(&create_initial_state(config), TimerAction::Start, config);
    let mut steps = Vec::with_capacity(config.sections.len() * 2 + 1);
    loop {
        steps.push(PreviewStep {
            section_index: state.current_section_index,
            phase: state.current_phase,
            duration_sec: state.total_time_sec,
        });
        if state.current_phase == TimerPhase::LongBreak {
            return steps;
        }
        state = transition(&state, TimerAction::Skip, config);
    }
}
