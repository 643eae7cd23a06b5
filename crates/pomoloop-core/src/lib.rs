//! # Pomoloop Core Library
//!
//! Core logic for a looping interval timer: alternating work and break
//! phases across a list of sections, with a long break after the last one.
//!
//! ## Architecture
//!
//! - **Timer state machine**: a pure reducer, [`transition`], computing the
//!   next [`TimerState`] from the current one, an action and the config
//! - **Timer store**: [`TimerStore`] owns the config and state, drives the
//!   reducer from a one-second tick task and persists config changes
//! - **Storage**: SQLite key-value slot for the config, TOML settings file
//!
//! ## Key Components
//!
//! - [`TimerConfig`]: the persisted schedule
//! - [`TimerStore`]: the stateful orchestrator hosts talk to
//! - [`ConfigSlot`]: where the store reads and writes its config

pub mod display;
pub mod error;
pub mod storage;
pub mod time;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, Result};
pub use storage::{ConfigSlot, Database, DatabaseSlot, MemorySlot, Settings};
pub use timer::{
    transition, SectionUpdate, StoreSnapshot, TimerAction, TimerConfig, TimerMode, TimerPhase,
    TimerSection, TimerState, TimerStatus, TimerStore,
};
