pub mod config;
mod driver;
pub mod machine;
mod store;

pub use config::{
    clamp_section_count, create_default_config, create_section, create_simple_config,
    SectionUpdate, TimerConfig, TimerMode, TimerSection,
};
pub use driver::TickDriver;
pub use machine::{
    apply_named, create_initial_state, transition, TimerAction, TimerPhase, TimerState,
    TimerStatus,
};
pub use store::{StoreSnapshot, TimerStore, DEFAULT_TICK_INTERVAL};
