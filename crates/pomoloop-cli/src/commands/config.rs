use clap::Subcommand;
use pomoloop_core::time::{clamp_minutes, minutes_to_seconds, parse_minutes};
use pomoloop_core::timer::config::{clamp_section_count, MAX_DURATION_MIN, MIN_DURATION_MIN};
use pomoloop_core::timer::create_default_config;
use pomoloop_core::{SectionUpdate, Settings, TimerMode};

use super::open_store;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the timer configuration as JSON
    Show,
    /// Restore the default configuration
    Reset,
    /// Switch between simple and complex editing
    Mode {
        /// "simple" or "complex"
        mode: TimerMode,
    },
    /// Set the number of sections (extra sections copy the first one)
    Sections {
        count: usize,
    },
    /// Set work/break minutes for every section at once
    Simple {
        /// Work minutes
        #[arg(long, allow_hyphen_values = true)]
        work: Option<String>,
        /// Break minutes
        #[arg(long = "break", allow_hyphen_values = true)]
        brk: Option<String>,
    },
    /// Set the long break minutes
    LongBreak {
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Set work/break minutes for one section
    Section {
        /// Section id (see `config show`)
        id: String,
        /// Work minutes
        #[arg(long, allow_hyphen_values = true)]
        work: Option<String>,
        /// Break minutes
        #[arg(long = "break", allow_hyphen_values = true)]
        brk: Option<String>,
    },
}

/// Minutes typed by the user, clamped and converted to seconds.
fn clamped_secs(raw: &str) -> u32 {
    minutes_to_seconds(clamp_minutes(parse_minutes(raw), MIN_DURATION_MIN, MAX_DURATION_MIN))
}

pub fn run(action: ConfigAction, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(settings)?;

    match action {
        ConfigAction::Show => {}
        ConfigAction::Reset => store.set_config(create_default_config()),
        ConfigAction::Mode { mode } => store.set_mode(mode),
        ConfigAction::Sections { count } => store.set_section_count(clamp_section_count(count)),
        ConfigAction::Simple { work, brk } => {
            let mut config = store.config();
            if let Some(work) = work {
                config = config.with_simple_work_minutes(parse_minutes(&work));
            }
            if let Some(brk) = brk {
                config = config.with_simple_break_minutes(parse_minutes(&brk));
            }
            store.set_config(config);
        }
        ConfigAction::LongBreak { minutes } => {
            let config = store.config().with_long_break_minutes(parse_minutes(&minutes));
            store.set_config(config);
        }
        ConfigAction::Section { id, work, brk } => {
            let update = SectionUpdate {
                work_duration_sec: work.as_deref().map(clamped_secs),
                break_duration_sec: brk.as_deref().map(clamped_secs),
            };
            if update.is_empty() {
                return Err("nothing to update; pass --work and/or --break".into());
            }
            if store.config().section(&id).is_none() {
                eprintln!("no section with id {id}");
            }
            store.update_section(&id, update);
        }
    }

    println!("{}", serde_json::to_string_pretty(&store.config())?);
    Ok(())
}
