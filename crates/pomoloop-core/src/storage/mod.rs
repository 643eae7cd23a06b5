//! Persistence: the SQLite key-value slot holding the timer configuration,
//! and the TOML settings file.

pub mod database;
mod settings;
mod slot;

pub use database::Database;
pub use settings::{LogSettings, Settings, StorageSettings, TickSettings};
pub use slot::{ConfigSlot, DatabaseSlot, MemorySlot, DEFAULT_SLOT_KEY};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `POMOLOOP_DATA_DIR` wins when set. Otherwise `~/.config/pomoloop[-dev]/`,
/// picked by `POMOLOOP_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOLOOP_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOLOOP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomoloop-dev")
            } else {
                base_dir.join("pomoloop")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
