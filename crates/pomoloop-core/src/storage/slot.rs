//! The named storage slot the timer store persists its configuration into.

use std::sync::{Arc, Mutex};

use super::Database;
use crate::error::{CoreError, Result};

pub const DEFAULT_SLOT_KEY: &str = "pomodoro-timer-config";

/// A single slot holding the serialized timer configuration.
pub trait ConfigSlot: Send {
    /// Read the raw blob. `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored blob.
    fn save(&self, blob: &str) -> Result<()>;
}

/// Slot stored as one row of the SQLite `kv` table.
pub struct DatabaseSlot {
    db: Database,
    key: String,
}

impl DatabaseSlot {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        Self { db, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl ConfigSlot for DatabaseSlot {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.db.kv_get(&self.key)?)
    }

    fn save(&self, blob: &str) -> Result<()> {
        Ok(self.db.kv_set(&self.key, blob)?)
    }
}

/// In-memory slot. Clones share the same cell, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    cell: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(blob: impl Into<String>) -> Self {
        Self {
            cell: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Current contents.
    pub fn get(&self) -> Option<String> {
        self.cell.lock().ok().and_then(|cell| cell.clone())
    }
}

impl ConfigSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>> {
        let cell = self
            .cell
            .lock()
            .map_err(|_| CoreError::Custom("memory slot poisoned".into()))?;
        Ok(cell.clone())
    }

    fn save(&self, blob: &str) -> Result<()> {
        let mut cell = self
            .cell
            .lock()
            .map_err(|_| CoreError::Custom("memory slot poisoned".into()))?;
        *cell = Some(blob.to_string());
        Ok(())
    }
}
