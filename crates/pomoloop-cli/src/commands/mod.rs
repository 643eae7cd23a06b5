pub mod config;
pub mod settings;
pub mod timer;

use pomoloop_core::{ConfigSlot, Database, DatabaseSlot, Settings, TimerConfig, TimerStore};

/// Open the store backed by the on-disk database slot named in `settings`.
///
/// Section ids must stay stable between invocations, so a missing or invalid
/// slot is seeded with the fallback config right away.
pub fn open_store(settings: &Settings) -> Result<TimerStore, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let slot = DatabaseSlot::new(db, settings.storage.slot_key.clone());
    let seeded = slot
        .load()?
        .is_some_and(|blob| TimerConfig::from_json(&blob).is_ok());

    let store = TimerStore::with_interval(slot, settings.tick_interval());
    if !seeded {
        store.set_config(store.config());
    }
    Ok(store)
}
