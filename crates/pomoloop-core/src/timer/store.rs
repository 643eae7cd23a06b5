//! Timer store.
//!
//! Owns the live [`TimerConfig`] and [`TimerState`], persists every config
//! change to a [`ConfigSlot`], and drives the state machine from a one-second
//! [`TickDriver`] while running.
//!
//! Config changes re-derive the timer only while it is idle. A running or
//! paused countdown keeps its current shape until the next reset.
//!
//! ## Usage
//!
//! ```ignore
//! let store = TimerStore::new(slot);
//! let mut rx = store.subscribe();
//! store.start(); // needs a Tokio runtime for the driver
//! while rx.changed().await.is_ok() {
//!     render(&rx.borrow());
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use super::config::{create_default_config, create_section, SectionUpdate, TimerConfig, TimerMode};
use super::driver::TickDriver;
use super::machine::{create_initial_state, transition, TimerAction, TimerState, TimerStatus};
use crate::storage::ConfigSlot;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What a host renders: the active config and timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub config: TimerConfig,
    pub timer: TimerState,
}

struct Inner {
    config: TimerConfig,
    timer: TimerState,
    slot: Box<dyn ConfigSlot>,
}

/// State reachable from the driver task.
struct Shared {
    inner: Mutex<Inner>,
    updates: watch::Sender<StoreSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(StoreSnapshot {
            config: inner.config.clone(),
            timer: inner.timer.clone(),
        });
    }

    fn dispatch(&self, action: TimerAction) {
        let mut inner = self.lock();
        let next = transition(&inner.timer, action, &inner.config);
        if next == inner.timer {
            return;
        }
        if next.current_phase != inner.timer.current_phase
            || next.current_section_index != inner.timer.current_section_index
        {
            debug!(
                ?action,
                from = ?inner.timer.current_phase,
                to = ?next.current_phase,
                section = next.current_section_index,
                loop_no = next.current_loop,
                "phase advanced"
            );
        } else {
            trace!(?action, remaining = next.remaining_time_sec, "timer updated");
        }
        inner.timer = next;
        self.publish(&inner);
    }

    /// Derive a new config from the current one, then persist and install it
    /// under a single lock. `edit` returning `None` leaves everything as is.
    /// Re-derives the timer when `resync` is set and the timer is idle.
    fn edit_config<F>(&self, resync: bool, edit: F)
    where
        F: FnOnce(&TimerConfig) -> Option<TimerConfig>,
    {
        let mut inner = self.lock();
        let Some(config) = edit(&inner.config) else {
            return;
        };
        match config.to_json() {
            Ok(blob) => {
                if let Err(e) = inner.slot.save(&blob) {
                    warn!("failed to persist timer config: {e}");
                }
            }
            Err(e) => warn!("failed to serialize timer config: {e}"),
        }
        if resync && inner.timer.status == TimerStatus::Idle {
            inner.timer = create_initial_state(&config);
        }
        inner.config = config;
        debug!(
            sections = inner.config.sections.len(),
            mode = ?inner.config.mode,
            "timer config replaced"
        );
        self.publish(&inner);
    }
}

/// Stateful owner of one timer.
///
/// All actions take `&self`; share it behind an `Arc` if several tasks need
/// to drive it.
pub struct TimerStore {
    shared: Arc<Shared>,
    driver: Mutex<Option<TickDriver>>,
    tick_interval: Duration,
}

impl TimerStore {
    /// Create a store ticking once per second.
    pub fn new(slot: impl ConfigSlot + 'static) -> Self {
        Self::with_interval(slot, DEFAULT_TICK_INTERVAL)
    }

    /// Create a store whose driver ticks every `tick_interval`.
    ///
    /// Loads the persisted config from `slot`, falling back to the default
    /// config when it is missing or invalid.
    pub fn with_interval(slot: impl ConfigSlot + 'static, tick_interval: Duration) -> Self {
        let config = load_config(&slot);
        let timer = create_initial_state(&config);
        let (updates, _) = watch::channel(StoreSnapshot {
            config: config.clone(),
            timer: timer.clone(),
        });
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    config,
                    timer,
                    slot: Box::new(slot),
                }),
                updates,
            }),
            driver: Mutex::new(None),
            tick_interval,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> TimerConfig {
        self.shared.lock().config.clone()
    }

    pub fn timer(&self) -> TimerState {
        self.shared.lock().timer.clone()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.shared.lock();
        StoreSnapshot {
            config: inner.config.clone(),
            timer: inner.timer.clone(),
        }
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Whether a tick driver is currently installed.
    pub fn has_driver(&self) -> bool {
        self.driver_slot()
            .as_ref()
            .is_some_and(|driver| !driver.is_finished())
    }

    // ── Config actions ───────────────────────────────────────────────

    /// Replace the whole config. Invalid configs are ignored.
    pub fn set_config(&self, config: TimerConfig) {
        if let Err(e) = config.validate() {
            warn!("ignoring invalid timer config: {e}");
            return;
        }
        self.shared.edit_config(true, |_| Some(config));
    }

    /// Truncate to `count` sections, or append copies of the first section's
    /// durations. `0` is ignored.
    pub fn set_section_count(&self, count: usize) {
        if count == 0 {
            warn!("ignoring section count of zero");
            return;
        }
        self.shared.edit_config(true, |current| {
            let mut config = current.clone();
            let len = config.sections.len();
            if count <= len {
                config.sections.truncate(count);
            } else {
                let (work, brk) = config
                    .sections
                    .first()
                    .map(|s| (s.work_duration_sec, s.break_duration_sec))
                    .unwrap_or_default();
                config
                    .sections
                    .extend((len..count).map(|_| create_section(work, brk)));
            }
            Some(config)
        });
    }

    /// Merge `updates` into the section with `id`. Unknown ids are a no-op:
    /// nothing is persisted or published.
    pub fn update_section(&self, id: &str, updates: SectionUpdate) {
        self.shared.edit_config(true, |current| {
            let mut config = current.clone();
            let Some(section) = config.sections.iter_mut().find(|s| s.id == id) else {
                debug!(id, "update for unknown section ignored");
                return None;
            };
            updates.apply(section);
            Some(config)
        });
    }

    /// Switch the editing mode. Never touches the timer.
    pub fn set_mode(&self, mode: TimerMode) {
        self.shared.edit_config(false, |current| {
            Some(TimerConfig {
                mode,
                ..current.clone()
            })
        });
    }

    // ── Timer actions ────────────────────────────────────────────────

    /// Run the timer and (re)install the tick driver.
    pub fn start(&self) {
        self.shared.dispatch(TimerAction::Start);

        let mut slot = self.driver_slot();
        if let Some(old) = slot.take() {
            old.cancel();
        }
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        *slot = TickDriver::spawn(self.tick_interval, move || match weak.upgrade() {
            Some(shared) => {
                shared.dispatch(TimerAction::Tick);
                true
            }
            None => false,
        });
        if let Some(driver) = slot.as_ref() {
            info!(period = ?driver.period(), "tick driver started");
        } else {
            warn!("no Tokio runtime; timer will only advance on explicit tick()");
        }
    }

    pub fn pause(&self) {
        self.shared.dispatch(TimerAction::Pause);
        self.cancel_driver();
    }

    pub fn reset(&self) {
        self.shared.dispatch(TimerAction::Reset);
        self.cancel_driver();
    }

    /// Jump to the next phase. Leaves the driver alone.
    pub fn skip(&self) {
        self.shared.dispatch(TimerAction::Skip);
    }

    pub fn tick(&self) {
        self.shared.dispatch(TimerAction::Tick);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn driver_slot(&self) -> MutexGuard<'_, Option<TickDriver>> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_driver(&self) {
        if let Some(driver) = self.driver_slot().take() {
            driver.cancel();
            info!("tick driver stopped");
        }
    }
}

impl Default for TimerStore {
    fn default() -> Self {
        Self::new(crate::storage::MemorySlot::new())
    }
}

/// Read and validate the persisted config, or fall back to the default.
fn load_config(slot: &dyn ConfigSlot) -> TimerConfig {
    match slot.load() {
        Ok(Some(blob)) => match TimerConfig::from_json(&blob) {
            Ok(config) => {
                debug!(sections = config.sections.len(), "loaded persisted timer config");
                config
            }
            Err(e) => {
                warn!("persisted timer config is invalid, using defaults: {e}");
                create_default_config()
            }
        },
        Ok(None) => {
            debug!("no persisted timer config, using defaults");
            create_default_config()
        }
        Err(e) => {
            warn!("failed to read timer config, using defaults: {e}");
            create_default_config()
        }
    }
}
