//! Recurring tick driver.
//!
//! A cancellable Tokio task that invokes a callback once per period, first
//! after one full period. Dropping the handle cancels the task.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to a running tick task.
#[derive(Debug)]
pub struct TickDriver {
    task: JoinHandle<()>,
    period: Duration,
}

impl TickDriver {
    /// Spawn the driver on the current Tokio runtime.
    ///
    /// The callback returns `false` to stop the driver from inside.
    /// Returns `None` when called outside a runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Option<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = Handle::try_current().ok()?;
        // interval_at panics on a zero period
        let period = period.max(Duration::from_millis(1));
        let task = handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Some(Self { task, period })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
