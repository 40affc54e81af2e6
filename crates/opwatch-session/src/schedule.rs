//! Interval Controller
//!
//! Owns the two repeating schedules of a monitor. At most one task runs per
//! schedule; starting a schedule again replaces the previous task.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::SessionError;
use crate::Result;

/// Longest period a schedule runs with, the same far-future horizon tokio
/// uses for its own timers. Larger periods would overflow the clock.
const MAX_PERIOD: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    /// Probe the OP check-session frame
    CheckSession,
    /// Unconditional `prompt=none` refresh
    SessionRefresh,
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schedule::CheckSession => write!(f, "check_session"),
            Schedule::SessionRefresh => write!(f, "session_refresh"),
        }
    }
}

pub struct IntervalController {
    tasks: Mutex<HashMap<Schedule, JoinHandle<()>>>,
}

impl IntervalController {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Run `tick` every `period`, first after one full period.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(&self, schedule: Schedule, period: Duration, mut tick: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let period = period.min(MAX_PERIOD);
        // Measured from the call, not from when the task is first polled
        let first_tick = Instant::now() + period;
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick();
            }
        });

        if let Some(previous) = self.tasks.lock().insert(schedule, task) {
            previous.abort();
        }

        tracing::debug!(
            schedule = %schedule,
            period_secs = period.as_secs(),
            "Schedule started"
        );

        Ok(())
    }

    pub fn stop(&self, schedule: Schedule) {
        if let Some(task) = self.tasks.lock().remove(&schedule) {
            task.abort();
            tracing::debug!(schedule = %schedule, "Schedule stopped");
        }
    }

    pub fn is_active(&self, schedule: Schedule) -> bool {
        self.tasks
            .lock()
            .get(&schedule)
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop both schedules. Safe to call at any time, any number of times.
    pub fn reset(&self) {
        let mut tasks = self.tasks.lock();
        for (_, task) in tasks.drain() {
            task.abort();
        }
    }
}

impl Default for IntervalController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IntervalController {
    fn drop(&mut self) {
        self.reset();
    }
}
