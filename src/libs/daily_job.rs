//! Server-side daily generation pass.
//!
//! Wraps one [`Generator`] pass in the [`JobLock`] so overlapping triggers
//! (two schedulers, a manual run during the scheduled one) never generate
//! concurrently. States:
//!
//! ```text
//! Idle -> AcquiringLock -> LockFailed -> Idle
//!                       -> Running -> Persisting -> Releasing -> Idle
//! ```

use super::config::SchedulerConfig;
use super::date::{CalendarDate, Clock};
use super::generator::{Generator, PassReport};
use super::lock::JobLock;
use crate::db::store::TaskStore;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_info};
use anyhow::Result;
use std::fmt;
use std::time::Duration;

pub const DAILY_JOB_NAME: &str = "daily-generation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    AcquiringLock,
    LockFailed,
    Running,
    Persisting,
    Releasing,
}

impl fmt::Display for PassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassState::Idle => "idle",
            PassState::AcquiringLock => "acquiring-lock",
            PassState::LockFailed => "lock-failed",
            PassState::Running => "running",
            PassState::Persisting => "persisting",
            PassState::Releasing => "releasing",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum DailyOutcome {
    /// Another run held the lock for the whole timeout; nothing was generated.
    LockNotAcquired,
    Completed(PassReport),
}

pub struct DailyJob {
    lock: JobLock,
    lock_timeout: Duration,
    state: PassState,
    history: Vec<PassState>,
}

impl DailyJob {
    pub fn new(lock: JobLock, lock_timeout: Duration) -> Self {
        Self {
            lock,
            lock_timeout,
            state: PassState::Idle,
            history: vec![PassState::Idle],
        }
    }

    /// Job with its lock file in the application data directory.
    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        let lock = JobLock::new(DAILY_JOB_NAME, Duration::from_secs(config.lock_stale_secs))?;
        Ok(Self::new(lock, Duration::from_secs(config.lock_timeout_secs)))
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// States visited by the most recent run, starting with `Idle`.
    pub fn history(&self) -> &[PassState] {
        &self.history
    }

    pub async fn run<S: TaskStore>(&mut self, store: &S, clock: &dyn Clock) -> Result<DailyOutcome> {
        let today = clock.today();
        self.run_for(store, today).await
    }

    pub async fn run_for<S: TaskStore>(&mut self, store: &S, today: CalendarDate) -> Result<DailyOutcome> {
        self.history.clear();
        self.history.push(self.state);
        self.transition(PassState::AcquiringLock);
        let guard = match self.lock.acquire(self.lock_timeout).await {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                self.transition(PassState::LockFailed);
                msg_info!(Message::DailyJobLockNotAcquired(DAILY_JOB_NAME.to_string()));
                self.transition(PassState::Idle);
                return Ok(DailyOutcome::LockNotAcquired);
            }
            Err(e) => {
                self.transition(PassState::LockFailed);
                self.transition(PassState::Idle);
                return Err(e);
            }
        };

        self.transition(PassState::Running);
        let generator = Generator::new(store);
        let plan = match guard.hold_while(generator.plan(today)).await {
            Ok(plan) => plan,
            Err(e) => {
                self.transition(PassState::Releasing);
                drop(guard);
                self.transition(PassState::Idle);
                return Err(e);
            }
        };

        self.transition(PassState::Persisting);
        let report = guard.hold_while(generator.persist(plan)).await;

        self.transition(PassState::Releasing);
        drop(guard);
        self.transition(PassState::Idle);

        msg_info!(Message::DailyJobCompleted(report.date.to_string(), report.generated.len(), report.failed));
        Ok(DailyOutcome::Completed(report))
    }

    fn transition(&mut self, to: PassState) {
        msg_debug!(Message::DailyJobTransition(DAILY_JOB_NAME.to_string(), self.state.to_string(), to.to_string()));
        self.state = to;
        self.history.push(to);
    }
}
