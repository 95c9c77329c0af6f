//! Time-based triggers for the generation pass.
//!
//! - [`ClientScheduler`]: the board context. Refreshes, generates and syncs
//!   once at start, then every interval.
//! - [`DailyScheduler`]: the server context. Fires one [`DailyJob`] at a
//!   fixed local hour every day.
//!
//! Both loops run on the current task and stop when their shutdown future
//! resolves; timers live inside the call and are dropped with it.

use super::board::Board;
use super::daily_job::{DailyJob, DailyOutcome};
use super::date::{CalendarPolicy, Clock};
use crate::db::store::TaskStore;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_warning};
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

/// First `hour:00` strictly after `now`.
pub fn next_daily_fire(now: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

pub struct ClientScheduler {
    pub interval: Duration,
}

impl ClientScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub async fn run_until<S, F>(&self, board: &mut Board, store: &S, clock: &dyn Clock, shutdown: F)
    where
        S: TaskStore,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => Self::tick(board, store, clock).await,
            }
        }
        msg_info!(Message::SchedulerStopped);
    }

    /// One refresh, generation and sync round. Failures are logged; the loop keeps going.
    ///
    /// The board is re-read from the store first so children written by
    /// another context count in the existence check. When the read fails the
    /// pass runs over the local list.
    pub async fn tick<S: TaskStore>(board: &mut Board, store: &S, clock: &dyn Clock) {
        let today = clock.today();
        msg_debug!(Message::SchedulerTick(today.to_string()));

        if let Err(e) = board.refresh(store).await {
            msg_warning!(Message::BoardRefreshFailed(e.to_string()));
        }

        let children = board.run_generation(today);
        if !children.is_empty() {
            msg_info!(Message::ChildrenGenerated(children.len(), today.to_string()));
        }

        match board.sync(store).await {
            Ok(delivered) if delivered > 0 => msg_debug!(Message::SyncDelivered(delivered)),
            Ok(_) => {}
            Err(e) => msg_error!(Message::GenerationFailed(e.to_string())),
        }
        if !board.queue().is_empty() {
            msg_warning!(Message::SyncPending(board.queue().len()));
        }
        if let Err(e) = board.save_cache() {
            msg_warning!(Message::CacheSaveFailed(e.to_string()));
        }
    }
}

pub struct DailyScheduler {
    pub hour: u32,
    pub policy: CalendarPolicy,
}

impl DailyScheduler {
    pub fn new(hour: u32, policy: CalendarPolicy) -> Self {
        Self { hour, policy }
    }

    /// Time left until the next firing, measured on the policy's wall clock.
    pub fn until_next_fire(&self) -> Duration {
        let now = self.policy.now();
        let next = next_daily_fire(now, self.hour);
        msg_info!(Message::NextDailyRun(next.format("%Y-%m-%d %H:%M").to_string()));
        (next - now).to_std().unwrap_or(Duration::ZERO)
    }

    pub async fn run_until<S, F>(&self, job: &mut DailyJob, store: &S, clock: &dyn Clock, shutdown: F)
    where
        S: TaskStore,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let wait = self.until_next_fire();
            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(wait) => match job.run(store, clock).await {
                    Ok(DailyOutcome::Completed(report)) if report.failed > 0 => {
                        msg_warning!(Message::ChildrenWriteFailures(report.failed))
                    }
                    Ok(_) => {}
                    Err(e) => msg_error!(Message::GenerationFailed(e.to_string())),
                },
            }
        }
        msg_info!(Message::SchedulerStopped);
    }
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C on Windows).
///
/// The handler task reports through a oneshot channel. If no handler could
/// be installed the future never resolves and the default signal behaviour
/// terminates the process.
pub fn shutdown_signal() -> impl Future<Output = ()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    msg_error!(Message::SignalHandlerFailed(e.to_string()));
                    return;
                }
            };
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = sigint.recv() => {}
            }
            msg_info!(Message::ShutdownRequested);
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => msg_info!(Message::ShutdownRequested),
                Err(e) => {
                    msg_error!(Message::SignalHandlerFailed(e.to_string()));
                    return;
                }
            }
            let _ = shutdown_tx.send(());
        });
    }

    async move {
        if shutdown_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
