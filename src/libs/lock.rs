//! Cross-process job lock.
//!
//! A [`JobLock`] is a lock file created with `create_new`, so at most one
//! process on the host holds it at a time. The file records the holder's pid,
//! a random token and the acquisition time. A lock older than `stale_after`
//! belongs to a crashed holder and is removed on the next acquisition attempt.
//! Live holders refresh the time while they work (see [`LockGuard::hold_while`]).
//!
//! Eviction moves the stale file aside before deleting it and checks that the
//! moved file still carries the token that was judged stale. If another
//! contender replaced the lock in between, the file is linked back untouched.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use taskboard::libs::lock::{with_exclusive_lock, JobLock};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let lock = JobLock::new("daily-generation", Duration::from_secs(3600))?;
//! let ran = with_exclusive_lock(&lock, Duration::from_secs(600), || async { Ok(42) }).await?;
//! assert_eq!(ran, Some(42));
//! # Ok(())
//! # }
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_info, msg_warning};
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::future::Future;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use ulid::Ulid;

pub const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    pid: u32,
    token: String,
    acquired_at: i64, // unix millis
}

#[derive(Debug, Clone)]
pub struct JobLock {
    name: String,
    path: PathBuf,
    stale_after: Duration,
    poll_interval: Duration,
}

impl JobLock {
    /// Lock file `<name>.lock` in the application data directory.
    pub fn new(name: &str, stale_after: Duration) -> Result<Self> {
        let path = DataStorage::new().get_path(&format!("{}.lock", name))?;
        Ok(Self::at(name, path, stale_after))
    }

    pub fn at<P: AsRef<Path>>(name: &str, path: P, stale_after: Duration) -> Self {
        Self {
            name: name.to_string(),
            path: path.as_ref().to_path_buf(),
            stale_after,
            poll_interval: LOCK_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_held(&self) -> bool {
        self.path.exists()
    }

    /// How often a holder refreshes its acquisition time.
    pub fn heartbeat_interval(&self) -> Duration {
        (self.stale_after / 3).max(Duration::from_millis(10))
    }

    /// Single acquisition attempt. `None` when another live holder has the lock.
    pub fn try_acquire(&self) -> Result<Option<LockGuard>> {
        if let Some(guard) = self.create()? {
            return Ok(Some(guard));
        }
        if let Some(stale) = self.stale_holder() {
            if self.evict(stale.token.as_deref())? {
                msg_warning!(Message::StaleLockRemoved(self.name.clone()));
            }
            return self.create();
        }
        Ok(None)
    }

    /// Removes the lock file if it still carries `token` (`None` for a file
    /// whose body could not be read). Returns whether it was removed.
    pub fn evict(&self, token: Option<&str>) -> Result<bool> {
        let file_name = self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let aside = self.path.with_file_name(format!("{}.{}.evicted", file_name, Ulid::new()));
        match fs::rename(&self.path, &aside) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        let moved = read_info(&aside).map(|info| info.token);
        if moved.as_deref() == token {
            fs::remove_file(&aside)?;
            return Ok(true);
        }

        // Another contender already replaced the stale lock: put its file back.
        match fs::hard_link(&aside, &self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => msg_warning!(Message::LockRestoreFailed(self.name.clone(), e.to_string())),
            Err(_) => {
                fs::rename(&aside, &self.path)?;
                return Ok(false);
            }
        }
        fs::remove_file(&aside)?;
        Ok(false)
    }

    /// Waits up to `timeout` for the lock, polling every poll interval.
    pub async fn acquire(&self, timeout: Duration) -> Result<Option<LockGuard>> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut announced = false;

        loop {
            if let Some(guard) = self.try_acquire()? {
                msg_debug!(Message::LockAcquired(self.name.clone()));
                return Ok(Some(guard));
            }

            let now = tokio::time::Instant::now();
            if now >= deadline {
                msg_info!(Message::LockTimedOut(self.name.clone(), timeout.as_secs()));
                return Ok(None);
            }
            if !announced {
                msg_debug!(Message::LockBusy(self.name.clone()));
                announced = true;
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    fn create(&self) -> Result<Option<LockGuard>> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let info = LockInfo {
            pid: std::process::id(),
            token: Ulid::new().to_string(),
            acquired_at: Utc::now().timestamp_millis(),
        };
        let guard = LockGuard {
            name: self.name.clone(),
            path: self.path.clone(),
            token: info.token.clone(),
            heartbeat: self.heartbeat_interval(),
        };
        // The guard owns the file from here on, so a failed write still releases it.
        file.write_all(serde_json::to_string(&info)?.as_bytes())?;
        Ok(Some(guard))
    }

    /// The current holder, if its lock has gone stale.
    fn stale_holder(&self) -> Option<StaleHolder> {
        let info = read_info(&self.path);
        let acquired_at = match &info {
            Some(info) => info.acquired_at,
            // Unreadable or half-written: judge by the file's age instead.
            None => match fs::metadata(&self.path).and_then(|m| m.modified()) {
                Ok(modified) => chrono::DateTime::<Utc>::from(modified).timestamp_millis(),
                Err(_) => return None,
            },
        };
        let age_ms = Utc::now().timestamp_millis().saturating_sub(acquired_at);
        let stale = age_ms >= 0 && age_ms as u128 >= self.stale_after.as_millis();
        stale.then(|| StaleHolder {
            token: info.map(|info| info.token),
        })
    }
}

struct StaleHolder {
    token: Option<String>,
}

fn read_info(path: &Path) -> Option<LockInfo> {
    fs::read_to_string(path).ok().and_then(|s| serde_json::from_str::<LockInfo>(&s).ok())
}

/// Held lock. Dropping it removes the lock file if it still carries this guard's token.
#[derive(Debug)]
pub struct LockGuard {
    name: String,
    path: PathBuf,
    token: String,
    heartbeat: Duration,
}

impl LockGuard {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stamps the lock with the current time. `false` when the lock file no
    /// longer belongs to this guard.
    pub fn refresh(&self) -> Result<bool> {
        if !read_info(&self.path).is_some_and(|info| info.token == self.token) {
            return Ok(false);
        }
        let info = LockInfo {
            pid: std::process::id(),
            token: self.token.clone(),
            acquired_at: Utc::now().timestamp_millis(),
        };
        fs::write(&self.path, serde_json::to_string(&info)?)?;
        Ok(true)
    }

    /// Awaits `work`, refreshing the lock every heartbeat interval so a run
    /// longer than the staleness window keeps its lock.
    pub async fn hold_while<F: Future>(&self, work: F) -> F::Output {
        tokio::pin!(work);
        let mut heartbeat = tokio::time::interval(self.heartbeat);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the lock was just written.
        heartbeat.tick().await;

        loop {
            tokio::select! {
                output = &mut work => return output,
                _ = heartbeat.tick() => {
                    if let Err(e) = self.refresh() {
                        msg_warning!(Message::LockRefreshFailed(self.name.clone(), e.to_string()));
                    }
                }
            }
        }
    }

    fn release(&self) -> Result<()> {
        let owned = read_info(&self.path).map_or(true, |info| info.token == self.token);
        if !owned {
            return Ok(());
        }
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            msg_warning!(Message::LockReleaseFailed(self.name.clone(), e.to_string()));
        }
    }
}

/// Runs `body` while holding `lock`.
///
/// Returns `Ok(None)` without running `body` when the lock is not acquired
/// within `timeout`. The lock is kept fresh while `body` runs and released on
/// every exit path of `body`.
pub async fn with_exclusive_lock<F, Fut, T>(lock: &JobLock, timeout: Duration, body: F) -> Result<Option<T>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let Some(guard) = lock.acquire(timeout).await? else {
        return Ok(None);
    };
    let result = guard.hold_while(body()).await;
    drop(guard);
    result.map(Some)
}
