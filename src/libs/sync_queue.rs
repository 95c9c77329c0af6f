//! Write-behind queue of task changes waiting for the shared store.
//!
//! Operations are delivered in FIFO order. A failed delivery stops the flush
//! and leaves that operation at the head of the queue, so nothing is skipped
//! and every change reaches the store at least once. When opened from a file
//! the queue is rewritten after every change and survives restarts.
//!
//! A create that was already attempted may have reached the store even though
//! no success was recorded. Before it is sent again the store snapshot is
//! checked for its id, so a retry never writes a second copy.

use super::data_storage::DataStorage;
use super::task::Task;
use crate::db::store::{StoreError, TaskStore};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_warning};
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use ulid::Ulid;

pub const SYNC_QUEUE_FILE_NAME: &str = "sync_queue.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncKind::Create => "create",
            SyncKind::Update => "update",
            SyncKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOperation {
    pub id: String,
    pub kind: SyncKind,
    pub task: Task,
    /// RFC 3339 UTC timestamp.
    pub queued_at: String,
    /// Delivery attempts started so far, recorded before each send.
    #[serde(default)]
    pub attempts: u32,
}

impl SyncOperation {
    pub fn new(kind: SyncKind, task: &Task) -> Self {
        Self {
            id: Ulid::new().to_string(),
            kind,
            task: task.clone(),
            queued_at: Utc::now().to_rfc3339(),
            attempts: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct SyncQueue {
    operations: VecDeque<SyncOperation>,
    path: Option<PathBuf>,
}

impl SyncQueue {
    /// Queue that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Persistent queue in the application data directory.
    pub fn open() -> Result<Self> {
        let path = DataStorage::new().get_path(SYNC_QUEUE_FILE_NAME)?;
        Self::open_at(path)
    }

    /// Persistent queue at `path`. A missing file is an empty queue. An
    /// unreadable one is moved to `<path>.corrupt` and the queue starts empty.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let operations = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str::<VecDeque<SyncOperation>>(&raw) {
                Ok(operations) => operations,
                Err(e) => {
                    msg_warning!(Message::SyncQueueLoadFailed(e.to_string()));
                    let aside = corrupt_path(&path);
                    fs::rename(&path, &aside)?;
                    msg_warning!(Message::SyncQueueSetAside(aside.display().to_string()));
                    VecDeque::new()
                }
            }
        } else {
            VecDeque::new()
        };

        Ok(Self {
            operations,
            path: Some(path),
        })
    }

    pub fn push(&mut self, kind: SyncKind, task: &Task) {
        msg_debug!(Message::SyncQueued(kind.to_string(), task.id.clone()));
        self.operations.push_back(SyncOperation::new(kind, task));
        self.persist();
    }

    pub fn pending(&self) -> impl Iterator<Item = &SyncOperation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Delivers queued operations in order and returns how many were delivered.
    ///
    /// Stops at the first failure. An update or delete answered with
    /// `NotFound` refers to a record that no longer exists remotely and is
    /// discarded so it cannot block the queue. A create whose id the store
    /// already holds counts as delivered.
    pub async fn flush<S: TaskStore>(&mut self, store: &S) -> Result<usize> {
        let mut delivered = 0;
        let mut remote_ids: Option<HashSet<String>> = None;

        while let Some(front) = self.operations.front_mut() {
            let retry = front.attempts > 0;
            front.attempts += 1;
            let op = front.clone();
            self.persist();

            let result = match op.kind {
                SyncKind::Create if retry => match remote_has(store, &mut remote_ids, &op.task.id).await {
                    Ok(true) => Err(StoreError::AlreadyExists(op.task.id.clone())),
                    Ok(false) => store.append_task(&op.task).await,
                    Err(e) => Err(e),
                },
                SyncKind::Create => store.append_task(&op.task).await,
                SyncKind::Update => store.update_task(&op.task).await,
                SyncKind::Delete => store.delete_task(&op.task.id).await,
            };

            match result {
                Ok(()) => delivered += 1,
                Err(StoreError::AlreadyExists(_)) if op.kind == SyncKind::Create => {
                    msg_debug!(Message::SyncAlreadyDelivered(op.task.id.clone()));
                    delivered += 1;
                }
                Err(StoreError::NotFound(_)) if op.kind != SyncKind::Create => {
                    msg_warning!(Message::SyncOperationDiscarded(op.kind.to_string(), op.task.id.clone()));
                }
                Err(e) => {
                    msg_warning!(Message::SyncOperationFailed(op.kind.to_string(), op.task.id.clone(), e.to_string()));
                    break;
                }
            }
            self.operations.pop_front();
            self.persist();
        }

        Ok(delivered)
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let result = serde_json::to_string_pretty(&self.operations)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(path, json).map_err(anyhow::Error::from));
        if let Err(e) = result {
            msg_error!(Message::SyncQueueSaveFailed(e.to_string()));
        }
    }
}

/// Whether the store already holds `id`. The snapshot is read at most once per flush.
async fn remote_has<S: TaskStore>(store: &S, ids: &mut Option<HashSet<String>>, id: &str) -> Result<bool, StoreError> {
    if ids.is_none() {
        *ids = Some(store.list_all_tasks().await?.into_iter().map(|t| t.id).collect());
    }
    Ok(ids.as_ref().is_some_and(|ids| ids.contains(id)))
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut aside = path.as_os_str().to_owned();
    aside.push(".corrupt");
    PathBuf::from(aside)
}
