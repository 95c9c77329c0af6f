//! The task store port.
//!
//! The generator and the board only need four operations from wherever tasks
//! live: a full snapshot read and single-record append, update and delete.
//! Appending an id that is already stored answers `AlreadyExists` where the
//! store can tell; the spreadsheet store cannot, so callers must never append
//! the same logical task twice.

use crate::libs::task::Task;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read tasks: {0}")]
    Read(String),
    #[error("failed to write task '{id}': {reason}")]
    Write { id: String, reason: String },
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task already exists: {0}")]
    AlreadyExists(String),
    #[error("failed to decode task record: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn write(id: &str, reason: impl ToString) -> Self {
        StoreError::Write {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait TaskStore {
    /// Every task in the store, unfiltered.
    async fn list_all_tasks(&self) -> Result<Vec<Task>, StoreError>;

    async fn append_task(&self, task: &Task) -> Result<(), StoreError>;

    async fn update_task(&self, task: &Task) -> Result<(), StoreError>;

    async fn delete_task(&self, id: &str) -> Result<(), StoreError>;
}
