//! In-process task store.
//!
//! Holds tasks in memory behind a `parking_lot` mutex. A duplicate append
//! answers `AlreadyExists` and update or delete of an unknown id answers
//! `NotFound`, the same as the SQLite store.

use super::store::{StoreError, TaskStore};
use crate::libs::task::Task;
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks: Mutex::new(tasks) }
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

impl TaskStore for MemoryStore {
    async fn list_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.lock().clone())
    }

    async fn append_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock();
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::AlreadyExists(task.id.clone()));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(task.id.clone())),
        }
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
