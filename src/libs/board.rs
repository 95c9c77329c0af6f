//! Client-side task board.
//!
//! The board keeps a local task list, applies every change to it first and
//! queues the matching store write in a [`SyncQueue`]. Reads fall back to a
//! JSON cache of the last known list when the store is unreachable.
//!
//! ```rust,no_run
//! use taskboard::db::memory::MemoryStore;
//! use taskboard::libs::board::Board;
//! use taskboard::libs::date::CalendarDate;
//! use taskboard::libs::sync_queue::SyncQueue;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = MemoryStore::default();
//! let mut board = Board::load(&store, SyncQueue::in_memory(), None).await?;
//! let today = CalendarDate::parse("2025-01-10")?;
//! board.run_generation(today);
//! board.sync(&store).await?;
//! # Ok(())
//! # }
//! ```

use super::data_storage::DataStorage;
use super::date::CalendarDate;
use super::generator::generate_children_for_date;
use super::sync_queue::{SyncKind, SyncQueue};
use super::task::{deletion_plan, Status, Task, TaskFilter};
use crate::db::store::{StoreError, TaskStore};
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_debug, msg_error_anyhow, msg_warning};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = "tasks.json";

pub fn default_cache_path() -> Result<PathBuf> {
    DataStorage::new().get_path(CACHE_FILE_NAME)
}

#[derive(Debug)]
pub struct Board {
    tasks: Vec<Task>,
    queue: SyncQueue,
    cache_path: Option<PathBuf>,
}

impl Board {
    pub fn new(tasks: Vec<Task>, queue: SyncQueue) -> Self {
        let mut board = Self {
            tasks: tasks.into_iter().map(Task::normalized).collect(),
            queue,
            cache_path: None,
        };
        board.apply_pending();
        board
    }

    pub fn with_cache<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Loads the full task list from `store`.
    ///
    /// When the store read fails and `cache_path` holds a readable cache, the
    /// cached list is used instead and the failure is logged. Changes still
    /// waiting in `queue` are replayed over whichever list was loaded.
    pub async fn load<S: TaskStore>(store: &S, queue: SyncQueue, cache_path: Option<PathBuf>) -> Result<Self> {
        let tasks = match store.list_all_tasks().await {
            Ok(tasks) => {
                msg_debug!(Message::BoardLoaded(tasks.len()));
                tasks
            }
            Err(e) => match cache_path.as_deref().map(read_cache).transpose()?.flatten() {
                Some(cached) => {
                    msg_warning!(Message::BoardLoadedFromCache(cached.len(), e.to_string()));
                    cached
                }
                None => return Err(e.into()),
            },
        };

        let mut board = Board::new(tasks, queue);
        board.cache_path = cache_path;
        Ok(board)
    }

    /// Replaces the local list with a fresh store snapshot and replays
    /// pending changes over it. A failed read leaves the local list as it was.
    pub async fn refresh<S: TaskStore>(&mut self, store: &S) -> Result<usize, StoreError> {
        let tasks = store.list_all_tasks().await?;
        msg_debug!(Message::BoardLoaded(tasks.len()));
        self.tasks = tasks.into_iter().map(Task::normalized).collect();
        self.apply_pending();
        Ok(self.tasks.len())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks shown in board columns: everything except recurring templates.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        TaskFilter::Board.apply(&self.tasks)
    }

    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(&self.tasks)
    }

    /// Adds a task and queues its creation. A new mother gets today's
    /// instance right away; the generated children are returned.
    pub fn create_task(&mut self, task: Task, today: CalendarDate) -> Vec<Task> {
        let mut task = task.normalized();
        if task.status == Status::Done && task.completed_date.is_none() {
            task.completed_date = Some(today);
        }
        let is_mother = task.is_mother();

        self.queue.push(SyncKind::Create, &task);
        self.tasks.push(task);

        if is_mother {
            self.run_generation(today)
        } else {
            Vec::new()
        }
    }

    /// Replaces the stored copy of `task`, keeping `completed_date` in step
    /// with the status change relative to the current copy.
    pub fn update_task(&mut self, task: Task, today: CalendarDate) -> Result<()> {
        let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            msg_bail_anyhow!(Message::TaskNotFound(task.id));
        };

        let mut updated = task.normalized();
        let target = updated.status;
        updated.status = existing.status;
        updated.completed_date = existing.completed_date;
        updated.set_status(target, today);

        self.queue.push(SyncKind::Update, &updated);
        *existing = updated;
        Ok(())
    }

    pub fn set_status(&mut self, id: &str, status: Status, today: CalendarDate) -> Result<Task> {
        let Some(mut task) = self.get(id).cloned() else {
            msg_bail_anyhow!(Message::TaskNotFound(id.to_string()));
        };
        task.status = status;
        self.update_task(task, today)?;
        self.get(id).cloned().ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(id.to_string())))
    }

    /// Removes a task, cascading from a mother to its unfinished children.
    /// Returns the removed tasks.
    pub fn delete_task(&mut self, id: &str) -> Result<Vec<Task>> {
        let Some(task) = self.get(id) else {
            msg_bail_anyhow!(Message::TaskNotFound(id.to_string()));
        };
        let ids = deletion_plan(task, &self.tasks);

        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks).into_iter().partition(|t| ids.contains(&t.id));
        self.tasks = kept;
        for task in &removed {
            self.queue.push(SyncKind::Delete, task);
        }
        Ok(removed)
    }

    /// Generation pass over the local list. New children are added locally and queued.
    pub fn run_generation(&mut self, today: CalendarDate) -> Vec<Task> {
        let children = generate_children_for_date(today, &self.tasks);
        for child in &children {
            self.queue.push(SyncKind::Create, child);
        }
        self.tasks.extend(children.iter().cloned());
        children
    }

    /// Delivers queued changes to `store`; returns how many were delivered.
    pub async fn sync<S: TaskStore>(&mut self, store: &S) -> Result<usize> {
        self.queue.flush(store).await
    }

    pub fn save_cache(&self) -> Result<()> {
        let Some(path) = &self.cache_path else {
            return Ok(());
        };
        fs::write(path, serde_json::to_string_pretty(&self.tasks)?)?;
        Ok(())
    }

    fn apply_pending(&mut self) {
        let pending: Vec<(SyncKind, Task)> = self.queue.pending().map(|op| (op.kind, op.task.clone())).collect();
        for (kind, task) in pending {
            match kind {
                SyncKind::Create | SyncKind::Update => match self.tasks.iter_mut().find(|t| t.id == task.id) {
                    Some(existing) => *existing = task,
                    None => self.tasks.push(task),
                },
                SyncKind::Delete => self.tasks.retain(|t| t.id != task.id),
            }
        }
    }
}

fn read_cache(path: &Path) -> Result<Option<Vec<Task>>> {
    if !path.exists() {
        msg_debug!(Message::BoardCacheMissing);
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}
