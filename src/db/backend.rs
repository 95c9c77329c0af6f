use super::store::{StoreError, TaskStore};
use super::tasks::Tasks;
use crate::api::sheets::SheetsStore;
use crate::libs::config::{Config, StoreBackend};
use crate::libs::date::SystemClock;
use crate::libs::messages::Message;
use crate::libs::task::Task;
use crate::msg_debug;
use anyhow::Result;

/// The configured task store.
pub enum Backend {
    Sqlite(Tasks),
    Sheets(SheetsStore),
}

impl Backend {
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = config.store();
        msg_debug!(Message::StoreBackend(store.backend.as_str().to_string()));
        match store.backend {
            StoreBackend::Sqlite => Ok(Backend::Sqlite(Tasks::new()?)),
            StoreBackend::Sheets => Ok(Backend::Sheets(SheetsStore::new(&store, SystemClock::new(config.calendar_policy()))?)),
        }
    }
}

impl TaskStore for Backend {
    async fn list_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        match self {
            Backend::Sqlite(store) => store.list_all_tasks().await,
            Backend::Sheets(store) => store.list_all_tasks().await,
        }
    }

    async fn append_task(&self, task: &Task) -> Result<(), StoreError> {
        match self {
            Backend::Sqlite(store) => store.append_task(task).await,
            Backend::Sheets(store) => store.append_task(task).await,
        }
    }

    async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        match self {
            Backend::Sqlite(store) => store.update_task(task).await,
            Backend::Sheets(store) => store.update_task(task).await,
        }
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Backend::Sqlite(store) => store.delete_task(id).await,
            Backend::Sheets(store) => store.delete_task(id).await,
        }
    }
}
