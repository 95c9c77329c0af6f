//! Persistence for tasks and their reference data.
//!
//! [`store::TaskStore`] is the port every task consumer goes through. It is
//! implemented by the SQLite store in [`tasks`], the in-process
//! [`memory::MemoryStore`] and the HTTP spreadsheet store in
//! `crate::api::sheets`. [`backend::Backend`] picks one from configuration.
//!
//! ```rust,no_run
//! use taskboard::db::store::TaskStore;
//! use taskboard::db::tasks::Tasks;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let tasks = Tasks::new()?;
//! let all = tasks.list_all_tasks().await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod clients;
pub mod db;
pub mod memory;
pub mod migrations;
pub mod store;
pub mod tasks;
pub mod users;
