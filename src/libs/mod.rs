pub mod board;
pub mod config;
pub mod daily_job;
pub mod data_storage;
pub mod date;
pub mod generator;
pub mod lock;
pub mod messages;
pub mod recurrence;
pub mod reference;
pub mod scheduler;
pub mod sync_queue;
pub mod task;
pub mod view;
