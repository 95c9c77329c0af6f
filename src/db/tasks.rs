//! SQLite-backed [`TaskStore`].
//!
//! One row per task. Dates are stored as canonical `YYYY-MM-DD` strings, the
//! recurrence rule as its canonical JSON form and list fields as JSON arrays.
//! Appending an id that already exists fails on the primary key with
//! `StoreError::AlreadyExists`.

use super::db::Db;
use super::store::{StoreError, TaskStore};
use crate::libs::date::CalendarDate;
use crate::libs::recurrence::RecurrenceRule;
use crate::libs::task::{Task, TaskFilter};
use anyhow::Result;
use rusqlite::{params, Connection, ErrorCode, Row, ToSql};
use std::path::Path;

const TASK_COLUMNS: &str = "id, title, description, status, priority, assignee_ids, client_id, start_date, due_date, tags, completed_date, is_recurring, recurrence, parent_task_id";
const INSERT_TASK: &str = "INSERT INTO tasks (id, title, description, status, priority, assignee_ids, client_id, start_date, due_date, tags, completed_date, is_recurring, recurrence, parent_task_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";
const UPDATE_TASK: &str = "UPDATE tasks SET title = ?2, description = ?3, status = ?4, priority = ?5, assignee_ids = ?6, client_id = ?7,
    start_date = ?8, due_date = ?9, tags = ?10, completed_date = ?11, is_recurring = ?12, recurrence = ?13, parent_task_id = ?14
    WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const ORDER_BY: &str = "ORDER BY start_date, created_at, id";

pub struct Tasks {
    pub conn: Connection,
}

/// Column values of one task, in `TASK_COLUMNS` order.
struct TaskRow {
    id: String,
    title: String,
    description: String,
    status: String,
    priority: String,
    assignee_ids: String,
    client_id: Option<String>,
    start_date: String,
    due_date: String,
    tags: String,
    completed_date: Option<String>,
    is_recurring: bool,
    recurrence: Option<String>,
    parent_task_id: Option<String>,
}

impl TaskRow {
    fn read(row: &Row) -> rusqlite::Result<TaskRow> {
        Ok(TaskRow {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            status: row.get(3)?,
            priority: row.get(4)?,
            assignee_ids: row.get(5)?,
            client_id: row.get(6)?,
            start_date: row.get(7)?,
            due_date: row.get(8)?,
            tags: row.get(9)?,
            completed_date: row.get(10)?,
            is_recurring: row.get(11)?,
            recurrence: row.get(12)?,
            parent_task_id: row.get(13)?,
        })
    }

    fn from_task(task: &Task) -> Result<TaskRow, StoreError> {
        let encode = |e: serde_json::Error| StoreError::write(&task.id, e);
        Ok(TaskRow {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.to_string(),
            priority: task.priority.to_string(),
            assignee_ids: serde_json::to_string(&task.assignee_ids).map_err(encode)?,
            client_id: task.client_id.clone(),
            start_date: task.start_date.to_string(),
            due_date: task.due_date.to_string(),
            tags: serde_json::to_string(&task.tags).map_err(encode)?,
            completed_date: task.completed_date.map(|d| d.to_string()),
            is_recurring: task.is_recurring,
            recurrence: task.recurrence.as_ref().map(serde_json::to_string).transpose().map_err(encode)?,
            parent_task_id: task.parent_task_id.clone(),
        })
    }

    fn into_task(self) -> Result<Task, StoreError> {
        let decode = |field: &str, e: &dyn std::fmt::Display| StoreError::Decode(format!("task {} {}: {}", self.id, field, e));
        let date = |field: &str, raw: &str| CalendarDate::parse(raw).map_err(|e| decode(field, &e));

        let recurrence = match self.recurrence.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(serde_json::from_str::<RecurrenceRule>(raw).map_err(|e| decode("recurrence", &e))?),
            None => None,
        };

        let task = Task {
            status: self.status.parse().map_err(|e: String| decode("status", &e))?,
            priority: self.priority.parse().map_err(|e: String| decode("priority", &e))?,
            assignee_ids: serde_json::from_str(&self.assignee_ids).map_err(|e| decode("assignee_ids", &e))?,
            start_date: date("start_date", &self.start_date)?,
            due_date: date("due_date", &self.due_date)?,
            tags: serde_json::from_str(&self.tags).map_err(|e| decode("tags", &e))?,
            completed_date: self.completed_date.as_deref().map(|raw| date("completed_date", raw)).transpose()?,
            recurrence,
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            client_id: self.client_id.clone(),
            is_recurring: self.is_recurring,
            parent_task_id: self.parent_task_id.clone(),
        };
        Ok(task.normalized())
    }
}

impl Tasks {
    /// Store in the application data directory.
    pub fn new() -> Result<Tasks> {
        Ok(Tasks { conn: Db::new()?.conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Tasks> {
        Ok(Tasks { conn: Db::open(path)?.conn })
    }

    pub fn get(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        let mut rows = self.query(&sql, &[&id as &dyn ToSql])?;
        Ok(rows.pop())
    }

    /// Tasks matching `filter`. Parent lookups use the index; other filters
    /// are applied to the decoded rows.
    pub fn fetch(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = match filter {
            TaskFilter::ChildrenOf(id) => {
                let sql = format!("SELECT {} FROM tasks WHERE parent_task_id = ?1 {}", TASK_COLUMNS, ORDER_BY);
                self.query(&sql, &[id as &dyn ToSql])?
            }
            _ => self.all()?,
        };
        Ok(tasks.into_iter().filter(|t| filter.matches(t)).collect())
    }

    fn all(&self) -> Result<Vec<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks {}", TASK_COLUMNS, ORDER_BY);
        self.query(&sql, &[])
    }

    fn query(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Vec<Task>, StoreError> {
        let read = |e: rusqlite::Error| StoreError::Read(e.to_string());
        let mut stmt = self.conn.prepare(sql).map_err(read)?;
        let rows = stmt.query_map(args, TaskRow::read).map_err(read)?.collect::<Result<Vec<_>, _>>().map_err(read)?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    fn write(&self, sql: &str, task: &Task) -> Result<usize, StoreError> {
        let row = TaskRow::from_task(task)?;
        self.conn
            .execute(
                sql,
                params![
                    row.id,
                    row.title,
                    row.description,
                    row.status,
                    row.priority,
                    row.assignee_ids,
                    row.client_id,
                    row.start_date,
                    row.due_date,
                    row.tags,
                    row.completed_date,
                    row.is_recurring,
                    row.recurrence,
                    row.parent_task_id
                ],
            )
            .map_err(|e| write_error(&task.id, e))
    }
}

fn write_error(id: &str, e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation => {
            StoreError::AlreadyExists(id.to_string())
        }
        _ => StoreError::write(id, &e),
    }
}

impl TaskStore for Tasks {
    async fn list_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.all()
    }

    async fn append_task(&self, task: &Task) -> Result<(), StoreError> {
        self.write(INSERT_TASK, task)?;
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        match self.write(UPDATE_TASK, task)? {
            0 => Err(StoreError::NotFound(task.id.clone())),
            _ => Ok(()),
        }
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let removed = self.conn.execute(DELETE_TASK, params![id]).map_err(|e| StoreError::write(id, e))?;
        match removed {
            0 => Err(StoreError::NotFound(id.to_string())),
            _ => Ok(()),
        }
    }
}
