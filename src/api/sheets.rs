//! Spreadsheet endpoint store.
//!
//! The endpoint is a web app in front of a shared spreadsheet:
//!
//! - `GET {url}?sheet=Tasks` returns `{"values": [[header...], [row...], ...]}`;
//! - `POST {url}` with `{"operation": "create"|"update"|"delete", "type": "task", "item": {...}}`
//!   answers `{"success": true}` or `{"success": false, "error": "..."}`.
//!
//! Rows are decoded by header name, so column order on the sheet does not
//! matter; a sheet without a header row uses [`SHEET_COLUMNS`] order.

use crate::db::store::{StoreError, TaskStore};
use crate::libs::config::StoreConfig;
use crate::libs::date::{CalendarDate, Clock, SystemClock};
use crate::libs::messages::Message;
use crate::libs::recurrence::RecurrenceRule;
use crate::libs::task::{Priority, Status, Task};
use crate::{msg_bail_anyhow, msg_debug, msg_warning};
use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

pub const TASKS_SHEET: &str = "Tasks";

pub const SHEET_COLUMNS: [&str; 14] = [
    "id",
    "title",
    "description",
    "status",
    "priority",
    "assigneeId",
    "startDate",
    "dueDate",
    "tags",
    "assigneeIds",
    "clientId",
    "completedDate",
    "recurrence",
    "parentTaskId",
];

#[derive(Debug, Deserialize)]
struct SheetValues {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct WriteRequest<'a, T: Serialize> {
    operation: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    item: &'a T,
}

#[derive(Debug, Deserialize)]
struct WriteReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TaskRef<'a> {
    id: &'a str,
}

/// Column positions of one sheet, resolved from its header row.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    columns: HashMap<String, usize>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            columns: SHEET_COLUMNS.iter().enumerate().map(|(i, name)| (name.to_string(), i)).collect(),
        }
    }
}

impl SheetLayout {
    /// Layout from a header row, or `None` when the row is not a header.
    pub fn from_header(header: &[String]) -> Option<Self> {
        if !header.iter().any(|cell| cell.trim() == "id") {
            return None;
        }
        Some(Self {
            columns: header.iter().enumerate().map(|(i, name)| (name.trim().to_string(), i)).collect(),
        })
    }

    fn cell<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.columns.get(name).and_then(|&i| row.get(i)).map(|s| s.trim()).unwrap_or("")
    }
}

/// Text of a cell as the sheet displays it.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Decodes one sheet row.
///
/// `id`, `parentTaskId` and the dates are key cells: a bad one is an error,
/// because dropping the row could hide an existing child from the generation
/// pass. Empty dates become `today` on rows without a parent; a child with one
/// empty date takes the other. A bad `completedDate`, or a bad recurrence on a
/// child, is logged and dropped. Unknown status and priority fall back to
/// `todo` and `medium`; `isRecurring` is derived from a present recurrence on
/// a task without a parent.
pub fn task_from_row(layout: &SheetLayout, row: &[String], today: CalendarDate) -> Result<Task, String> {
    let cell = |name: &str| layout.cell(row, name);

    let id = cell("id");
    if id.is_empty() {
        return Err("missing id".to_string());
    }
    let parent_task_id = Some(cell("parentTaskId")).filter(|s| !s.is_empty()).map(str::to_string);

    let date = |name: &str| -> Result<Option<CalendarDate>, String> {
        match cell(name) {
            "" => Ok(None),
            raw => CalendarDate::parse(raw).map(Some).map_err(|e| format!("{}: {}", name, e)),
        }
    };
    let (start_date, due_date) = match (&parent_task_id, date("startDate")?, date("dueDate")?) {
        (None, start, due) => (start.unwrap_or(today), due.unwrap_or(today)),
        (Some(_), Some(start), due) => (start, due.unwrap_or(start)),
        (Some(_), None, Some(due)) => (due, due),
        (Some(_), None, None) => return Err("child row without startDate or dueDate".to_string()),
    };

    let dropped = |column: &str, reason: String| {
        msg_warning!(Message::SheetsCellDropped(id.to_string(), column.to_string(), reason));
    };

    let mut assignee_ids = split_list(cell("assigneeIds"));
    if assignee_ids.is_empty() && !cell("assigneeId").is_empty() {
        assignee_ids.push(cell("assigneeId").to_string());
    }

    let completed_date = match date("completedDate") {
        Ok(completed) => completed,
        Err(reason) => {
            dropped("completedDate", reason);
            None
        }
    };

    let recurrence = match cell("recurrence") {
        "" => None,
        raw => match serde_json::from_str::<RecurrenceRule>(raw) {
            Ok(rule) => Some(rule),
            Err(e) if parent_task_id.is_some() => {
                dropped("recurrence", e.to_string());
                None
            }
            Err(e) => return Err(format!("recurrence: {}", e)),
        },
    };

    let is_recurring = recurrence.is_some() && parent_task_id.is_none();

    let task = Task {
        id: id.to_string(),
        title: cell("title").to_string(),
        description: cell("description").to_string(),
        status: cell("status").parse().unwrap_or(Status::Todo),
        priority: cell("priority").parse().unwrap_or(Priority::Medium),
        assignee_ids,
        client_id: Some(cell("clientId")).filter(|s| !s.is_empty()).map(str::to_string),
        start_date,
        due_date,
        tags: split_list(cell("tags")),
        completed_date,
        is_recurring,
        recurrence,
        parent_task_id,
    };
    Ok(task.normalized())
}

/// Decodes a whole `values` grid. Blank rows are ignored; a row whose key
/// cells cannot be decoded fails the whole read.
pub fn tasks_from_values(values: &[Vec<Value>], today: CalendarDate) -> Result<Vec<Task>, StoreError> {
    let rows: Vec<Vec<String>> = values.iter().map(|row| row.iter().map(cell_text).collect()).collect();
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };

    let (layout, skip) = match SheetLayout::from_header(first) {
        Some(layout) => (layout, 1),
        None => (SheetLayout::default(), 0),
    };

    rows.iter()
        .enumerate()
        .skip(skip)
        .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
        // Sheet rows are 1-based.
        .map(|(i, row)| task_from_row(&layout, row, today).map_err(|reason| StoreError::Decode(format!("spreadsheet row {}: {}", i + 1, reason))))
        .collect()
}

pub struct SheetsStore {
    client: Client,
    url: String,
    clock: SystemClock,
}

impl SheetsStore {
    pub fn new(config: &StoreConfig, clock: SystemClock) -> Result<Self> {
        if config.url.trim().is_empty() {
            msg_bail_anyhow!(Message::StoreUrlMissing);
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("{}/{}", APP_METADATA_NAME, APP_METADATA_VERSION))
            .build()?;

        Ok(Self {
            client,
            url: config.url.trim().to_string(),
            clock,
        })
    }

    async fn post<T: Serialize>(&self, operation: &str, id: &str, item: &T) -> Result<(), StoreError> {
        let request = WriteRequest {
            operation,
            kind: "task",
            item,
        };
        let fail = |reason: String| StoreError::write(id, reason);

        let response = self.client.post(&self.url).json(&request).send().await.map_err(|e| fail(e.to_string()))?;
        let reply: WriteReply = response.json().await.map_err(|e| fail(e.to_string()))?;

        if reply.success {
            return Ok(());
        }
        let reason = reply.error.unwrap_or_else(|| "no reason given".to_string());
        msg_debug!(Message::SheetsRejected(operation.to_string(), reason.clone()));
        if reason.to_lowercase().contains("not found") {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Err(fail(reason))
    }
}

impl TaskStore for SheetsStore {
    async fn list_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("sheet", TASKS_SHEET)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                msg_debug!(Message::SheetsRequestFailed(e.to_string()));
                StoreError::Read(e.to_string())
            })?;
        let sheet: SheetValues = response.json().await.map_err(|e| StoreError::Decode(e.to_string()))?;
        tasks_from_values(&sheet.values, self.clock.today())
    }

    async fn append_task(&self, task: &Task) -> Result<(), StoreError> {
        self.post("create", &task.id, task).await
    }

    async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        self.post("update", &task.id, task).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        self.post("delete", id, &TaskRef { id }).await
    }
}
