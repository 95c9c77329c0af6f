//! Task records, status transitions and the mother/child relationship.
//!
//! A task is one of three kinds:
//! - a plain task,
//! - a **mother** task (`is_recurring` and no parent) acting as a recurrence
//!   template, never shown in board columns,
//! - a **child** task generated for a single day from a mother.
//!
//! ## Usage
//!
//! ```rust
//! use taskboard::libs::date::CalendarDate;
//! use taskboard::libs::recurrence::RecurrenceRule;
//! use taskboard::libs::task::Task;
//!
//! let start = CalendarDate::parse("2025-01-10").unwrap();
//! let end = CalendarDate::parse("2025-01-31").unwrap();
//! let mother = Task::mother("Daily standup", start, end, RecurrenceRule::daily());
//! assert!(mother.is_mother());
//! ```

use super::date::CalendarDate;
use super::recurrence::RecurrenceRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Todo, Status::InProgress, Status::Review, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "inprogress",
            Status::Review => "review",
            Status::Done => "done",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "inprogress" | "in-progress" | "in_progress" => Ok(Status::InProgress),
            "review" => Ok(Status::Review),
            "done" => Ok(Status::Done),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates a fresh task id: `t` followed by a ULID (millisecond time plus random bits).
pub fn new_task_id() -> String {
    format!("t{}", Ulid::new())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    pub start_date: CalendarDate,
    pub due_date: CalendarDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed_date: Option<CalendarDate>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub parent_task_id: Option<String>,
}

impl Task {
    pub fn new(title: &str, start_date: CalendarDate, due_date: CalendarDate) -> Self {
        Task {
            id: new_task_id(),
            title: title.to_string(),
            description: String::new(),
            status: Status::Todo,
            priority: Priority::Medium,
            assignee_ids: Vec::new(),
            client_id: None,
            start_date,
            due_date,
            tags: Vec::new(),
            completed_date: None,
            is_recurring: false,
            recurrence: None,
            parent_task_id: None,
        }
    }

    /// Creates a recurrence template.
    pub fn mother(title: &str, start_date: CalendarDate, due_date: CalendarDate, rule: RecurrenceRule) -> Self {
        Task {
            is_recurring: true,
            recurrence: Some(rule),
            ..Task::new(title, start_date, due_date)
        }
    }

    pub fn is_mother(&self) -> bool {
        self.is_recurring && self.parent_task_id.is_none()
    }

    pub fn is_child(&self) -> bool {
        self.parent_task_id.is_some()
    }

    /// Mothers are templates and never occupy a board column.
    pub fn is_board_visible(&self) -> bool {
        !self.is_mother()
    }

    pub fn is_overdue(&self, today: CalendarDate) -> bool {
        self.status != Status::Done && self.due_date < today
    }

    /// Last day the mother's recurrence is active: the rule's end date or the due date.
    pub fn recurrence_end(&self) -> CalendarDate {
        self.recurrence.as_ref().and_then(|r| r.end_date).unwrap_or(self.due_date)
    }

    /// Moves the task to `status`, keeping `completed_date` in step.
    ///
    /// Entering `done` stamps `today`; leaving `done` clears it.
    pub fn set_status(&mut self, status: Status, today: CalendarDate) {
        let was_done = self.status == Status::Done;
        let is_done = status == Status::Done;
        if !was_done && is_done {
            self.completed_date = Some(today);
        } else if was_done && !is_done {
            self.completed_date = None;
        }
        self.status = status;
    }

    pub fn add_assignee(&mut self, user_id: &str) {
        if !self.assignee_ids.iter().any(|id| id == user_id) {
            self.assignee_ids.push(user_id.to_string());
        }
    }

    /// Enforces the mother/child shape rules on a record entering the system.
    pub fn normalized(mut self) -> Self {
        if self.parent_task_id.as_deref().is_some_and(str::is_empty) {
            self.parent_task_id = None;
        }
        if self.is_child() {
            self.is_recurring = false;
            self.recurrence = None;
        }
        if !self.is_recurring {
            self.recurrence = None;
        }
        let mut seen = Vec::with_capacity(self.assignee_ids.len());
        for id in self.assignee_ids.drain(..) {
            if !id.is_empty() && !seen.contains(&id) {
                seen.push(id);
            }
        }
        self.assignee_ids = seen;
        self
    }
}

/// Ids removed when `task` is deleted.
///
/// Deleting a mother also removes its children that are not done; completed
/// children are kept as history. Any other task removes only itself.
pub fn deletion_plan(task: &Task, all_tasks: &[Task]) -> Vec<String> {
    let mut ids = vec![task.id.clone()];
    if task.is_mother() {
        ids.extend(
            all_tasks
                .iter()
                .filter(|t| t.parent_task_id.as_deref() == Some(task.id.as_str()) && t.status != Status::Done)
                .map(|t| t.id.clone()),
        );
    }
    ids
}

#[derive(Debug, Clone)]
pub enum TaskFilter {
    All,
    /// Everything except mothers.
    Board,
    Mothers,
    ChildrenOf(String),
    OnDate(CalendarDate),
    Overdue(CalendarDate),
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Board => task.is_board_visible(),
            TaskFilter::Mothers => task.is_mother(),
            TaskFilter::ChildrenOf(id) => task.parent_task_id.as_deref() == Some(id.as_str()),
            TaskFilter::OnDate(date) => task.start_date <= *date && *date <= task.due_date,
            TaskFilter::Overdue(today) => task.is_board_visible() && task.is_overdue(*today),
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}
