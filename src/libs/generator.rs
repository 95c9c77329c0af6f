//! Recurring task generation.
//!
//! One generation pass looks at every mother task and decides, for a single
//! calendar day, whether a child instance must be materialized. A pass never
//! produces a second child for the same mother and day: every candidate is
//! checked against the task snapshot plus the children already produced in
//! the same pass.
//!
//! The pure half ([`generate_children_for_date`]) has no side effects. The
//! [`Generator`] wraps it with the store: read the full snapshot, generate,
//! append each new child exactly once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskboard::db::memory::MemoryStore;
//! use taskboard::libs::date::SystemClock;
//! use taskboard::libs::generator::Generator;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = MemoryStore::default();
//! let report = Generator::new(&store).run_pass(&SystemClock::default()).await?;
//! println!("{} children generated", report.generated.len());
//! # Ok(())
//! # }
//! ```

use super::date::{CalendarDate, Clock};
use super::recurrence::should_generate_on;
use super::task::{new_task_id, Status, Task};
use crate::db::store::TaskStore;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_error_anyhow, msg_warning};
use anyhow::Result;

/// True iff a child of `mother_id` already exists for `date`.
///
/// A child is matched on its start date or its due date; both are canonical
/// calendar dates so representation differences cannot hide a duplicate.
pub fn child_exists_for<'a, I>(mother_id: &str, date: CalendarDate, tasks: I) -> bool
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .any(|t| t.parent_task_id.as_deref() == Some(mother_id) && (t.start_date == date || t.due_date == date))
}

/// Builds the child instance of `mother` for `date`.
pub fn child_of(mother: &Task, date: CalendarDate) -> Task {
    Task {
        id: new_task_id(),
        title: format!("{} ({})", mother.title, date),
        description: mother.description.clone(),
        status: Status::Todo,
        priority: mother.priority,
        assignee_ids: mother.assignee_ids.clone(),
        client_id: mother.client_id.clone(),
        start_date: date,
        due_date: date,
        tags: mother.tags.clone(),
        completed_date: None,
        is_recurring: false,
        recurrence: None,
        parent_task_id: Some(mother.id.clone()),
    }
}

/// Children that must be created for `today`, given the full task set.
///
/// `all_tasks` is not modified; the caller appends and persists the result.
pub fn generate_children_for_date(today: CalendarDate, all_tasks: &[Task]) -> Vec<Task> {
    let mut generated: Vec<Task> = Vec::new();

    for mother in all_tasks.iter().filter(|t| t.is_mother()) {
        let Some(rule) = &mother.recurrence else {
            continue;
        };

        if !rule.is_recognized() {
            msg_warning!(Message::RecurrenceUnrecognized(mother.title.clone(), rule.pattern.frequency().to_string()));
            continue;
        }

        if !rule.enabled {
            msg_debug!(Message::RecurrenceDisabled(mother.title.clone()));
            continue;
        }

        let end = mother.recurrence_end();
        if today < mother.start_date || today > end {
            msg_debug!(Message::RecurrenceOutOfRange(mother.title.clone(), mother.start_date.to_string(), end.to_string()));
            continue;
        }

        if !should_generate_on(today, rule) {
            msg_debug!(Message::RecurrenceNoMatch(mother.title.clone(), today.to_string()));
            continue;
        }

        if child_exists_for(&mother.id, today, all_tasks.iter().chain(generated.iter())) {
            msg_debug!(Message::ChildAlreadyExists(mother.title.clone(), today.to_string()));
            continue;
        }

        generated.push(child_of(mother, today));
    }

    generated
}

/// Snapshot-derived work of one pass, not yet written.
#[derive(Debug, Clone)]
pub struct PassPlan {
    pub date: CalendarDate,
    pub mothers_scanned: usize,
    pub children: Vec<Task>,
}

/// Outcome of one generation pass against a store.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub date: CalendarDate,
    pub mothers_scanned: usize,
    /// Children generated and successfully written.
    pub generated: Vec<Task>,
    /// Children generated but lost to a write failure.
    pub failed: usize,
}

/// Runs generation passes against a [`TaskStore`].
pub struct Generator<'a, S: TaskStore> {
    store: &'a S,
}

impl<'a, S: TaskStore> Generator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs one pass for the clock's current day.
    ///
    /// A failed snapshot read aborts the pass with nothing generated. A failed
    /// append drops that child only; the next pass will find it still missing.
    pub async fn run_pass(&self, clock: &dyn Clock) -> Result<PassReport> {
        self.run_pass_for(clock.today()).await
    }

    pub async fn run_pass_for(&self, today: CalendarDate) -> Result<PassReport> {
        let plan = self.plan(today).await?;
        Ok(self.persist(plan).await)
    }

    /// Children a pass would create for `today`, without writing anything.
    pub async fn dry_run(&self, today: CalendarDate) -> Result<Vec<Task>> {
        Ok(self.plan(today).await?.children)
    }

    /// Reads the full snapshot and decides which children `today` needs.
    pub async fn plan(&self, today: CalendarDate) -> Result<PassPlan> {
        let snapshot = self
            .store
            .list_all_tasks()
            .await
            .map_err(|e| msg_error_anyhow!(Message::SnapshotReadFailed(e.to_string())))?;
        msg_debug!(Message::PassStarted(today.to_string(), snapshot.len()));

        Ok(PassPlan {
            date: today,
            mothers_scanned: snapshot.iter().filter(|t| t.is_mother()).count(),
            children: generate_children_for_date(today, &snapshot),
        })
    }

    /// Appends each planned child once. Write failures are logged and counted, never retried.
    pub async fn persist(&self, plan: PassPlan) -> PassReport {
        let mut report = PassReport {
            date: plan.date,
            mothers_scanned: plan.mothers_scanned,
            generated: Vec::with_capacity(plan.children.len()),
            failed: 0,
        };

        for child in plan.children {
            match self.store.append_task(&child).await {
                Ok(()) => report.generated.push(child),
                Err(e) => {
                    msg_error!(Message::ChildWriteFailed(child.title.clone(), e.to_string()));
                    report.failed += 1;
                }
            }
        }

        report
    }
}
