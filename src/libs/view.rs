use super::date::CalendarDate;
use super::reference::{Client, User};
use super::task::Task;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Board tasks, marking overdue ones.
    pub fn tasks(tasks: &[&Task], today: CalendarDate) {
        let mut table = Table::new();
        table.add_row(row!["ID", "TITLE", "STATUS", "PRIORITY", "START", "DUE", "ASSIGNEES", "TAGS"]);
        for task in tasks {
            let due = match task.is_overdue(today) {
                true => format!("{} !", task.due_date),
                false => task.due_date.to_string(),
            };
            table.add_row(row![
                task.id,
                task.title,
                task.status,
                task.priority,
                task.start_date,
                due,
                task.assignee_ids.join(", "),
                task.tags.join(", ")
            ]);
        }
        table.printstd();
    }

    pub fn mothers(tasks: &[&Task]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "TITLE", "RECURRENCE", "FROM", "UNTIL"]);
        for task in tasks {
            let rule = task.recurrence.as_ref().map(|r| r.to_string()).unwrap_or_default();
            table.add_row(row![task.id, task.title, rule, task.start_date, task.recurrence_end()]);
        }
        table.printstd();
    }

    /// Full record of one task.
    pub fn task(task: &Task) {
        let mut table = Table::new();
        table.add_row(row!["ID", task.id]);
        table.add_row(row!["TITLE", task.title]);
        table.add_row(row!["DESCRIPTION", task.description]);
        table.add_row(row!["STATUS", task.status]);
        table.add_row(row!["PRIORITY", task.priority]);
        table.add_row(row!["START", task.start_date]);
        table.add_row(row!["DUE", task.due_date]);
        table.add_row(row!["COMPLETED", task.completed_date.map(|d| d.to_string()).unwrap_or_default()]);
        table.add_row(row!["ASSIGNEES", task.assignee_ids.join(", ")]);
        table.add_row(row!["CLIENT", task.client_id.clone().unwrap_or_default()]);
        table.add_row(row!["TAGS", task.tags.join(", ")]);
        if let Some(rule) = &task.recurrence {
            table.add_row(row!["RECURRENCE", rule]);
            table.add_row(row!["UNTIL", task.recurrence_end()]);
        }
        if let Some(parent) = &task.parent_task_id {
            table.add_row(row!["PARENT", parent]);
        }
        table.printstd();
    }

    pub fn clients(clients: &[Client]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "NAME"]);
        for client in clients {
            table.add_row(row![client.id, client.name]);
        }
        table.printstd();
    }

    pub fn users(users: &[User]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "", "NAME", "EMAIL", "ROLE"]);
        for user in users {
            table.add_row(row![user.id, user.avatar, user.name, user.email, user.role]);
        }
        table.printstd();
    }
}
