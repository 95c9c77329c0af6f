#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use taskboard::api::sheets::{cell_text, task_from_row, tasks_from_values, SheetLayout, SHEET_COLUMNS};
    use taskboard::db::store::StoreError;
    use taskboard::libs::date::CalendarDate;
    use taskboard::libs::generator::generate_children_for_date;
    use taskboard::libs::recurrence::{Pattern, Weekday};
    use taskboard::libs::task::{Priority, Status};

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    fn header() -> Vec<Value> {
        SHEET_COLUMNS.iter().map(|c| json!(c)).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("abc")), "abc");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(true)), "true");
    }

    #[test]
    fn test_full_row_in_default_layout() {
        let cells = row(&[
            "t1",
            "Standup",
            "Daily sync",
            "inprogress",
            "high",
            "",
            "2025-01-01T00:00:00.000Z",
            "2025-01-31",
            "team, daily",
            "u1,u2",
            "c1",
            "",
            r#"{"frequency":"weekly","daysOfWeek":["monday"],"enabled":true}"#,
            "",
        ]);
        let task = task_from_row(&SheetLayout::default(), &cells, date("2025-06-01")).unwrap();

        assert_eq!(task.id, "t1");
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.start_date, date("2025-01-01"));
        assert_eq!(task.due_date, date("2025-01-31"));
        assert_eq!(task.tags, vec!["team", "daily"]);
        assert_eq!(task.assignee_ids, vec!["u1", "u2"]);
        assert_eq!(task.client_id.as_deref(), Some("c1"));
        assert!(task.is_recurring);
        assert!(task.is_mother());
        let Pattern::Weekly(days) = &task.recurrence.as_ref().unwrap().pattern else {
            panic!("expected weekly");
        };
        assert!(days.contains(Weekday::Monday));
    }

    #[test]
    fn test_empty_dates_become_today_and_unknown_values_fall_back() {
        let cells = row(&["t2", "Loose", "", "blocked", "whenever", "", "", "", "", "", "", "", "", ""]);
        let task = task_from_row(&SheetLayout::default(), &cells, date("2025-06-01")).unwrap();

        assert_eq!(task.start_date, date("2025-06-01"));
        assert_eq!(task.due_date, date("2025-06-01"));
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.is_recurring);
        assert!(task.client_id.is_none());
    }

    #[test]
    fn test_legacy_single_assignee() {
        let cells = row(&["t3", "Old", "", "todo", "low", "u9", "2025-01-01", "2025-01-02", "", "", "", "", "", ""]);
        let task = task_from_row(&SheetLayout::default(), &cells, date("2025-06-01")).unwrap();
        assert_eq!(task.assignee_ids, vec!["u9"]);
    }

    #[test]
    fn test_child_row_is_never_recurring() {
        let cells = row(&[
            "t4",
            "Standup (2025-01-10)",
            "",
            "done",
            "medium",
            "",
            "2025-01-10",
            "2025-01-10",
            "",
            "",
            "",
            "2025-01-10 09:00:00",
            r#"{"frequency":"daily"}"#,
            "t1",
        ]);
        let task = task_from_row(&SheetLayout::default(), &cells, date("2025-06-01")).unwrap();
        assert!(task.is_child());
        assert!(!task.is_recurring);
        assert!(task.recurrence.is_none());
        assert_eq!(task.completed_date, Some(date("2025-01-10")));
    }

    #[test]
    fn test_bad_cells_are_errors() {
        let missing_id = row(&["", "No id"]);
        assert!(task_from_row(&SheetLayout::default(), &missing_id, date("2025-06-01")).is_err());

        let bad_date = row(&["t5", "Bad", "", "todo", "low", "", "next week", "", "", "", "", "", "", ""]);
        assert!(task_from_row(&SheetLayout::default(), &bad_date, date("2025-06-01")).is_err());

        let bad_rule = row(&["t6", "Bad", "", "todo", "low", "", "", "", "", "", "", "", "{not json", ""]);
        assert!(task_from_row(&SheetLayout::default(), &bad_rule, date("2025-06-01")).is_err());
    }

    #[test]
    fn test_header_order_is_respected() {
        let values = vec![
            vec![json!("title"), json!("dueDate"), json!("id"), json!("startDate")],
            vec![json!("Shuffled"), json!("2025-02-02"), json!("t7"), json!("2025-02-01")],
        ];
        let tasks = tasks_from_values(&values, date("2025-06-01")).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t7");
        assert_eq!(tasks[0].title, "Shuffled");
        assert_eq!(tasks[0].start_date, date("2025-02-01"));
        assert_eq!(tasks[0].due_date, date("2025-02-02"));
    }

    #[test]
    fn test_blank_rows_are_ignored() {
        let mut values = vec![header()];
        values.push(vec![json!("t8"), json!("Good"), json!(""), json!("review")]);
        values.push(vec![json!(""), json!(null), json!("  ")]);

        let tasks = tasks_from_values(&values, date("2025-06-01")).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t8");
        assert_eq!(tasks[0].status, Status::Review);
    }

    #[test]
    fn test_row_with_bad_key_cell_fails_the_read() {
        let mut values = vec![header()];
        values.push(vec![json!("t8"), json!("Good")]);
        values.push(vec![json!("t9"), json!("Broken"), json!(""), json!("todo"), json!("low"), json!(""), json!("garbage")]);

        match tasks_from_values(&values, date("2025-06-01")) {
            Err(StoreError::Decode(reason)) => assert!(reason.contains("row 3"), "{}", reason),
            other => panic!("expected a decode error, got {:?}", other),
        }
    }

    fn mother_row() -> Vec<Value> {
        vec![
            json!("m1"),
            json!("Standup"),
            json!(""),
            json!("todo"),
            json!("medium"),
            json!(""),
            json!("2025-01-01"),
            json!("2025-01-31"),
            json!(""),
            json!(""),
            json!(""),
            json!(""),
            json!(r#"{"frequency":"daily","enabled":true}"#),
            json!(""),
        ]
    }

    #[test]
    fn test_done_child_with_bad_completed_date_still_counts() {
        let mut child = mother_row();
        child[0] = json!("c1");
        child[1] = json!("Standup (2025-01-10)");
        child[3] = json!("done");
        child[6] = json!("2025-01-10");
        child[7] = json!("2025-01-10");
        child[11] = json!("10/01/2025");
        child[12] = json!("");
        child[13] = json!("m1");
        let values = vec![header(), mother_row(), child];

        let tasks = tasks_from_values(&values, date("2025-01-10")).unwrap();
        assert_eq!(tasks.len(), 2);
        let child = tasks.iter().find(|t| t.id == "c1").unwrap();
        assert!(child.is_child());
        assert!(child.completed_date.is_none());
        assert!(generate_children_for_date(date("2025-01-10"), &tasks).is_empty());
    }

    #[test]
    fn test_child_with_empty_dates_never_defaults_to_today() {
        let today = date("2025-06-01");
        let due_only = row(&["c2", "Standup (2025-01-12)", "", "todo", "", "", "", "2025-01-12", "", "", "", "", "", "m1"]);
        let task = task_from_row(&SheetLayout::default(), &due_only, today).unwrap();
        assert_eq!(task.start_date, date("2025-01-12"));
        assert_eq!(task.due_date, date("2025-01-12"));

        let start_only = row(&["c3", "Standup (2025-01-13)", "", "todo", "", "", "2025-01-13", "", "", "", "", "", "", "m1"]);
        let task = task_from_row(&SheetLayout::default(), &start_only, today).unwrap();
        assert_eq!(task.due_date, date("2025-01-13"));

        let undated = row(&["c4", "Standup", "", "todo", "", "", "", "", "", "", "", "", "", "m1"]);
        assert!(task_from_row(&SheetLayout::default(), &undated, today).is_err());
    }

    #[test]
    fn test_sheet_without_header_uses_default_order() {
        let values = vec![vec![json!("t10"), json!("Headless")]];
        let tasks = tasks_from_values(&values, date("2025-06-01")).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Headless");
        assert!(tasks_from_values(&[], date("2025-06-01")).unwrap().is_empty());
    }
}
