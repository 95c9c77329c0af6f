#[cfg(test)]
mod tests {
    use taskboard::db::store::{StoreError, TaskStore};
    use taskboard::db::tasks::Tasks;
    use taskboard::libs::date::CalendarDate;
    use taskboard::libs::generator::{child_of, Generator};
    use taskboard::libs::recurrence::{RecurrenceRule, Weekday};
    use taskboard::libs::task::{Priority, Status, Task, TaskFilter};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct StoreTestContext {
        temp_dir: TempDir,
    }

    impl AsyncTestContext for StoreTestContext {
        async fn setup() -> Self {
            StoreTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl StoreTestContext {
        fn store(&self) -> Tasks {
            Tasks::open(self.temp_dir.path().join("taskboard.db")).unwrap()
        }
    }

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_append_and_read_back_every_field(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let mut task = Task::mother(
            "Weekly review",
            date("2025-01-01"),
            date("2025-03-31"),
            RecurrenceRule::weekly(&[Weekday::Monday, Weekday::Thursday]).until(date("2025-02-28")),
        );
        task.description = "Go through the board".to_string();
        task.priority = Priority::Critical;
        task.assignee_ids = vec!["u1".to_string(), "u2".to_string()];
        task.client_id = Some("c1".to_string());
        task.tags = vec!["ops".to_string(), "weekly".to_string()];

        store.append_task(&task).await.unwrap();
        let all = store.list_all_tasks().await.unwrap();
        assert_eq!(all, vec![task.clone()]);
        assert_eq!(store.get(&task.id).unwrap(), Some(task));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_duplicate_append_is_rejected(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let task = Task::new("Once", date("2025-01-01"), date("2025-01-01"));

        store.append_task(&task).await.unwrap();
        let second = store.append_task(&task).await;
        assert!(matches!(second, Err(StoreError::AlreadyExists(ref id)) if id == &task.id));
        assert_eq!(store.list_all_tasks().await.unwrap().len(), 1);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_update_and_delete(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let mut task = Task::new("Draft", date("2025-01-01"), date("2025-01-05"));
        store.append_task(&task).await.unwrap();

        task.set_status(Status::Done, date("2025-01-03"));
        task.title = "Final".to_string();
        store.update_task(&task).await.unwrap();

        let stored = store.get(&task.id).unwrap().unwrap();
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.status, Status::Done);
        assert_eq!(stored.completed_date, Some(date("2025-01-03")));

        store.delete_task(&task.id).await.unwrap();
        assert!(store.get(&task.id).unwrap().is_none());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_missing_ids_report_not_found(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let ghost = Task::new("Ghost", date("2025-01-01"), date("2025-01-01"));

        assert!(matches!(store.update_task(&ghost).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_task(&ghost.id).await, Err(StoreError::NotFound(_))));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_fetch_filters(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let mother = Task::mother("Standup", date("2025-01-01"), date("2025-01-31"), RecurrenceRule::daily());
        let child = child_of(&mother, date("2025-01-10"));
        let late = Task::new("Late", date("2025-01-01"), date("2025-01-05"));
        for task in [&mother, &child, &late] {
            store.append_task(task).await.unwrap();
        }

        let mothers = store.fetch(&TaskFilter::Mothers).unwrap();
        assert_eq!(mothers.len(), 1);
        assert_eq!(mothers[0].id, mother.id);

        let children = store.fetch(&TaskFilter::ChildrenOf(mother.id.clone())).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child.id);

        assert_eq!(store.fetch(&TaskFilter::Board).unwrap().len(), 2);
        assert_eq!(store.fetch(&TaskFilter::OnDate(date("2025-01-10"))).unwrap().len(), 2);

        let overdue = store.fetch(&TaskFilter::Overdue(date("2025-01-10"))).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_generator_over_sqlite_is_duplicate_free(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        let mother = Task::mother("Standup", date("2025-01-01"), date("2025-01-31"), RecurrenceRule::daily());
        store.append_task(&mother).await.unwrap();
        let generator = Generator::new(&store);

        let mut day = date("2025-01-01");
        while day <= date("2025-01-07") {
            generator.run_pass_for(day).await.unwrap();
            generator.run_pass_for(day).await.unwrap();
            day = day.succ();
        }

        assert_eq!(store.fetch(&TaskFilter::ChildrenOf(mother.id.clone())).unwrap().len(), 7);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_undecodable_row_is_a_decode_error(ctx: &mut StoreTestContext) {
        let store = ctx.store();
        store
            .conn
            .execute(
                "INSERT INTO tasks (id, title, description, status, priority, assignee_ids, start_date, due_date, tags, is_recurring)
                 VALUES ('t1', 'Broken', '', 'todo', 'medium', '[]', 'not a date', '2025-01-01', '[]', 0)",
                [],
            )
            .unwrap();

        assert!(matches!(store.list_all_tasks().await, Err(StoreError::Decode(_))));
    }
}
