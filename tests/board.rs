#[cfg(test)]
mod tests {
    use taskboard::db::memory::MemoryStore;
    use taskboard::db::store::{StoreError, TaskStore};
    use taskboard::libs::board::Board;
    use taskboard::libs::date::CalendarDate;
    use taskboard::libs::generator::child_of;
    use taskboard::libs::recurrence::RecurrenceRule;
    use taskboard::libs::sync_queue::{SyncKind, SyncQueue};
    use taskboard::libs::task::{Status, Task, TaskFilter};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct BoardTestContext {
        temp_dir: TempDir,
    }

    impl AsyncTestContext for BoardTestContext {
        async fn setup() -> Self {
            BoardTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl BoardTestContext {
        fn cache_path(&self) -> std::path::PathBuf {
            self.temp_dir.path().join("tasks.json")
        }
    }

    struct OfflineStore;

    impl TaskStore for OfflineStore {
        async fn list_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
            Err(StoreError::Read("offline".to_string()))
        }

        async fn append_task(&self, task: &Task) -> Result<(), StoreError> {
            Err(StoreError::write(&task.id, "offline"))
        }

        async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
            Err(StoreError::write(&task.id, "offline"))
        }

        async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
            Err(StoreError::write(id, "offline"))
        }
    }

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    fn daily_mother() -> Task {
        Task::mother("Standup", date("2025-01-01"), date("2025-01-31"), RecurrenceRule::daily())
    }

    #[test]
    fn test_creating_mother_generates_today_at_once() {
        let mut board = Board::new(Vec::new(), SyncQueue::in_memory());
        let mother = daily_mother();

        let children = board.create_task(mother.clone(), date("2025-01-10"));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].parent_task_id.as_deref(), Some(mother.id.as_str()));
        assert_eq!(board.tasks().len(), 2);
        assert_eq!(board.queue().len(), 2);

        // Mothers stay off the board columns.
        let visible = board.visible_tasks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, children[0].id);
    }

    #[test]
    fn test_generation_is_idempotent_on_board() {
        let mut board = Board::new(vec![daily_mother()], SyncQueue::in_memory());
        assert_eq!(board.run_generation(date("2025-01-10")).len(), 1);
        assert!(board.run_generation(date("2025-01-10")).is_empty());
        assert_eq!(board.run_generation(date("2025-01-11")).len(), 1);
        assert_eq!(board.filtered(&TaskFilter::ChildrenOf(board.filtered(&TaskFilter::Mothers)[0].id.clone())).len(), 2);
    }

    #[test]
    fn test_completion_date_follows_status() {
        let task = Task::new("Write report", date("2025-01-10"), date("2025-01-12"));
        let id = task.id.clone();
        let mut board = Board::new(vec![task], SyncQueue::in_memory());

        let done = board.set_status(&id, Status::Done, date("2025-01-11")).unwrap();
        assert_eq!(done.completed_date, Some(date("2025-01-11")));

        // Staying done keeps the original completion day.
        let again = board.set_status(&id, Status::Done, date("2025-01-15")).unwrap();
        assert_eq!(again.completed_date, Some(date("2025-01-11")));

        let reopened = board.set_status(&id, Status::Review, date("2025-01-16")).unwrap();
        assert_eq!(reopened.completed_date, None);
        assert_eq!(board.queue().pending().filter(|op| op.kind == SyncKind::Update).count(), 3);
    }

    #[test]
    fn test_task_created_done_gets_completion_date() {
        let mut board = Board::new(Vec::new(), SyncQueue::in_memory());
        let mut task = Task::new("Already done", date("2025-01-01"), date("2025-01-02"));
        task.status = Status::Done;
        let id = task.id.clone();

        board.create_task(task, date("2025-01-05"));
        assert_eq!(board.get(&id).unwrap().completed_date, Some(date("2025-01-05")));
    }

    #[test]
    fn test_deleting_mother_keeps_completed_children() {
        let mother = daily_mother();
        let open_child = child_of(&mother, date("2025-01-09"));
        let mut done_child = child_of(&mother, date("2025-01-08"));
        done_child.set_status(Status::Done, date("2025-01-08"));
        let unrelated = Task::new("Other", date("2025-01-01"), date("2025-01-02"));

        let mut board = Board::new(
            vec![mother.clone(), open_child.clone(), done_child.clone(), unrelated.clone()],
            SyncQueue::in_memory(),
        );
        let removed = board.delete_task(&mother.id).unwrap();

        let removed_ids: Vec<&str> = removed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(removed_ids.len(), 2);
        assert!(removed_ids.contains(&mother.id.as_str()));
        assert!(removed_ids.contains(&open_child.id.as_str()));
        assert!(board.get(&done_child.id).is_some());
        assert!(board.get(&unrelated.id).is_some());
        assert_eq!(board.queue().pending().filter(|op| op.kind == SyncKind::Delete).count(), 2);
    }

    #[test]
    fn test_deleting_child_removes_only_itself() {
        let mother = daily_mother();
        let child = child_of(&mother, date("2025-01-09"));
        let mut board = Board::new(vec![mother.clone(), child.clone()], SyncQueue::in_memory());

        let removed = board.delete_task(&child.id).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(board.get(&mother.id).is_some());
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut board = Board::new(Vec::new(), SyncQueue::in_memory());
        assert!(board.delete_task("missing").is_err());
        assert!(board.set_status("missing", Status::Done, date("2025-01-01")).is_err());
        assert!(board.queue().is_empty());
    }

    #[tokio::test]
    async fn test_sync_pushes_local_changes_to_store() {
        let store = MemoryStore::default();
        let mut board = Board::load(&store, SyncQueue::in_memory(), None).await.unwrap();
        board.create_task(daily_mother(), date("2025-01-10"));

        assert_eq!(board.sync(&store).await.unwrap(), 2);
        assert!(board.queue().is_empty());

        let reloaded = Board::load(&store, SyncQueue::in_memory(), None).await.unwrap();
        assert_eq!(reloaded.tasks().len(), 2);
    }

    #[test_context(BoardTestContext)]
    #[tokio::test]
    async fn test_offline_load_uses_cache_and_pending_changes(ctx: &mut BoardTestContext) {
        let store = MemoryStore::with_tasks(vec![daily_mother()]);
        let mut board = Board::load(&store, SyncQueue::in_memory(), Some(ctx.cache_path())).await.unwrap();
        board.save_cache().unwrap();

        let queue_path = ctx.temp_dir.path().join("sync_queue.json");
        let extra = Task::new("Offline change", date("2025-01-10"), date("2025-01-10"));
        let mut queue = SyncQueue::open_at(&queue_path).unwrap();
        queue.push(SyncKind::Create, &extra);
        drop(queue);

        let offline = Board::load(&OfflineStore, SyncQueue::open_at(&queue_path).unwrap(), Some(ctx.cache_path()))
            .await
            .unwrap();
        assert_eq!(offline.tasks().len(), 2);
        assert!(offline.get(&extra.id).is_some());
        assert_eq!(offline.queue().len(), 1);
    }

    #[test_context(BoardTestContext)]
    #[tokio::test]
    async fn test_offline_load_without_cache_fails(ctx: &mut BoardTestContext) {
        let result = Board::load(&OfflineStore, SyncQueue::in_memory(), Some(ctx.cache_path())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failed_sync_keeps_queue() {
        let mut board = Board::new(Vec::new(), SyncQueue::in_memory());
        board.create_task(Task::new("A", date("2025-01-10"), date("2025-01-10")), date("2025-01-10"));

        assert_eq!(board.sync(&OfflineStore).await.unwrap(), 0);
        assert_eq!(board.queue().len(), 1);
    }
}
