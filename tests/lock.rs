#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use taskboard::libs::lock::{with_exclusive_lock, JobLock};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct LockTestContext {
        temp_dir: TempDir,
    }

    impl AsyncTestContext for LockTestContext {
        async fn setup() -> Self {
            LockTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl LockTestContext {
        fn lock(&self, stale_after: Duration) -> JobLock {
            JobLock::at("daily-generation", self.temp_dir.path().join("daily-generation.lock"), stale_after)
                .with_poll_interval(Duration::from_millis(10))
        }
    }

    #[test_context(LockTestContext)]
    #[test]
    fn test_second_acquire_fails_while_held(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(3600));
        let guard = lock.try_acquire().unwrap().expect("first acquire");
        assert!(lock.is_held());
        assert_eq!(guard.name(), "daily-generation");

        assert!(lock.try_acquire().unwrap().is_none());

        drop(guard);
        assert!(!lock.is_held());
        assert!(lock.try_acquire().unwrap().is_some());
    }

    #[test_context(LockTestContext)]
    #[tokio::test]
    async fn test_acquire_times_out(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(3600));
        let _held = lock.try_acquire().unwrap().unwrap();

        let started = std::time::Instant::now();
        let second = lock.acquire(Duration::from_millis(100)).await.unwrap();
        assert!(second.is_none());
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[test_context(LockTestContext)]
    #[tokio::test]
    async fn test_acquire_waits_for_release(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(3600));
        let held = lock.try_acquire().unwrap().unwrap();

        let waiter = lock.acquire(Duration::from_secs(5));
        let releaser = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(held);
        };
        let (acquired, _) = tokio::join!(waiter, releaser);
        assert!(acquired.unwrap().is_some());
    }

    #[test_context(LockTestContext)]
    #[test]
    fn test_stale_lock_is_recovered(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(60));
        let crashed = serde_json::json!({
            "pid": 999999,
            "token": "crashed-holder",
            "acquired_at": chrono::Utc::now().timestamp_millis() - 120_000,
        });
        std::fs::write(lock.path(), crashed.to_string()).unwrap();

        let guard = lock.try_acquire().unwrap();
        assert!(guard.is_some());
        let body = std::fs::read_to_string(lock.path()).unwrap();
        assert!(!body.contains("crashed-holder"));
    }

    #[test_context(LockTestContext)]
    #[test]
    fn test_fresh_foreign_lock_is_respected(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(60));
        let live = serde_json::json!({
            "pid": 999999,
            "token": "live-holder",
            "acquired_at": chrono::Utc::now().timestamp_millis(),
        });
        std::fs::write(lock.path(), live.to_string()).unwrap();

        assert!(lock.try_acquire().unwrap().is_none());
    }

    #[test_context(LockTestContext)]
    #[test]
    fn test_release_leaves_a_replaced_lock_alone(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(60));
        let guard = lock.try_acquire().unwrap().unwrap();

        // Another holder took over after a stale-lock recovery.
        let other = serde_json::json!({ "pid": 1, "token": "other", "acquired_at": chrono::Utc::now().timestamp_millis() });
        std::fs::write(lock.path(), other.to_string()).unwrap();

        drop(guard);
        assert!(lock.is_held());
    }

    #[test_context(LockTestContext)]
    #[tokio::test]
    async fn test_with_exclusive_lock_runs_body_and_releases(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(3600));
        let result = with_exclusive_lock(&lock, Duration::from_secs(1), || async { Ok(7) }).await.unwrap();
        assert_eq!(result, Some(7));
        assert!(!lock.is_held());
    }

    #[test_context(LockTestContext)]
    #[tokio::test]
    async fn test_with_exclusive_lock_releases_on_error(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(3600));
        let result: anyhow::Result<Option<()>> =
            with_exclusive_lock(&lock, Duration::from_secs(1), || async { Err(anyhow::anyhow!("pass failed")) }).await;
        assert!(result.is_err());
        assert!(!lock.is_held());
    }

    #[test_context(LockTestContext)]
    #[tokio::test]
    async fn test_with_exclusive_lock_skips_body_when_busy(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(3600));
        let _held = lock.try_acquire().unwrap().unwrap();

        let ran = Arc::new(AtomicUsize::new(0));
        let counter = ran.clone();
        let result = with_exclusive_lock(&lock, Duration::from_millis(50), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();

        assert!(result.is_none());
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test_context(LockTestContext)]
    #[tokio::test]
    async fn test_contending_runs_never_overlap(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(3600));
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let run = |inside: Arc<AtomicUsize>, max_inside: Arc<AtomicUsize>| {
            let lock = lock.clone();
            async move {
                with_exclusive_lock(&lock, Duration::from_secs(5), || async move {
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
                .await
            }
        };

        let (a, b, c) = tokio::join!(
            run(inside.clone(), max_inside.clone()),
            run(inside.clone(), max_inside.clone()),
            run(inside.clone(), max_inside.clone())
        );
        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());
        assert!(c.unwrap().is_some());
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test_context(LockTestContext)]
    #[test]
    fn test_late_eviction_leaves_the_new_holder_alone(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(60));
        let crashed = serde_json::json!({
            "pid": 999999,
            "token": "crashed-holder",
            "acquired_at": chrono::Utc::now().timestamp_millis() - 120_000,
        });
        std::fs::write(lock.path(), crashed.to_string()).unwrap();

        // Both contenders judged the crashed holder stale; the first one won.
        let first = lock.try_acquire().unwrap().expect("first contender takes over");
        let evicted = lock.evict(Some("crashed-holder")).unwrap();
        assert!(!evicted);
        assert!(lock.is_held());
        assert!(lock.try_acquire().unwrap().is_none());

        // The restored file is still the first contender's: its guard removes it.
        drop(first);
        assert!(!lock.is_held());
        let leftovers = std::fs::read_dir(ctx.temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test_context(LockTestContext)]
    #[test]
    fn test_eviction_with_matching_token_removes_the_lock(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_secs(60));
        let crashed = serde_json::json!({ "pid": 999999, "token": "crashed-holder", "acquired_at": 0 });
        std::fs::write(lock.path(), crashed.to_string()).unwrap();

        assert!(lock.evict(Some("crashed-holder")).unwrap());
        assert!(!lock.is_held());
        assert!(!lock.evict(Some("crashed-holder")).unwrap());
    }

    #[test_context(LockTestContext)]
    #[tokio::test]
    async fn test_long_run_keeps_its_lock(ctx: &mut LockTestContext) {
        let lock = ctx.lock(Duration::from_millis(150));
        let contender = lock.clone();

        let long_run = with_exclusive_lock(&lock, Duration::from_secs(1), || async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        });
        let late_contender = async move {
            tokio::time::sleep(Duration::from_millis(350)).await;
            contender.try_acquire().unwrap().is_some()
        };

        let (ran, stolen) = tokio::join!(long_run, late_contender);
        assert!(ran.unwrap().is_some());
        assert!(!stolen);
        assert!(!lock.is_held());
    }
}
