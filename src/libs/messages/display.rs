use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(title) => format!("Task '{}' created", title),
            Message::TaskDeleted(title) => format!("Task '{}' deleted", title),
            Message::TasksDeletedCount(count) => format!("{} task(s) removed", count),
            Message::TaskNotFound(id) => format!("Task not found: {}", id),
            Message::TaskStatusChanged(title, from, to) => format!("'{}': {} -> {}", title, from, to),
            Message::TasksHeader(date) => format!("Tasks for {}:", date),
            Message::MothersHeader => "Recurring templates:".to_string(),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'?", title),
            Message::ConfirmDeleteMother(title, pending) => format!(
                "Delete recurring task '{}' and {} pending instance(s)? Completed instances are kept.",
                title, pending
            ),
            Message::TaskDeleteCancelled => "Deletion cancelled".to_string(),
            Message::InvalidStatus(value) => format!("Unknown status '{}' (expected todo, inprogress, review or done)", value),
            Message::InvalidPriority(value) => format!("Unknown priority '{}' (expected low, medium, high or critical)", value),
            Message::InvalidWeekday(value) => format!("Unknown weekday '{}'", value),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD", value),
            Message::RecurrenceNeedsFrequency => "A recurring task needs --every daily|weekly|monthly".to_string(),

            // === GENERATION MESSAGES ===
            Message::PassStarted(date, count) => format!("Generation pass for {} over {} task(s)", date, count),
            Message::RecurrenceUnrecognized(title, frequency) => {
                format!("Skipping '{}': unrecognized recurrence frequency '{}'", title, frequency)
            }
            Message::RecurrenceDisabled(title) => format!("Skipping '{}': recurrence disabled", title),
            Message::RecurrenceOutOfRange(title, start, end) => format!("Skipping '{}': outside {}..={}", title, start, end),
            Message::RecurrenceNoMatch(title, date) => format!("Skipping '{}': rule does not fire on {}", title, date),
            Message::ChildAlreadyExists(title, date) => format!("Skipping '{}': instance for {} already exists", title, date),
            Message::ChildWriteFailed(title, error) => format!("Failed to save generated task '{}': {}", title, error),
            Message::SnapshotReadFailed(error) => format!("Failed to read tasks, nothing generated: {}", error),
            Message::ChildrenGenerated(count, date) => format!("{} recurring instance(s) generated for {}", count, date),
            Message::NoChildrenGenerated(date) => format!("No recurring instances due for {}", date),
            Message::ChildrenWriteFailures(count) => format!("{} generated instance(s) could not be saved", count),
            Message::DryRunHeader(date) => format!("Instances that would be generated for {}:", date),
            Message::GenerationFailed(error) => format!("Generation failed: {}", error),

            // === LOCK MESSAGES ===
            Message::LockAcquired(name) => format!("Lock '{}' acquired", name),
            Message::LockBusy(name) => format!("Lock '{}' is held, waiting", name),
            Message::LockTimedOut(name, secs) => format!("Lock '{}' not acquired within {}s", name, secs),
            Message::StaleLockRemoved(name) => format!("Removed stale lock '{}'", name),
            Message::LockReleaseFailed(name, error) => format!("Failed to release lock '{}': {}", name, error),
            Message::LockRefreshFailed(name, error) => format!("Failed to refresh lock '{}': {}", name, error),
            Message::LockRestoreFailed(name, error) => format!("Could not restore lock '{}' after a concurrent takeover: {}", name, error),

            // === DAILY JOB MESSAGES ===
            Message::DailyJobTransition(job, from, to) => format!("{}: {} -> {}", job, from, to),
            Message::DailyJobLockNotAcquired(job) => format!("{}: another run holds the lock, skipping this pass", job),
            Message::DailyJobCompleted(date, generated, failed) => {
                format!("Daily pass for {} completed: {} generated, {} failed", date, generated, failed)
            }

            // === SYNC MESSAGES ===
            Message::SyncQueued(op, id) => format!("Queued {} for {}", op, id),
            Message::SyncDelivered(count) => format!("{} change(s) synchronized", count),
            Message::SyncOperationFailed(op, id, error) => format!("Sync of {} for {} failed, will retry: {}", op, id, error),
            Message::SyncOperationDiscarded(op, id) => format!("Dropped {} for {}: no longer in the store", op, id),
            Message::SyncPending(count) => format!("{} change(s) waiting to be synchronized", count),
            Message::SyncQueueEmpty => "Nothing to synchronize".to_string(),
            Message::SyncQueueLoadFailed(error) => format!("Failed to load pending changes: {}", error),
            Message::SyncQueueSaveFailed(error) => format!("Failed to persist pending changes: {}", error),
            Message::SyncQueueSetAside(path) => format!("Unreadable pending changes moved to {}", path),
            Message::SyncAlreadyDelivered(id) => format!("{} is already in the store, marking its create as delivered", id),

            // === BOARD MESSAGES ===
            Message::BoardLoaded(count) => format!("Loaded {} task(s)", count),
            Message::BoardLoadedFromCache(count, error) => {
                format!("Store unavailable ({}), showing {} cached task(s)", error, count)
            }
            Message::BoardCacheMissing => "No cached tasks available".to_string(),
            Message::BoardRefreshFailed(error) => format!("Could not re-read tasks, using the local list: {}", error),
            Message::CacheSaveFailed(error) => format!("Failed to save task cache: {}", error),

            // === SCHEDULER MESSAGES ===
            Message::ClientSchedulerStarted(minutes) => format!("Generating and syncing every {} minute(s). Press Ctrl+C to stop.", minutes),
            Message::DailySchedulerStarted(hour) => format!("Daily pass scheduled at {:02}:00. Press Ctrl+C to stop.", hour),
            Message::NextDailyRun(at) => format!("Next daily pass at {}", at),
            Message::SchedulerTick(date) => format!("Scheduler tick for {}", date),
            Message::ShutdownRequested => "Shutdown requested".to_string(),
            Message::SchedulerStopped => "Scheduler stopped".to_string(),
            Message::SignalHandlerFailed(error) => format!("Failed to install signal handler: {}", error),

            // === STORE MESSAGES ===
            Message::StoreBackend(name) => format!("Using {} store", name),
            Message::SheetsRequestFailed(error) => format!("Spreadsheet request failed: {}", error),
            Message::SheetsRejected(op, error) => format!("Spreadsheet rejected {}: {}", op, error),
            Message::SheetsCellDropped(id, column, reason) => format!("Ignoring {} of task {}: {}", column, id, reason),
            Message::StoreUrlMissing => "The sheets store needs a URL (run `taskboard init` or set TASKBOARD_STORE_URL)".to_string(),

            // === CLIENT / USER MESSAGES ===
            Message::ClientCreated(name) => format!("Client '{}' created", name),
            Message::ClientDeleted(id) => format!("Client {} deleted", id),
            Message::ClientNotFound(id) => format!("Client not found: {}", id),
            Message::NoClients => "No clients found".to_string(),
            Message::UserCreated(name) => format!("User '{}' created", name),
            Message::UserDeleted(id) => format!("User {} deleted", id),
            Message::UserNotFound(id) => format!("User not found: {}", id),
            Message::NoUsers => "No users found".to_string(),
            Message::InvalidRole(value) => format!("Unknown role '{}' (expected manager, datascientist, dataengineer or analyst)", value),

            // === CONFIG MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigModuleStore => "Task store settings".to_string(),
            Message::ConfigModuleCalendar => "Calendar settings".to_string(),
            Message::ConfigModuleScheduler => "Scheduler settings".to_string(),
            Message::ConfigReadFailed(error) => format!("Failed to read configuration, using defaults: {}", error),
            Message::PromptSelectModules => "Select the settings to configure".to_string(),
            Message::PromptStoreBackend => "Task store".to_string(),
            Message::PromptStoreUrl => "Spreadsheet endpoint URL".to_string(),
            Message::PromptStoreTimeout => "Request timeout (seconds)".to_string(),
            Message::PromptUtcOffset => "UTC offset in hours for calendar dates (empty for host local time)".to_string(),
            Message::PromptClientInterval => "Client generation interval (minutes)".to_string(),
            Message::PromptDailyHour => "Daily pass hour (0-23)".to_string(),
            Message::PromptLockTimeout => "Lock wait timeout (seconds)".to_string(),
            Message::PromptLockStale => "Treat locks older than this as stale (seconds)".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
        };

        write!(f, "{}", text)
    }
}
