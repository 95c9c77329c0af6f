/// Every user-facing and log message in the application.
///
/// Text lives in `display.rs`; call sites pass structured data only.
#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(String),
    TaskDeleted(String),
    TasksDeletedCount(usize),
    TaskNotFound(String),
    TaskStatusChanged(String, String, String), // title, from, to
    TasksHeader(String),
    MothersHeader,
    NoTasksFound,
    ConfirmDeleteTask(String),
    ConfirmDeleteMother(String, usize),
    TaskDeleteCancelled,
    InvalidStatus(String),
    InvalidPriority(String),
    InvalidWeekday(String),
    InvalidDate(String),
    RecurrenceNeedsFrequency,

    // === GENERATION MESSAGES ===
    PassStarted(String, usize), // date, snapshot size
    RecurrenceUnrecognized(String, String),
    RecurrenceDisabled(String),
    RecurrenceOutOfRange(String, String, String),
    RecurrenceNoMatch(String, String),
    ChildAlreadyExists(String, String),
    ChildWriteFailed(String, String),
    SnapshotReadFailed(String),
    ChildrenGenerated(usize, String),
    NoChildrenGenerated(String),
    ChildrenWriteFailures(usize),
    DryRunHeader(String),
    GenerationFailed(String),

    // === LOCK MESSAGES ===
    LockAcquired(String),
    LockBusy(String),
    LockTimedOut(String, u64),
    StaleLockRemoved(String),
    LockReleaseFailed(String, String),
    LockRefreshFailed(String, String),
    LockRestoreFailed(String, String),

    // === DAILY JOB MESSAGES ===
    DailyJobTransition(String, String, String), // job, from, to
    DailyJobLockNotAcquired(String),
    DailyJobCompleted(String, usize, usize), // date, generated, failed

    // === SYNC MESSAGES ===
    SyncQueued(String, String), // operation, task id
    SyncDelivered(usize),
    SyncOperationFailed(String, String, String), // operation, task id, reason
    SyncOperationDiscarded(String, String),
    SyncPending(usize),
    SyncQueueEmpty,
    SyncQueueLoadFailed(String),
    SyncQueueSaveFailed(String),
    SyncQueueSetAside(String),
    SyncAlreadyDelivered(String),

    // === BOARD MESSAGES ===
    BoardLoaded(usize),
    BoardLoadedFromCache(usize, String),
    BoardCacheMissing,
    BoardRefreshFailed(String),
    CacheSaveFailed(String),

    // === SCHEDULER MESSAGES ===
    ClientSchedulerStarted(u64),
    DailySchedulerStarted(u32),
    NextDailyRun(String),
    SchedulerTick(String),
    ShutdownRequested,
    SchedulerStopped,
    SignalHandlerFailed(String),

    // === STORE MESSAGES ===
    StoreBackend(String),
    SheetsRequestFailed(String),
    SheetsRejected(String, String), // operation, reason
    SheetsCellDropped(String, String, String), // task id, column, reason
    StoreUrlMissing,

    // === CLIENT / USER MESSAGES ===
    ClientCreated(String),
    ClientDeleted(String),
    ClientNotFound(String),
    NoClients,
    UserCreated(String),
    UserDeleted(String),
    UserNotFound(String),
    NoUsers,
    InvalidRole(String),

    // === CONFIG MESSAGES ===
    ConfigSaved,
    ConfigModuleStore,
    ConfigModuleCalendar,
    ConfigModuleScheduler,
    ConfigReadFailed(String),
    PromptSelectModules,
    PromptStoreBackend,
    PromptStoreUrl,
    PromptStoreTimeout,
    PromptUtcOffset,
    PromptClientInterval,
    PromptDailyHour,
    PromptLockTimeout,
    PromptLockStale,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseUpToDate,
}
