/// Every user-facing line the application prints.
///
/// Text lives in `display.rs`; callers pick a variant and hand it to one of
/// the `msg_*` macros.
#[derive(Debug, Clone)]
pub enum Message {
    // === MAIN MENU MESSAGES ===
    MainMenuHeader,
    MenuStartTracking,
    MenuManageRules,
    MenuExit,
    Goodbye,

    // === TRACKING MESSAGES ===
    TrackingStarted,
    TrackingInterrupted,
    TrackerStopping,
    TrackerStopped,
    InputListenersStarted,
    UserIsBack,
    UserIsAfk,
    MenuHotkeyPressed,
    RuleMatched {
        pattern: String,
        project: String,
        task: Option<String>,
    },
    ActivityLogged {
        app_name: String,
        window_title: String,
        task_id: i64,
    },
    ActivityDiscardedBlankApp,
    ActivityDiscardedNoTask(String), // app name
    WindowSampleFailed(String),      // error
    ErrorInRdevListener(String),     // error
    CtrlCListenFailed(String),       // error
    ActivityFlushFailed(String),     // error
    MenuActionFailed(String),        // error
    RuleWithoutOpenTask(String),     // project

    // === PROMPT MESSAGES ===
    PromptBanner(String),              // reason
    CurrentlyTracking(String, String), // project, task
    OptionContinue,
    OptionChangeProject,
    OptionChangeTask,
    NowTracking(String, String), // project, task
    InvalidChoice,
    InvalidNumber,
    InvalidInput,
    InvalidSelection,

    // === PROJECT MESSAGES ===
    ProjectsHeader,
    NoProjectsFound,
    PromptProjectChoice,

    // === TASK MESSAGES ===
    ActiveTasksHeader,
    NoActiveTasks,
    PromptTaskChoice,
    ManageTasksHeader(String), // project
    ManageTasksComplete,
    ManageTasksReopen,
    ManageTasksBack,
    NoActiveTasksToComplete,
    NoCompletedTasksToReopen,
    SelectTaskToComplete,
    SelectTaskToReopen,
    TaskCompleted(String), // task name
    TaskReopened(String),  // task name

    // === RULE MESSAGES ===
    RulesHeader,
    RulesView,
    RulesAdd,
    RulesBack,
    NoRulesDefined,
    PromptRulePattern,
    SelectRuleProject,
    NoProjectsForRule,
    InvalidProjectChoice,
    PromptRuleTask,
    InvalidTaskChoiceProjectOnly,
    RuleAdded,
    EmptyRulePattern,
    RuleTaskNotFound(String, String), // task, project

    // === ACTIVITY LOG MESSAGES ===
    ActivitiesHeader(String),     // date
    NoActivitiesForDate(String), // date

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleTracker,
    PromptTickInterval,
    PromptAfkTimeout,
    PromptCheckinInterval,
    InvalidTrackerConfig(String), // reason

    // === DATABASE MESSAGES ===
    ConfirmDatabaseReset,
    DatabaseReset,
    OperationCancelled,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
}
