//! Display implementation for ttrack application messages.
//!
//! All user-facing text is defined here, in one match, so the rest of the
//! code base only ever refers to `Message` variants.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === MAIN MENU MESSAGES ===
            Message::MainMenuHeader => "--- Time Tracker Menu ---".to_string(),
            Message::MenuStartTracking => "Start Tracking".to_string(),
            Message::MenuManageRules => "Manage Rules".to_string(),
            Message::MenuExit => "Exit".to_string(),
            Message::Goodbye => "Exiting Time Tracker. Goodbye!".to_string(),

            // === TRACKING MESSAGES ===
            Message::TrackingStarted => "Starting tracking... (Press Ctrl+C to stop tracking and return to menu, F1 to open the menu)".to_string(),
            Message::TrackingInterrupted => "Tracking interrupted by user. Returning to main menu.".to_string(),
            Message::TrackerStopping => "Stopping tracker...".to_string(),
            Message::TrackerStopped => "Tracker stopped.".to_string(),
            Message::InputListenersStarted => "Input listeners started.".to_string(),
            Message::UserIsBack => "User is back.".to_string(),
            Message::UserIsAfk => "User is now AFK.".to_string(),
            Message::MenuHotkeyPressed => "F1 pressed. Requesting menu prompt...".to_string(),
            Message::RuleMatched { pattern, project, task } => match task {
                Some(task) => format!("Rule matched: '{}' -> Project: {}, Task: {}.", pattern, project, task),
                None => format!("Rule matched: '{}' -> Project: {}.", pattern, project),
            },
            Message::ActivityLogged {
                app_name,
                window_title,
                task_id,
            } => format!("Activity logged: App='{}', Window='{}' for Task ID {}", app_name, window_title, task_id),
            Message::ActivityDiscardedBlankApp => "Activity without an application name discarded.".to_string(),
            Message::ActivityDiscardedNoTask(app_name) => format!("Activity for '{}' discarded: no task selected.", app_name),
            Message::WindowSampleFailed(error) => format!("Failed to read the active window: {}", error),
            Message::ErrorInRdevListener(error) => format!("Failed to listen for input events: {}. Retrying in 1 second...", error),
            Message::CtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::ActivityFlushFailed(error) => format!("Failed to save the open activity: {}", error),
            Message::MenuActionFailed(error) => format!("Operation failed: {}", error),
            Message::RuleWithoutOpenTask(project) => format!("Project '{}' has no open task. Please pick one.", project),

            // === PROMPT MESSAGES ===
            Message::PromptBanner(reason) => format!("🔔 {} Let's log your work.", reason),
            Message::CurrentlyTracking(project, task) => format!("Currently tracking Project: {}, Task: {}", project, task),
            Message::OptionContinue => "1. Continue with current project/task".to_string(),
            Message::OptionChangeProject => "2. Change Project".to_string(),
            Message::OptionChangeTask => "3. Change Task".to_string(),
            Message::NowTracking(project, task) => format!("Great! Now tracking for Project: {}, Task: {}.", project, task),
            Message::InvalidChoice => "Invalid choice. Please try again.".to_string(),
            Message::InvalidNumber => "Invalid number. Please try again.".to_string(),
            Message::InvalidInput => "Invalid input.".to_string(),
            Message::InvalidSelection => "Invalid selection.".to_string(),

            // === PROJECT MESSAGES ===
            Message::ProjectsHeader => "--- Projects ---".to_string(),
            Message::NoProjectsFound => "No projects found. Please type a new project name:".to_string(),
            Message::PromptProjectChoice => "Enter project number to select, or type a new project name:".to_string(),

            // === TASK MESSAGES ===
            Message::ActiveTasksHeader => "--- Active Tasks for this Project ---".to_string(),
            Message::NoActiveTasks => "No active tasks.".to_string(),
            Message::PromptTaskChoice => "Enter task number to select, type a new task name, or 'm' to manage tasks:".to_string(),
            Message::ManageTasksHeader(project) => format!("--- Manage Tasks for '{}' ---", project),
            Message::ManageTasksComplete => "1. Complete an active task".to_string(),
            Message::ManageTasksReopen => "2. Reopen a completed task".to_string(),
            Message::ManageTasksBack => "3. Back to task selection".to_string(),
            Message::NoActiveTasksToComplete => "No active tasks to complete.".to_string(),
            Message::NoCompletedTasksToReopen => "No completed tasks to reopen.".to_string(),
            Message::SelectTaskToComplete => "Select a task to complete:".to_string(),
            Message::SelectTaskToReopen => "Select a task to reopen:".to_string(),
            Message::TaskCompleted(name) => format!("Task '{}' marked as completed.", name),
            Message::TaskReopened(name) => format!("Task '{}' has been reopened.", name),

            // === RULE MESSAGES ===
            Message::RulesHeader => "--- Rule Management ---".to_string(),
            Message::RulesView => "1. View existing rules".to_string(),
            Message::RulesAdd => "2. Add a new rule".to_string(),
            Message::RulesBack => "3. Back to main menu".to_string(),
            Message::NoRulesDefined => "No rules defined.".to_string(),
            Message::PromptRulePattern => "Enter pattern (e.g., 'VS Code'):".to_string(),
            Message::SelectRuleProject => "Select a project for this rule:".to_string(),
            Message::NoProjectsForRule => "No projects found. Start tracking once to create a project.".to_string(),
            Message::InvalidProjectChoice => "Invalid project choice.".to_string(),
            Message::PromptRuleTask => "Assign to a specific task? (Enter task number or leave blank for project only):".to_string(),
            Message::InvalidTaskChoiceProjectOnly => "Invalid task choice. Rule will be project-only.".to_string(),
            Message::RuleAdded => "Rule added successfully!".to_string(),
            Message::EmptyRulePattern => "Rule pattern must not be empty.".to_string(),
            Message::RuleTaskNotFound(task, project) => format!("No open task '{}' in project '{}'.", task, project),

            // === ACTIVITY LOG MESSAGES ===
            Message::ActivitiesHeader(date) => format!("Activities for {}", date),
            Message::NoActivitiesForDate(date) => format!("No activities recorded for {}.", date),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::PromptTickInterval => "Enter tick interval (seconds)".to_string(),
            Message::PromptAfkTimeout => "Enter AFK timeout (seconds)".to_string(),
            Message::PromptCheckinInterval => "Enter check-in interval (seconds)".to_string(),
            Message::InvalidTrackerConfig(reason) => format!("Invalid tracker settings: {}", reason),

            // === DATABASE MESSAGES ===
            Message::ConfirmDatabaseReset => "This deletes all projects, tasks, activities and rules. Continue?".to_string(),
            Message::DatabaseReset => "Database and tables created successfully.".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
        };
        write!(f, "{}", text)
    }
}
