use chrono::{NaiveDateTime, TimeDelta};

/// A closed interval of foreground-window usage attributed to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: Option<i64>,
    pub task_id: i64,
    pub app_name: String,
    pub window_title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl Activity {
    pub fn duration(&self) -> TimeDelta {
        self.end_time.signed_duration_since(self.start_time)
    }

    /// Activities without an application name are never stored.
    pub fn has_app_name(&self) -> bool {
        !self.app_name.trim().is_empty()
    }
}

/// A stored activity joined with the names of its task and project.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub activity: Activity,
    pub project_name: String,
    pub task_name: String,
}
