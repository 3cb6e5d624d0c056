use chrono::NaiveDateTime;

/// A unit of work inside a project.
///
/// `end_time` is `None` while the task is open; completing the task sets it
/// and reopening clears it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}
