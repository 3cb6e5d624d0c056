use crate::libs::task::Task;
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_ACTIVE_TASKS: &str = "SELECT id, project_id, name, start_time, end_time FROM tasks
    WHERE project_id = ?1 AND end_time IS NULL
    ORDER BY start_time DESC, id DESC";
const SELECT_COMPLETED_TASKS: &str = "SELECT id, project_id, name, start_time, end_time FROM tasks
    WHERE project_id = ?1 AND end_time IS NOT NULL
    ORDER BY start_time DESC, id DESC";
const SELECT_TASK_NAME: &str = "SELECT name FROM tasks WHERE id = ?1";
const INSERT_TASK: &str = "INSERT INTO tasks (project_id, name, start_time) VALUES (?1, ?2, ?3)";
const COMPLETE_TASK: &str = "UPDATE tasks SET end_time = ?1 WHERE id = ?2";
const REOPEN_TASK: &str = "UPDATE tasks SET end_time = NULL WHERE id = ?1";

pub const UNKNOWN_TASK: &str = "Unknown Task";

pub struct Tasks<'a> {
    conn: &'a Connection,
}

impl<'a> Tasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Creates an open task starting at `now` and returns its id.
    pub fn insert(&self, project_id: i64, name: &str, now: NaiveDateTime) -> Result<i64> {
        self.conn.execute(INSERT_TASK, params![project_id, name, now])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Open tasks of a project, most recently started first.
    pub fn fetch_active(&self, project_id: i64) -> Result<Vec<Task>> {
        self.fetch(SELECT_ACTIVE_TASKS, project_id)
    }

    /// Completed tasks of a project, most recently started first.
    pub fn fetch_completed(&self, project_id: i64) -> Result<Vec<Task>> {
        self.fetch(SELECT_COMPLETED_TASKS, project_id)
    }

    pub fn complete(&self, task_id: i64, now: NaiveDateTime) -> Result<()> {
        self.conn.execute(COMPLETE_TASK, params![now, task_id])?;
        Ok(())
    }

    pub fn reopen(&self, task_id: i64) -> Result<()> {
        self.conn.execute(REOPEN_TASK, params![task_id])?;
        Ok(())
    }

    pub fn name(&self, id: i64) -> Result<String> {
        let name: Option<String> = self.conn.query_row(SELECT_TASK_NAME, params![id], |row| row.get(0)).optional()?;
        Ok(name.unwrap_or_else(|| UNKNOWN_TASK.to_string()))
    }

    fn fetch(&self, sql: &str, project_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let tasks = stmt.query_map(params![project_id], Self::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            project_id: row.get(1)?,
            name: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
        })
    }
}
