//! The persistence interface the tracker core talks to, and its SQLite
//! implementation.
//!
//! The core only ever calls into [`Storage`] from the tracking loop, so
//! implementations do not need to be thread-safe. Errors are never
//! swallowed here: a failed write surfaces to the caller and ends the tick.

use super::activities::Activities;
use super::db::Db;
use super::migrations;
use super::projects::Projects;
use super::rules::Rules;
use super::tasks::Tasks;
use crate::libs::activity::{Activity, ActivityRecord};
use crate::libs::messages::Message;
use crate::libs::project::Project;
use crate::libs::rule::Rule;
use crate::libs::task::Task;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    /// Unique-name upsert; calling it twice with the same name yields the same id.
    fn get_or_create_project(&self, name: &str) -> Result<i64>;
    /// All projects ordered by name.
    fn get_projects(&self) -> Result<Vec<Project>>;
    /// Open tasks of a project, most recent first.
    fn get_active_tasks_for_project(&self, project_id: i64) -> Result<Vec<Task>>;
    fn get_completed_tasks_for_project(&self, project_id: i64) -> Result<Vec<Task>>;
    /// Creates an open task starting now.
    fn create_task(&self, project_id: i64, name: &str) -> Result<i64>;
    fn complete_task(&self, task_id: i64) -> Result<()>;
    fn reopen_task(&self, task_id: i64) -> Result<()>;
    /// Persists a closed activity; returns `None` when it was rejected for a blank app name.
    fn add_activity(&self, activity: &Activity) -> Result<Option<i64>>;
    fn add_rule(&self, pattern: &str, project_id: i64, task_id: Option<i64>) -> Result<i64>;
    /// Rules in definition order with project and task names joined in.
    fn get_rules(&self) -> Result<Vec<Rule>>;
    /// Project name, or "Unknown Project" when there is no such id.
    fn project_name(&self, project_id: i64) -> Result<String>;
    /// Task name, or "Unknown Task" when there is no such id.
    fn task_name(&self, task_id: i64) -> Result<String>;
}

pub struct SqliteStorage {
    db: Db,
}

impl SqliteStorage {
    /// Opens the database in the application data directory.
    pub fn new() -> Result<Self> {
        Ok(Self { db: Db::new()? })
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self { db: Db::open(path)? })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self { db: Db::in_memory()? })
    }

    pub fn activities_for_date(&self, date: NaiveDate) -> Result<Vec<ActivityRecord>> {
        Activities::new(&self.db.conn).fetch_for_date(date)
    }

    pub fn find_project(&self, name: &str) -> Result<Option<i64>> {
        Projects::new(&self.db.conn).find_id(name)
    }

    /// Drops all data and recreates the schema.
    pub fn reset(&mut self) -> Result<()> {
        migrations::reset(&mut self.db.conn)
    }
}

impl Storage for SqliteStorage {
    fn get_or_create_project(&self, name: &str) -> Result<i64> {
        Projects::new(&self.db.conn).get_or_create(name)
    }

    fn get_projects(&self) -> Result<Vec<Project>> {
        Projects::new(&self.db.conn).fetch()
    }

    fn get_active_tasks_for_project(&self, project_id: i64) -> Result<Vec<Task>> {
        Tasks::new(&self.db.conn).fetch_active(project_id)
    }

    fn get_completed_tasks_for_project(&self, project_id: i64) -> Result<Vec<Task>> {
        Tasks::new(&self.db.conn).fetch_completed(project_id)
    }

    fn create_task(&self, project_id: i64, name: &str) -> Result<i64> {
        Tasks::new(&self.db.conn).insert(project_id, name, Local::now().naive_local())
    }

    fn complete_task(&self, task_id: i64) -> Result<()> {
        Tasks::new(&self.db.conn).complete(task_id, Local::now().naive_local())
    }

    fn reopen_task(&self, task_id: i64) -> Result<()> {
        Tasks::new(&self.db.conn).reopen(task_id)
    }

    fn add_activity(&self, activity: &Activity) -> Result<Option<i64>> {
        Activities::new(&self.db.conn).insert(activity)
    }

    fn add_rule(&self, pattern: &str, project_id: i64, task_id: Option<i64>) -> Result<i64> {
        if pattern.trim().is_empty() {
            msg_bail_anyhow!(Message::EmptyRulePattern);
        }
        Rules::new(&self.db.conn).insert(pattern.trim(), project_id, task_id)
    }

    fn get_rules(&self) -> Result<Vec<Rule>> {
        Rules::new(&self.db.conn).fetch()
    }

    fn project_name(&self, project_id: i64) -> Result<String> {
        Projects::new(&self.db.conn).name(project_id)
    }

    fn task_name(&self, task_id: i64) -> Result<String> {
        Tasks::new(&self.db.conn).name(task_id)
    }
}
