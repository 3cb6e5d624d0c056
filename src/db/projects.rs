use crate::libs::project::Project;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

const SELECT_PROJECTS: &str = "SELECT id, name FROM projects ORDER BY name";
const SELECT_PROJECT_ID_BY_NAME: &str = "SELECT id FROM projects WHERE name = ?1";
const SELECT_PROJECT_NAME: &str = "SELECT name FROM projects WHERE id = ?1";
const INSERT_PROJECT: &str = "INSERT INTO projects (name) VALUES (?1)";

pub const UNKNOWN_PROJECT: &str = "Unknown Project";

pub struct Projects<'a> {
    conn: &'a Connection,
}

impl<'a> Projects<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the id of the project called `name`, creating it when missing.
    pub fn get_or_create(&self, name: &str) -> Result<i64> {
        let existing: Option<i64> = self.conn.query_row(SELECT_PROJECT_ID_BY_NAME, params![name], |row| row.get(0)).optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn.execute(INSERT_PROJECT, params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn fetch(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(SELECT_PROJECTS)?;
        let projects = stmt
            .query_map([], |row| Ok(Project { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    pub fn find_id(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.conn.query_row(SELECT_PROJECT_ID_BY_NAME, params![name], |row| row.get(0)).optional()?)
    }

    pub fn name(&self, id: i64) -> Result<String> {
        let name: Option<String> = self.conn.query_row(SELECT_PROJECT_NAME, params![id], |row| row.get(0)).optional()?;
        Ok(name.unwrap_or_else(|| UNKNOWN_PROJECT.to_string()))
    }
}
