//! Versioned schema migrations.
//!
//! Every migration runs once, in version order, inside a single transaction
//! together with the bookkeeping row recording it in the `migrations` table.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Tables dropped by [`reset`], children first.
const TRACKING_TABLES: [&str; 5] = ["activities", "rules", "tasks", "projects", "migrations"];

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Ordered registry of all schema migrations.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: projects, tasks, activities and rules
        self.add_migration(1, "create_tracking_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    project_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    start_time TIMESTAMP NOT NULL,
                    end_time TIMESTAMP,
                    FOREIGN KEY (project_id) REFERENCES projects (id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS activities (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    task_id INTEGER NOT NULL,
                    app_name TEXT NOT NULL,
                    window_title TEXT,
                    start_time TIMESTAMP NOT NULL,
                    end_time TIMESTAMP NOT NULL,
                    FOREIGN KEY (task_id) REFERENCES tasks (id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS rules (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    pattern TEXT NOT NULL,
                    project_id INTEGER NOT NULL,
                    task_id INTEGER,
                    FOREIGN KEY (project_id) REFERENCES projects (id),
                    FOREIGN KEY (task_id) REFERENCES tasks (id)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: lookups used on every prompt and by the daily log
        self.add_migration(2, "add_tracking_indices", |tx| {
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_project_open ON tasks(project_id, end_time)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_activities_start ON activities(start_time)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_activities_task ON activities(task_id)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded schema version.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(e);
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            msg_debug!(Message::MigrationCompleted(migration.version));
        }
        tx.commit()?;

        msg_debug!(Message::AllMigrationsCompleted);
        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

/// Drops every tracking table and recreates the schema from scratch.
pub fn reset(conn: &mut Connection) -> Result<()> {
    {
        let tx = conn.transaction()?;
        for table in TRACKING_TABLES {
            tx.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
        }
        tx.commit()?;
    }
    init_with_migrations(conn)?;
    msg_info!(Message::DatabaseReset);
    msg_success!(Message::AllMigrationsCompleted);
    Ok(())
}
