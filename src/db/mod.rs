//! SQLite persistence.
//!
//! [`storage::Storage`] is the interface the tracker talks to and
//! [`storage::SqliteStorage`] implements it on top of the per-table modules.
//! The schema is versioned by [`migrations`] and applied when a database is
//! opened.

pub mod activities;
pub mod db;
pub mod migrations;
pub mod projects;
pub mod rules;
pub mod storage;
pub mod tasks;
