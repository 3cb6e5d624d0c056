//! # ttrack
//!
//! A command-line time tracker that follows the foreground window, detects
//! away-from-keyboard periods and attributes the recorded activity to
//! projects and tasks, either through window-title rules or by asking.
//!
//! ```rust,no_run
//! use ttrack::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
