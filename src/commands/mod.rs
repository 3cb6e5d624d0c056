//! Command-line interface for ttrack.
//!
//! Without a subcommand the interactive main menu opens, mirroring the
//! `menu` subcommand.

pub mod db;
pub mod init;
pub mod log;
pub mod menu;
pub mod rules;
pub mod track;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Open the interactive main menu")]
    Menu,
    #[command(about = "Start tracking right away")]
    Track,
    #[command(about = "List, add or manage classification rules")]
    Rules(rules::RulesArgs),
    #[command(about = "Show the activities recorded on a day")]
    Log(log::LogArgs),
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Database maintenance")]
    Db(db::DbArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            None | Some(Commands::Menu) => menu::cmd().await,
            Some(Commands::Track) => track::cmd().await,
            Some(Commands::Rules(args)) => rules::cmd(args),
            Some(Commands::Log(args)) => log::cmd(args),
            Some(Commands::Init(args)) => init::cmd(args),
            Some(Commands::Db(args)) => db::cmd(args),
        }
    }
}
