use crate::db::storage::SqliteStorage;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Day to show, as YYYY-MM-DD. Defaults to today.
    #[arg(short, long)]
    date: Option<NaiveDate>,
}

pub fn cmd(args: LogArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let records = SqliteStorage::new()?.activities_for_date(date)?;

    if records.is_empty() {
        msg_info!(Message::NoActivitiesForDate(date.to_string()));
        return Ok(());
    }

    msg_print!(Message::ActivitiesHeader(date.to_string()), true);
    View::activities(&records);
    Ok(())
}
