use super::{rules, track};
use crate::db::storage::SqliteStorage;
use crate::libs::messages::Message;
use crate::libs::prompt::{ConsolePrompt, PromptError};
use crate::{msg_error, msg_print, msg_success};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Select};

/// Main menu loop: start tracking, manage rules or exit.
///
/// A failing action is reported and the menu is shown again. Only closed
/// input ends the loop with an error.
pub async fn cmd() -> Result<()> {
    let items = [
        Message::MenuStartTracking.to_string(),
        Message::MenuManageRules.to_string(),
        Message::MenuExit.to_string(),
    ];

    loop {
        msg_print!(Message::MainMenuHeader, true);
        let selection = Select::with_theme(&ColorfulTheme::default())
            .items(&items)
            .default(0)
            .interact()?;

        let result = match selection {
            0 => track::cmd().await,
            1 => SqliteStorage::new().and_then(|storage| rules::manage(&mut ConsolePrompt, &storage)),
            _ => {
                msg_success!(Message::Goodbye);
                return Ok(());
            }
        };
        recover(result)?;
    }
}

fn recover(result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if matches!(e.downcast_ref::<PromptError>(), Some(PromptError::Closed)) => Err(e),
        Err(e) => {
            msg_error!(Message::MenuActionFailed(e.to_string()));
            Ok(())
        }
    }
}
