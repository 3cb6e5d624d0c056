//! Classification rule management.
//!
//! `ttrack rules list` and `ttrack rules add` are scriptable; `ttrack rules
//! manage` (and "Manage Rules" in the main menu) opens the interactive menu.

use crate::db::storage::{SqliteStorage, Storage};
use crate::libs::messages::Message;
use crate::libs::prompt::{ConsolePrompt, PromptPort};
use crate::libs::rule::Rule;
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};

const MENU_QUESTION: &str = ">";

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    command: Option<RulesCommands>,
}

#[derive(Debug, Subcommand)]
enum RulesCommands {
    #[command(about = "List rules in evaluation order")]
    List,
    #[command(about = "Add a rule")]
    Add {
        /// Case-insensitive substring of the window title
        pattern: String,
        /// Target project, created if missing
        #[arg(short, long)]
        project: String,
        /// Target task, must be an open task of the project
        #[arg(short, long)]
        task: Option<String>,
    },
    #[command(about = "Interactive rule menu")]
    Manage,
}

pub fn cmd(args: RulesArgs) -> Result<()> {
    let storage = SqliteStorage::new()?;
    match args.command {
        Some(RulesCommands::List) => {
            let rules = storage.get_rules()?;
            if rules.is_empty() {
                msg_info!(Message::NoRulesDefined);
            } else {
                View::rules(&rules);
            }
            Ok(())
        }
        Some(RulesCommands::Add { pattern, project, task }) => {
            add(&storage, &pattern, &project, task.as_deref())?;
            msg_success!(Message::RuleAdded);
            Ok(())
        }
        Some(RulesCommands::Manage) | None => manage(&mut ConsolePrompt, &storage),
    }
}

/// Adds a rule addressed by names. The project is created on demand; a
/// named task has to be open in that project.
pub fn add(storage: &dyn Storage, pattern: &str, project: &str, task: Option<&str>) -> Result<i64> {
    if pattern.trim().is_empty() {
        msg_bail_anyhow!(Message::EmptyRulePattern);
    }

    let project_id = storage.get_or_create_project(project.trim())?;
    let task_id = match task.map(str::trim) {
        Some(name) => {
            let tasks = storage.get_active_tasks_for_project(project_id)?;
            match tasks.iter().find(|t| t.name == name) {
                Some(t) => Some(t.id),
                None => msg_bail_anyhow!(Message::RuleTaskNotFound(name.to_string(), project.trim().to_string())),
            }
        }
        None => None,
    };

    storage.add_rule(pattern, project_id, task_id)
}

/// The interactive rule menu: view, add, back.
pub fn manage(port: &mut dyn PromptPort, storage: &dyn Storage) -> Result<()> {
    loop {
        port.show("");
        port.show(&Message::RulesHeader.to_string());
        port.show(&Message::RulesView.to_string());
        port.show(&Message::RulesAdd.to_string());
        port.show(&Message::RulesBack.to_string());

        match port.ask(MENU_QUESTION)?.trim() {
            "1" => show_rules(port, &storage.get_rules()?),
            "2" => add_interactive(port, storage)?,
            "3" => return Ok(()),
            _ => port.show(&Message::InvalidChoice.to_string()),
        }
    }
}

fn show_rules(port: &mut dyn PromptPort, rules: &[Rule]) {
    if rules.is_empty() {
        port.show(&Message::NoRulesDefined.to_string());
        return;
    }
    for rule in rules {
        let task = rule.task_name.as_ref().map(|t| format!(", Task: {}", t)).unwrap_or_default();
        port.show(&format!(
            "ID: {}, Pattern: '{}', Project: {}{}",
            rule.id, rule.pattern, rule.project_name, task
        ));
    }
}

fn add_interactive(port: &mut dyn PromptPort, storage: &dyn Storage) -> Result<()> {
    let pattern = port.ask(&Message::PromptRulePattern.to_string())?;
    if pattern.trim().is_empty() {
        port.show(&Message::EmptyRulePattern.to_string());
        return Ok(());
    }

    let projects = storage.get_projects()?;
    if projects.is_empty() {
        port.show(&Message::NoProjectsForRule.to_string());
        return Ok(());
    }
    port.show(&Message::SelectRuleProject.to_string());
    for (i, project) in projects.iter().enumerate() {
        port.show(&format!("{}. {}", i + 1, project.name));
    }
    let Some(project) = nth(&port.ask(MENU_QUESTION)?, &projects) else {
        port.show(&Message::InvalidProjectChoice.to_string());
        return Ok(());
    };

    let tasks = storage.get_active_tasks_for_project(project.id)?;
    for (i, task) in tasks.iter().enumerate() {
        port.show(&format!("{}. {}", i + 1, task.name));
    }
    let choice = port.ask(&Message::PromptRuleTask.to_string())?;
    let task_id = if choice.trim().is_empty() {
        None
    } else {
        match nth(&choice, &tasks) {
            Some(task) => Some(task.id),
            None => {
                port.show(&Message::InvalidTaskChoiceProjectOnly.to_string());
                None
            }
        }
    };

    storage.add_rule(&pattern, project.id, task_id)?;
    port.show(&format!("✅ {}", Message::RuleAdded));
    Ok(())
}

/// Looks up a 1-based list choice.
fn nth<'a, T>(choice: &str, items: &'a [T]) -> Option<&'a T> {
    let n = choice.trim().parse::<usize>().ok()?;
    n.checked_sub(1).and_then(|i| items.get(i))
}
