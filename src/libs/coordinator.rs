//! Interactive project and task selection.
//!
//! The coordinator runs synchronously on the tracking loop's thread and
//! blocks it until a `(project, task)` pair is settled. It only reads and
//! creates records through [`Storage`]; applying the result to the tracker
//! state is the caller's job.

use super::messages::Message;
use super::prompt::PromptPort;
use super::task::Task;
use crate::db::storage::Storage;
use anyhow::Result;
use std::fmt;

const MENU_QUESTION: &str = ">";
const MANAGE_TASKS_KEY: &str = "m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptReason {
    Welcome,
    WelcomeBack,
    MenuRequested,
    CheckIn,
    /// A rule moved tracking to a project without an open task.
    TaskNeeded,
}

impl fmt::Display for PromptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PromptReason::Welcome => "Welcome!",
            PromptReason::WelcomeBack => "Welcome back!",
            PromptReason::MenuRequested => "Menu requested!",
            PromptReason::CheckIn => "Time for a check-in!",
            PromptReason::TaskNeeded => "Pick a task!",
        };
        write!(f, "{}", text)
    }
}

/// A 1-based list choice.
enum Pick {
    Index(usize),
    OutOfRange,
    NotANumber,
}

fn pick(input: &str, len: usize) -> Pick {
    match input.parse::<i64>() {
        Ok(n) if n >= 1 && (n as usize) <= len => Pick::Index(n as usize - 1),
        Ok(_) => Pick::OutOfRange,
        Err(_) => Pick::NotANumber,
    }
}

pub struct PromptCoordinator<P: PromptPort> {
    port: P,
}

impl<P: PromptPort> PromptCoordinator<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Runs the selection dialogue and returns the `(project_id, task_id)` to track.
    ///
    /// With both ids present the user may keep them, change the project (and
    /// then the task) or change only the task. Otherwise project and task are
    /// selected from scratch.
    pub fn resolve(
        &mut self,
        storage: &dyn Storage,
        reason: PromptReason,
        project_id: Option<i64>,
        task_id: Option<i64>,
    ) -> Result<(i64, i64)> {
        self.port.show("");
        self.port.show(&Message::PromptBanner(reason.to_string()).to_string());

        let (Some(project_id), Some(task_id)) = (project_id, task_id) else {
            let project_id = self.select_project(storage)?;
            let task_id = self.select_task(storage, project_id)?;
            return Ok((project_id, task_id));
        };

        loop {
            let project = storage.project_name(project_id)?;
            let task = storage.task_name(task_id)?;
            self.port.show(&Message::CurrentlyTracking(project, task).to_string());
            self.port.show(&Message::OptionContinue.to_string());
            self.port.show(&Message::OptionChangeProject.to_string());
            self.port.show(&Message::OptionChangeTask.to_string());

            match self.port.ask(MENU_QUESTION)?.trim() {
                "1" => return Ok((project_id, task_id)),
                "2" => {
                    let project_id = self.select_project(storage)?;
                    let task_id = self.select_task(storage, project_id)?;
                    return Ok((project_id, task_id));
                }
                "3" => {
                    let task_id = self.select_task(storage, project_id)?;
                    return Ok((project_id, task_id));
                }
                _ => self.port.show(&Message::InvalidChoice.to_string()),
            }
        }
    }

    /// Prints the confirmation line for a settled selection.
    pub fn confirm(&mut self, storage: &dyn Storage, project_id: i64, task_id: i64) -> Result<()> {
        let project = storage.project_name(project_id)?;
        let task = storage.task_name(task_id)?;
        self.port.show(&format!("✅ {}", Message::NowTracking(project, task)));
        Ok(())
    }

    /// Picks an existing project by number or creates one from free text.
    pub fn select_project(&mut self, storage: &dyn Storage) -> Result<i64> {
        loop {
            self.port.show("");
            self.port.show(&Message::ProjectsHeader.to_string());
            let projects = storage.get_projects()?;

            if projects.is_empty() {
                let name = self.port.ask(&Message::NoProjectsFound.to_string())?;
                let name = name.trim();
                if name.is_empty() {
                    self.port.show(&Message::InvalidInput.to_string());
                    continue;
                }
                return storage.get_or_create_project(name);
            }

            for (i, project) in projects.iter().enumerate() {
                self.port.show(&format!("{}. {}", i + 1, project.name));
            }

            let choice = self.port.ask(&Message::PromptProjectChoice.to_string())?;
            let choice = choice.trim();
            match pick(choice, projects.len()) {
                Pick::Index(i) => return Ok(projects[i].id),
                Pick::OutOfRange => self.port.show(&Message::InvalidNumber.to_string()),
                Pick::NotANumber if choice.is_empty() => self.port.show(&Message::InvalidInput.to_string()),
                Pick::NotANumber => return storage.get_or_create_project(choice),
            }
        }
    }

    /// Picks an open task of `project_id` by number, creates one from free
    /// text, or detours through task management on `m`.
    pub fn select_task(&mut self, storage: &dyn Storage, project_id: i64) -> Result<i64> {
        loop {
            self.port.show("");
            self.port.show(&Message::ActiveTasksHeader.to_string());
            let tasks = storage.get_active_tasks_for_project(project_id)?;
            if tasks.is_empty() {
                self.port.show(&Message::NoActiveTasks.to_string());
            } else {
                self.show_tasks(&tasks);
            }

            let choice = self.port.ask(&Message::PromptTaskChoice.to_string())?;
            let choice = choice.trim();
            if choice.eq_ignore_ascii_case(MANAGE_TASKS_KEY) {
                self.manage_tasks(storage, project_id)?;
                continue;
            }

            match pick(choice, tasks.len()) {
                Pick::Index(i) => return Ok(tasks[i].id),
                Pick::OutOfRange => self.port.show(&Message::InvalidNumber.to_string()),
                Pick::NotANumber if choice.is_empty() => self.port.show(&Message::InvalidInput.to_string()),
                Pick::NotANumber => return storage.create_task(project_id, choice),
            }
        }
    }

    /// Completes or reopens tasks of a project until the user goes back.
    pub fn manage_tasks(&mut self, storage: &dyn Storage, project_id: i64) -> Result<()> {
        loop {
            let project = storage.project_name(project_id)?;
            self.port.show("");
            self.port.show(&Message::ManageTasksHeader(project).to_string());
            self.port.show(&Message::ManageTasksComplete.to_string());
            self.port.show(&Message::ManageTasksReopen.to_string());
            self.port.show(&Message::ManageTasksBack.to_string());

            match self.port.ask(MENU_QUESTION)?.trim() {
                "1" => {
                    let tasks = storage.get_active_tasks_for_project(project_id)?;
                    if tasks.is_empty() {
                        self.port.show(&Message::NoActiveTasksToComplete.to_string());
                        continue;
                    }
                    if let Some(task) = self.pick_task(&tasks, Message::SelectTaskToComplete)? {
                        storage.complete_task(task.id)?;
                        self.port.show(&Message::TaskCompleted(task.name.clone()).to_string());
                    }
                }
                "2" => {
                    let tasks = storage.get_completed_tasks_for_project(project_id)?;
                    if tasks.is_empty() {
                        self.port.show(&Message::NoCompletedTasksToReopen.to_string());
                        continue;
                    }
                    if let Some(task) = self.pick_task(&tasks, Message::SelectTaskToReopen)? {
                        storage.reopen_task(task.id)?;
                        self.port.show(&Message::TaskReopened(task.name.clone()).to_string());
                    }
                }
                "3" => return Ok(()),
                _ => self.port.show(&Message::InvalidChoice.to_string()),
            }
        }
    }

    fn pick_task<'t>(&mut self, tasks: &'t [Task], header: Message) -> Result<Option<&'t Task>> {
        self.port.show("");
        self.port.show(&header.to_string());
        self.show_tasks(tasks);

        let choice = self.port.ask(MENU_QUESTION)?;
        match pick(choice.trim(), tasks.len()) {
            Pick::Index(i) => Ok(Some(&tasks[i])),
            _ => {
                self.port.show(&Message::InvalidSelection.to_string());
                Ok(None)
            }
        }
    }

    fn show_tasks(&mut self, tasks: &[Task]) {
        for (i, task) in tasks.iter().enumerate() {
            self.port.show(&format!("{}. {}", i + 1, task.name));
        }
    }
}
