//! The line-oriented I/O the prompt flows run over.
//!
//! [`ConsolePrompt`] talks to the terminal through dialoguer;
//! [`ScriptedPrompt`] replays canned answers and records everything shown,
//! so prompt flows and the tracking loop can be driven deterministically.

use dialoguer::{theme::ColorfulTheme, Input};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// No more input will arrive (end of input, or the script ran out).
    #[error("prompt input closed")]
    Closed,
    #[error("prompt I/O failed: {0}")]
    Io(String),
}

impl From<dialoguer::Error> for PromptError {
    fn from(error: dialoguer::Error) -> Self {
        match error {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => PromptError::Closed,
            dialoguer::Error::IO(e) => PromptError::Io(e.to_string()),
        }
    }
}

pub trait PromptPort {
    /// Shows a line of output.
    fn show(&mut self, line: &str);
    /// Asks a question and blocks until the user answers. Answers may be empty.
    fn ask(&mut self, question: &str) -> Result<String, PromptError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl PromptPort for ConsolePrompt {
    fn show(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

type AskHook = Box<dyn FnMut(&str) + Send>;

#[derive(Default)]
struct Script {
    answers: VecDeque<String>,
    transcript: Vec<String>,
    questions: Vec<String>,
    on_ask: Option<AskHook>,
}

/// A prompt fed from a fixed list of answers. Clones share the same script.
#[derive(Clone, Default)]
pub struct ScriptedPrompt {
    script: Arc<Mutex<Script>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompt = Self::default();
        prompt.push_answers(answers);
        prompt
    }

    pub fn push_answers<I, S>(&self, answers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script.lock().answers.extend(answers.into_iter().map(Into::into));
    }

    /// Runs `hook` every time a question is asked, before it is answered.
    pub fn on_ask(&self, hook: impl FnMut(&str) + Send + 'static) {
        self.script.lock().on_ask = Some(Box::new(hook));
    }

    /// Every line shown so far.
    pub fn transcript(&self) -> Vec<String> {
        self.script.lock().transcript.clone()
    }

    /// Every question asked so far.
    pub fn questions(&self) -> Vec<String> {
        self.script.lock().questions.clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().answers.len()
    }

    /// Whether any shown line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.script.lock().transcript.iter().any(|line| line.contains(needle))
    }
}

impl PromptPort for ScriptedPrompt {
    fn show(&mut self, line: &str) {
        self.script.lock().transcript.push(line.to_string());
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        let hook = {
            let mut script = self.script.lock();
            script.questions.push(question.to_string());
            script.on_ask.take()
        };

        // The hook runs unlocked so it may feed this prompt.
        if let Some(mut hook) = hook {
            hook(question);
            let mut script = self.script.lock();
            if script.on_ask.is_none() {
                script.on_ask = Some(hook);
            }
        }

        self.script.lock().answers.pop_front().ok_or(PromptError::Closed)
    }
}
