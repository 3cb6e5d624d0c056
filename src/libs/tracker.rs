//! The tracking loop.
//!
//! Every tick runs the same fixed sequence: pending signals, AFK check,
//! check-in, window sample, rule classification and segmentation. Ticks
//! never overlap and prompts block the loop until they resolve. The loop is
//! the only writer to storage.

use super::clock::Clock;
use super::config::TrackerConfig;
use super::coordinator::{PromptCoordinator, PromptReason};
use super::messages::Message;
use super::monitor::InputState;
use super::prompt::PromptPort;
use super::rule::{Rule, RuleMatcher};
use super::segmenter::{ActivitySegment, ActivitySegmenter};
use super::signal::{PendingSignals, Signal, SignalReceiver};
use super::window::{WindowSample, WindowSampler};
use crate::db::storage::Storage;
use crate::{msg_debug, msg_error, msg_info, msg_warning};
use anyhow::Result;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// What the tracker knows about the user between ticks.
///
/// The AFK flag and the last input time live in the shared [`InputState`]
/// because the input listener writes them; everything else is owned here.
#[derive(Debug)]
pub struct TrackerState {
    pub current_project_id: Option<i64>,
    pub current_task_id: Option<i64>,
    pub last_checkin_time: NaiveDateTime,
    input: Arc<InputState>,
}

impl TrackerState {
    pub fn new(input: Arc<InputState>, now: NaiveDateTime) -> Self {
        Self {
            current_project_id: None,
            current_task_id: None,
            last_checkin_time: now,
            input,
        }
    }

    pub fn is_afk(&self) -> bool {
        self.input.is_afk()
    }

    pub fn last_input_time(&self) -> NaiveDateTime {
        self.input.last_input_time()
    }

    fn selection(&self) -> (Option<i64>, Option<i64>) {
        (self.current_project_id, self.current_task_id)
    }
}

enum Wakeup {
    Tick,
    Signal(Option<Signal>),
}

pub struct Tracker<S: Storage, P: PromptPort> {
    config: TrackerConfig,
    storage: S,
    coordinator: PromptCoordinator<P>,
    sampler: Box<dyn WindowSampler>,
    clock: Arc<dyn Clock>,
    state: TrackerState,
    segmenter: ActivitySegmenter,
    signals: SignalReceiver,
    pending: PendingSignals,
}

impl<S: Storage, P: PromptPort> Tracker<S, P> {
    pub fn new(
        config: TrackerConfig,
        storage: S,
        prompt: P,
        sampler: Box<dyn WindowSampler>,
        clock: Arc<dyn Clock>,
        input: Arc<InputState>,
        signals: SignalReceiver,
    ) -> Self {
        let state = TrackerState::new(input, clock.now());
        Self {
            config,
            storage,
            coordinator: PromptCoordinator::new(prompt),
            sampler,
            clock,
            state,
            segmenter: ActivitySegmenter::new(),
            signals,
            pending: PendingSignals::default(),
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn prompt(&self) -> &P {
        self.coordinator.port()
    }

    pub fn current_segment(&self) -> Option<&ActivitySegment> {
        self.segmenter.current()
    }

    /// Whether the loop has seen a stop request.
    pub fn stop_requested(&self) -> bool {
        self.pending.stop
    }

    /// Seeds the current project and task with the welcome prompt.
    pub fn start(&mut self) -> Result<()> {
        self.run_prompt(PromptReason::Welcome)
    }

    /// Runs one iteration of the loop.
    pub fn tick(&mut self) -> Result<()> {
        self.pending.drain(&mut self.signals);

        if self.pending.take_wake() {
            self.run_prompt(PromptReason::WelcomeBack)?;
        }
        if self.pending.take_menu() {
            self.run_prompt(PromptReason::MenuRequested)?;
        }

        let now = self.clock.now();
        if !self.state.is_afk() && now - self.state.last_input_time() > self.config.afk_timeout() {
            self.enter_afk(now)?;
            return Ok(());
        }
        if self.state.is_afk() {
            return Ok(());
        }

        if now - self.state.last_checkin_time > self.config.checkin_interval() {
            self.run_prompt(PromptReason::CheckIn)?;
        }

        let sample = self.sample();
        self.classify(&sample, self.clock.now())?;
        // Classification may have prompted.
        let now = self.clock.now();
        self.segmenter.observe(&sample, self.state.current_task_id, now, &self.storage)?;
        Ok(())
    }

    /// Flushes the open segment unless the user is away.
    pub fn shutdown(&mut self) -> Result<()> {
        msg_info!(Message::TrackerStopping, true);
        if self.segmenter.is_open() && !self.state.is_afk() {
            self.segmenter.close(self.clock.now(), &self.storage)?;
        }
        msg_info!(Message::TrackerStopped);
        Ok(())
    }

    /// Runs the welcome prompt, then ticks every `tick_interval` until a
    /// [`Signal::Stop`] arrives. Signals are picked up between ticks.
    pub async fn run(&mut self) -> Result<()> {
        self.start()?;

        let mut interval = time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        let mut signals_open = true;
        while !self.pending.stop {
            let wakeup = tokio::select! {
                _ = interval.tick() => Wakeup::Tick,
                signal = self.signals.recv(), if signals_open => Wakeup::Signal(signal),
            };

            match wakeup {
                Wakeup::Tick => self.tick_or_flush()?,
                Wakeup::Signal(Some(signal)) => {
                    debug!(?signal, "signal received");
                    self.pending.absorb(signal);
                }
                Wakeup::Signal(None) => signals_open = false,
            }
        }

        self.shutdown()
    }

    /// Like [`Tracker::tick`], but a failed tick still saves the open
    /// segment before the error is returned.
    fn tick_or_flush(&mut self) -> Result<()> {
        let result = self.tick();
        if result.is_err() && self.segmenter.is_open() && !self.state.is_afk() {
            if let Err(e) = self.segmenter.close(self.clock.now(), &self.storage) {
                msg_error!(Message::ActivityFlushFailed(e.to_string()));
            }
        }
        result
    }

    fn run_prompt(&mut self, reason: PromptReason) -> Result<()> {
        let (project_id, task_id) = self.state.selection();
        let (new_project_id, new_task_id) = self.coordinator.resolve(&self.storage, reason, project_id, task_id)?;

        if (Some(new_project_id), Some(new_task_id)) != (project_id, task_id) && self.segmenter.is_open() {
            self.segmenter.close(self.clock.now(), &self.storage)?;
        }

        self.state.current_project_id = Some(new_project_id);
        self.state.current_task_id = Some(new_task_id);
        self.coordinator.confirm(&self.storage, new_project_id, new_task_id)?;

        // Time spent answering does not count towards the next check-in.
        self.state.last_checkin_time = self.clock.now();
        info!(%reason, project_id = new_project_id, task_id = new_task_id, "prompt resolved");
        Ok(())
    }

    fn enter_afk(&mut self, now: NaiveDateTime) -> Result<()> {
        if !self.state.input.mark_afk() {
            return Ok(());
        }
        msg_info!(Message::UserIsAfk, true);
        info!(last_input = %self.state.last_input_time(), "user went AFK");
        self.segmenter.close(now, &self.storage)?;
        Ok(())
    }

    fn sample(&mut self) -> WindowSample {
        match self.sampler.active_window() {
            Ok(Some(sample)) => sample,
            Ok(None) => WindowSample::no_active_window(),
            Err(e) => {
                msg_debug!(Message::WindowSampleFailed(e.to_string()));
                WindowSample::no_active_window()
            }
        }
    }

    /// Applies the first matching rule, if it points somewhere new.
    fn classify(&mut self, sample: &WindowSample, now: NaiveDateTime) -> Result<()> {
        let rules = self.storage.get_rules()?;
        let Some(rule) = RuleMatcher::first_match(&rules, &sample.window_title) else {
            return Ok(());
        };

        let target = (Some(rule.project_id), self.rule_task(rule)?);
        if target == self.state.selection() {
            return Ok(());
        }

        msg_info!(
            Message::RuleMatched {
                pattern: rule.pattern.clone(),
                project: rule.project_name.clone(),
                task: rule.task_name.clone(),
            },
            true
        );
        (self.state.current_project_id, self.state.current_task_id) = target;

        // A rule settles the question a pending wake prompt would ask.
        self.pending.drain(&mut self.signals);
        self.pending.wake = false;

        if self.segmenter.differs_from(sample) {
            self.segmenter.close(now, &self.storage)?;
        }

        if self.state.current_task_id.is_none() {
            msg_warning!(Message::RuleWithoutOpenTask(rule.project_name.clone()));
            self.run_prompt(PromptReason::TaskNeeded)?;
        }
        Ok(())
    }

    /// The task a rule switches to. Project-only rules keep the current task
    /// when it already belongs to that project, and otherwise fall back to
    /// the project's most recent open task.
    fn rule_task(&self, rule: &Rule) -> Result<Option<i64>> {
        if rule.task_id.is_some() {
            return Ok(rule.task_id);
        }
        if self.state.current_project_id == Some(rule.project_id) && self.state.current_task_id.is_some() {
            return Ok(self.state.current_task_id);
        }
        let tasks = self.storage.get_active_tasks_for_project(rule.project_id)?;
        Ok(tasks.first().map(|task| task.id))
    }
}
