#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use parking_lot::Mutex;
    use rdev::{EventType, Key};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use test_context::{test_context, TestContext};
    use ttrack::db::storage::{SqliteStorage, Storage};
    use ttrack::libs::activity::ActivityRecord;
    use ttrack::libs::clock::{Clock, ManualClock};
    use ttrack::libs::config::TrackerConfig;
    use ttrack::libs::monitor::{InputMonitor, InputState};
    use ttrack::libs::prompt::{PromptError, ScriptedPrompt};
    use ttrack::libs::signal::{self, Signal, SignalSender};
    use ttrack::libs::tracker::Tracker;
    use ttrack::libs::window::{SampleError, WindowSample, WindowSampler, NO_ACTIVE_WINDOW};

    /// A foreground window the test moves around by hand.
    #[derive(Clone, Default)]
    struct SharedWindow {
        current: Arc<Mutex<Option<WindowSample>>>,
        failing: Arc<AtomicBool>,
        wake_on_sample: Arc<Mutex<Option<SignalSender>>>,
    }

    impl SharedWindow {
        fn show(&self, app: &str, title: &str) {
            *self.current.lock() = Some(WindowSample::new(app, title));
        }

        fn fail(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }
    }

    impl WindowSampler for SharedWindow {
        fn active_window(&mut self) -> Result<Option<WindowSample>, SampleError> {
            if let Some(signals) = self.wake_on_sample.lock().take() {
                signals.send(Signal::Wake).unwrap();
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(SampleError::Query("display unavailable".to_string()));
            }
            Ok(self.current.lock().clone())
        }
    }

    struct TrackerContext {
        clock: ManualClock,
        window: SharedWindow,
        prompt: ScriptedPrompt,
        input: Arc<InputState>,
        signals: SignalSender,
        tracker: Tracker<SqliteStorage, ScriptedPrompt>,
    }

    impl TestContext for TrackerContext {
        fn setup() -> Self {
            let clock = ManualClock::new(day().and_hms_opt(9, 0, 0).unwrap());
            let window = SharedWindow::default();
            let prompt = ScriptedPrompt::new(["Alpha", "Coding"]);
            let input = Arc::new(InputState::new(clock.now()));
            let (signals, receiver) = signal::channel();

            let mut tracker = Tracker::new(
                TrackerConfig::default(),
                SqliteStorage::in_memory().unwrap(),
                prompt.clone(),
                Box::new(window.clone()),
                Arc::new(clock.clone()),
                input.clone(),
                receiver,
            );
            tracker.start().unwrap();

            TrackerContext {
                clock,
                window,
                prompt,
                input,
                signals,
                tracker,
            }
        }
    }

    impl TrackerContext {
        fn at(&self, secs: i64) -> NaiveDateTime {
            day().and_hms_opt(9, 0, 0).unwrap() + TimeDelta::seconds(secs)
        }

        /// Moves the clock to `secs` after the start and runs one tick.
        fn tick_at(&mut self, secs: i64) {
            self.clock.set(self.at(secs));
            self.tracker.tick().unwrap();
        }

        fn touch(&self) {
            self.input.record_input(self.clock.now());
        }

        fn activities(&self) -> Vec<ActivityRecord> {
            self.tracker.storage().activities_for_date(day()).unwrap()
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test_context(TrackerContext)]
    #[test]
    fn welcome_prompt_seeds_project_and_task(ctx: &mut TrackerContext) {
        let state = ctx.tracker.state();
        let storage = ctx.tracker.storage();

        assert_eq!(storage.project_name(state.current_project_id.unwrap()).unwrap(), "Alpha");
        assert_eq!(storage.task_name(state.current_task_id.unwrap()).unwrap(), "Coding");
        assert!(ctx.prompt.saw("Welcome!"));
        assert!(ctx.prompt.saw("Now tracking for Project: Alpha, Task: Coding"));
        assert!(ctx.tracker.current_segment().is_none());
    }

    #[test_context(TrackerContext)]
    #[test]
    fn same_window_yields_one_activity(ctx: &mut TrackerContext) {
        ctx.window.show("chrome", "x");
        for secs in [0, 5, 10, 15] {
            ctx.tick_at(secs);
        }
        assert!(ctx.activities().is_empty());

        ctx.tracker.shutdown().unwrap();

        let activities = ctx.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity.start_time, ctx.at(0));
        assert_eq!(activities[0].activity.end_time, ctx.at(15));
        assert_eq!(activities[0].task_name, "Coding");
        assert!(ctx.tracker.current_segment().is_none());
    }

    #[test_context(TrackerContext)]
    #[test]
    fn switching_back_and_forth_splits_segments(ctx: &mut TrackerContext) {
        ctx.window.show("chrome", "A");
        ctx.tick_at(0);
        ctx.window.show("code", "B");
        ctx.tick_at(5);
        ctx.window.show("chrome", "A");
        ctx.tick_at(10);

        let activities = ctx.activities();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].activity.window_title, "A");
        assert_eq!((activities[0].activity.start_time, activities[0].activity.end_time), (ctx.at(0), ctx.at(5)));
        assert_eq!(activities[1].activity.window_title, "B");
        assert_eq!((activities[1].activity.start_time, activities[1].activity.end_time), (ctx.at(5), ctx.at(10)));

        let open = ctx.tracker.current_segment().unwrap();
        assert_eq!(open.window_title, "A");
        assert_eq!(open.start_time, ctx.at(10));
    }

    #[test_context(TrackerContext)]
    #[test]
    fn going_afk_closes_the_segment_once(ctx: &mut TrackerContext) {
        ctx.window.show("chrome", "x");
        ctx.tick_at(0);
        ctx.tick_at(5);
        ctx.tick_at(65);

        assert!(ctx.tracker.state().is_afk());
        assert!(ctx.tracker.current_segment().is_none());

        // Idle ticks neither sample nor write.
        ctx.window.show("code", "y");
        ctx.tick_at(70);
        ctx.tick_at(200);
        assert!(ctx.tracker.current_segment().is_none());

        let activities = ctx.activities();
        assert_eq!(activities.len(), 1);
        let activity = &activities[0].activity;
        assert_eq!(activity.app_name, "chrome");
        assert_eq!(activity.window_title, "x");
        assert_eq!(activity.start_time, ctx.at(0));
        assert_eq!(activity.end_time, ctx.at(65));

        ctx.tracker.shutdown().unwrap();
        assert_eq!(ctx.activities().len(), 1);
    }

    #[test_context(TrackerContext)]
    #[test]
    fn afk_threshold_is_strict(ctx: &mut TrackerContext) {
        ctx.window.show("chrome", "x");
        ctx.tick_at(60);
        assert!(!ctx.tracker.state().is_afk());
        ctx.tick_at(61);
        assert!(ctx.tracker.state().is_afk());
    }

    #[test_context(TrackerContext)]
    #[test]
    fn coming_back_asks_welcome_back(ctx: &mut TrackerContext) {
        let monitor = InputMonitor::new(ctx.input.clone(), ctx.signals.clone(), Arc::new(ctx.clock.clone()));
        ctx.window.show("chrome", "x");
        ctx.tick_at(0);
        ctx.tick_at(61);
        assert!(ctx.tracker.state().is_afk());

        ctx.clock.set(ctx.at(300));
        monitor.on_event(&EventType::KeyPress(Key::KeyA));
        monitor.on_event(&EventType::MouseMove { x: 3.0, y: 4.0 });
        assert!(!ctx.tracker.state().is_afk());

        ctx.prompt.push_answers(["1"]);
        ctx.tick_at(302);

        assert!(ctx.prompt.saw("Welcome back!"));
        assert_eq!(ctx.prompt.remaining(), 0);
        assert_eq!(ctx.tracker.state().last_checkin_time, ctx.at(302));
        assert_eq!(ctx.tracker.current_segment().unwrap().start_time, ctx.at(302));

        // The second event did not raise another wake.
        ctx.tick_at(307);
        assert_eq!(ctx.prompt.questions().iter().filter(|q| q.as_str() == ">").count(), 1);
    }

    #[test_context(TrackerContext)]
    #[test]
    fn check_in_timer_restarts_after_the_answer(ctx: &mut TrackerContext) {
        ctx.window.show("chrome", "x");
        ctx.tick_at(0);

        let clock = ctx.clock.clone();
        let input = ctx.input.clone();
        ctx.prompt.on_ask(move |_| {
            clock.advance(TimeDelta::seconds(20));
            input.record_input(clock.now());
        });
        ctx.prompt.push_answers(["1"]);

        ctx.clock.set(ctx.at(1801));
        ctx.touch();
        ctx.tracker.tick().unwrap();

        assert!(ctx.prompt.saw("Time for a check-in!"));
        assert_eq!(ctx.tracker.state().last_checkin_time, ctx.at(1821));

        // Continuing keeps the open segment.
        assert_eq!(ctx.tracker.current_segment().unwrap().start_time, ctx.at(0));
        assert!(ctx.activities().is_empty());

        ctx.touch();
        ctx.tick_at(1826);
        assert_eq!(ctx.prompt.remaining(), 0);
    }

    #[test_context(TrackerContext)]
    #[test]
    fn no_check_in_before_the_interval(ctx: &mut TrackerContext) {
        ctx.window.show("chrome", "x");
        ctx.tick_at(0);
        ctx.clock.set(ctx.at(1800));
        ctx.touch();
        ctx.tracker.tick().unwrap();
        assert!(!ctx.prompt.saw("Time for a check-in!"));
    }

    #[test_context(TrackerContext)]
    #[test]
    fn matching_rule_switches_task_and_suppresses_wake(ctx: &mut TrackerContext) {
        let (review, beta) = {
            let storage = ctx.tracker.storage();
            let beta = storage.get_or_create_project("Beta").unwrap();
            let review = storage.create_task(beta, "Review").unwrap();
            storage.add_rule("github", beta, Some(review)).unwrap();
            (review, beta)
        };
        let coding = ctx.tracker.state().current_task_id;

        ctx.window.show("firefox", "Inbox");
        ctx.tick_at(0);

        *ctx.window.wake_on_sample.lock() = Some(ctx.signals.clone());
        ctx.window.show("firefox", "Fix parser - GitHub");
        ctx.tick_at(5);

        assert_eq!(ctx.tracker.state().current_project_id, Some(beta));
        assert_eq!(ctx.tracker.state().current_task_id, Some(review));

        let activities = ctx.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(Some(activities[0].activity.task_id), coding);
        assert_eq!(activities[0].activity.end_time, ctx.at(5));

        let open = ctx.tracker.current_segment().unwrap();
        assert_eq!(open.task_id, Some(review));
        assert_eq!(open.start_time, ctx.at(5));

        // The wake raised mid-tick was absorbed by the rule; no prompt follows.
        ctx.tick_at(10);
        assert!(!ctx.prompt.saw("Welcome back!"));
    }

    #[test_context(TrackerContext)]
    #[test]
    fn rule_switch_keeps_an_unchanged_window_on_its_original_task(ctx: &mut TrackerContext) {
        let coding = ctx.tracker.state().current_task_id;
        ctx.window.show("firefox", "Fix parser - GitHub");
        ctx.tick_at(0);

        let (beta, review) = {
            let storage = ctx.tracker.storage();
            let beta = storage.get_or_create_project("Beta").unwrap();
            let review = storage.create_task(beta, "Review").unwrap();
            storage.add_rule("github", beta, Some(review)).unwrap();
            (beta, review)
        };
        ctx.tick_at(5);

        assert_eq!(ctx.tracker.state().current_project_id, Some(beta));
        assert_eq!(ctx.tracker.state().current_task_id, Some(review));
        let open = ctx.tracker.current_segment().unwrap();
        assert_eq!(open.start_time, ctx.at(0));
        assert_eq!(open.task_id, coding);
        assert!(ctx.activities().is_empty());

        ctx.window.show("kitty", "Terminal");
        ctx.tick_at(10);

        let activities = ctx.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].task_name, "Coding");
        assert_eq!(activities[0].activity.start_time, ctx.at(0));
        assert_eq!(activities[0].activity.end_time, ctx.at(10));
        assert_eq!(ctx.tracker.current_segment().unwrap().task_id, Some(review));
    }

    #[test_context(TrackerContext)]
    #[test]
    fn project_only_rule_without_open_tasks_asks_for_one(ctx: &mut TrackerContext) {
        let gamma = {
            let storage = ctx.tracker.storage();
            let gamma = storage.get_or_create_project("Gamma").unwrap();
            storage.add_rule("gamma board", gamma, None).unwrap();
            gamma
        };

        ctx.window.show("kitty", "Terminal");
        ctx.tick_at(0);

        // Projects are listed by name: Alpha, Gamma.
        ctx.prompt.push_answers(["2", "Planning"]);
        ctx.window.show("firefox", "Gamma Board - Sprint 4");
        ctx.tick_at(5);

        assert!(ctx.prompt.saw("Pick a task!"));
        assert_eq!(ctx.prompt.remaining(), 0);
        let state = ctx.tracker.state();
        assert_eq!(state.current_project_id, Some(gamma));
        assert_eq!(ctx.tracker.storage().task_name(state.current_task_id.unwrap()).unwrap(), "Planning");

        let activities = ctx.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].task_name, "Coding");
        assert_eq!(activities[0].activity.end_time, ctx.at(5));

        let open = ctx.tracker.current_segment().unwrap();
        assert_eq!(open.task_id, state.current_task_id);
        assert_eq!(open.start_time, ctx.at(5));
    }

    #[test_context(TrackerContext)]
    #[test]
    fn rule_already_in_effect_changes_nothing(ctx: &mut TrackerContext) {
        let (project, task) = (ctx.tracker.state().current_project_id.unwrap(), ctx.tracker.state().current_task_id);
        ctx.tracker.storage().add_rule("terminal", project, task).unwrap();

        ctx.window.show("kitty", "Terminal");
        ctx.tick_at(0);
        ctx.tick_at(5);

        assert_eq!(ctx.tracker.current_segment().unwrap().start_time, ctx.at(0));
        assert!(ctx.activities().is_empty());
    }

    #[test_context(TrackerContext)]
    #[test]
    fn project_only_rule_picks_latest_open_task(ctx: &mut TrackerContext) {
        let docs = {
            let storage = ctx.tracker.storage();
            let beta = storage.get_or_create_project("Beta").unwrap();
            storage.create_task(beta, "Draft").unwrap();
            let docs = storage.create_task(beta, "Docs").unwrap();
            storage.add_rule("confluence", beta, None).unwrap();
            docs
        };

        ctx.window.show("firefox", "Confluence - Home");
        ctx.tick_at(0);
        assert_eq!(ctx.tracker.state().current_task_id, Some(docs));
        assert_eq!(ctx.tracker.current_segment().unwrap().task_id, Some(docs));
    }

    #[test_context(TrackerContext)]
    #[test]
    fn failed_sample_records_no_active_window(ctx: &mut TrackerContext) {
        ctx.window.fail();
        ctx.tick_at(0);

        let open = ctx.tracker.current_segment().unwrap();
        assert_eq!(open.app_name, NO_ACTIVE_WINDOW);
        assert_eq!(open.window_title, "");
    }

    #[test_context(TrackerContext)]
    #[test]
    fn missing_window_records_no_active_window(ctx: &mut TrackerContext) {
        ctx.tick_at(0);
        assert_eq!(ctx.tracker.current_segment().unwrap().app_name, NO_ACTIVE_WINDOW);
    }

    #[test_context(TrackerContext)]
    #[test]
    fn menu_hotkey_changes_task_and_closes_segment(ctx: &mut TrackerContext) {
        let monitor = InputMonitor::new(ctx.input.clone(), ctx.signals.clone(), Arc::new(ctx.clock.clone()));
        ctx.window.show("chrome", "x");
        ctx.tick_at(0);

        ctx.clock.set(ctx.at(4));
        monitor.on_event(&EventType::KeyPress(Key::F1));
        ctx.prompt.push_answers(["3", "Testing"]);
        ctx.tick_at(5);

        assert!(ctx.prompt.saw("Menu requested!"));
        assert_eq!(ctx.tracker.storage().task_name(ctx.tracker.state().current_task_id.unwrap()).unwrap(), "Testing");

        let activities = ctx.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].task_name, "Coding");
        assert_eq!(activities[0].activity.end_time, ctx.at(5));

        let open = ctx.tracker.current_segment().unwrap();
        assert_eq!(open.start_time, ctx.at(5));
        assert_ne!(open.task_id, Some(activities[0].activity.task_id));
    }

    #[test_context(TrackerContext)]
    #[test]
    fn exhausted_input_ends_the_tick_with_an_error(ctx: &mut TrackerContext) {
        ctx.signals.send(Signal::MenuRequested).unwrap();
        ctx.clock.set(ctx.at(5));
        let err = ctx.tracker.tick().unwrap_err();
        assert!(matches!(err.downcast_ref::<PromptError>(), Some(PromptError::Closed)));
    }

    #[tokio::test]
    async fn stop_signal_ends_run_and_flushes() {
        let mut ctx = TrackerContext::setup();
        ctx.window.show("chrome", "x");
        ctx.tick_at(0);

        ctx.clock.set(ctx.at(3));
        ctx.prompt.push_answers(["1"]);
        ctx.signals.send(Signal::Stop).unwrap();
        ctx.tracker.run().await.unwrap();

        let activities = ctx.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity.end_time, ctx.at(3));
        assert!(ctx.tracker.stop_requested());
    }
}
