#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use rdev::{Button, EventType, Key};
    use std::sync::Arc;
    use test_context::{test_context, TestContext};
    use ttrack::libs::clock::{Clock, ManualClock};
    use ttrack::libs::monitor::{InputMonitor, InputState};
    use ttrack::libs::signal::{self, PendingSignals, Signal, SignalReceiver};

    struct MonitorTestContext {
        clock: ManualClock,
        state: Arc<InputState>,
        monitor: InputMonitor,
        receiver: SignalReceiver,
    }

    impl TestContext for MonitorTestContext {
        fn setup() -> Self {
            let clock = ManualClock::new(start());
            let state = Arc::new(InputState::new(clock.now()));
            let (sender, receiver) = signal::channel();
            let monitor = InputMonitor::new(state.clone(), sender, Arc::new(clock.clone()));
            MonitorTestContext {
                clock,
                state,
                monitor,
                receiver,
            }
        }
    }

    impl MonitorTestContext {
        fn received(&mut self) -> Vec<Signal> {
            let mut signals = Vec::new();
            while let Ok(signal) = self.receiver.try_recv() {
                signals.push(signal);
            }
            signals
        }
    }

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    #[test_context(MonitorTestContext)]
    #[test]
    fn input_while_active_only_moves_the_timestamp(ctx: &mut MonitorTestContext) {
        ctx.clock.advance(TimeDelta::seconds(10));
        ctx.monitor.on_event(&EventType::KeyPress(Key::KeyA));
        ctx.clock.advance(TimeDelta::seconds(10));
        ctx.monitor.on_event(&EventType::ButtonPress(Button::Left));

        assert_eq!(ctx.state.last_input_time(), start() + TimeDelta::seconds(20));
        assert!(ctx.received().is_empty());
    }

    #[test_context(MonitorTestContext)]
    #[test]
    fn first_input_after_afk_wakes_exactly_once(ctx: &mut MonitorTestContext) {
        assert!(ctx.state.mark_afk());

        ctx.clock.advance(TimeDelta::seconds(120));
        ctx.monitor.on_event(&EventType::Wheel { delta_x: 0, delta_y: -1 });
        ctx.monitor.on_event(&EventType::KeyPress(Key::KeyB));
        ctx.monitor.on_event(&EventType::MouseMove { x: 10.0, y: 10.0 });

        assert!(!ctx.state.is_afk());
        assert_eq!(ctx.received(), vec![Signal::Wake]);
    }

    #[test_context(MonitorTestContext)]
    #[test]
    fn each_idle_gap_wakes_once(ctx: &mut MonitorTestContext) {
        for _ in 0..3 {
            ctx.state.mark_afk();
            ctx.monitor.on_event(&EventType::ButtonPress(Button::Right));
            ctx.monitor.on_event(&EventType::ButtonPress(Button::Right));
        }
        assert_eq!(ctx.received(), vec![Signal::Wake, Signal::Wake, Signal::Wake]);
    }

    #[test_context(MonitorTestContext)]
    #[test]
    fn f1_requests_the_menu(ctx: &mut MonitorTestContext) {
        ctx.monitor.on_event(&EventType::KeyPress(Key::F1));
        ctx.monitor.on_event(&EventType::KeyRelease(Key::F1));
        assert_eq!(ctx.received(), vec![Signal::MenuRequested]);
    }

    #[test_context(MonitorTestContext)]
    #[test]
    fn f1_after_afk_wakes_and_requests_menu(ctx: &mut MonitorTestContext) {
        ctx.state.mark_afk();
        ctx.monitor.on_event(&EventType::KeyPress(Key::F1));

        let mut pending = PendingSignals::default();
        for signal in ctx.received() {
            pending.absorb(signal);
        }
        assert!(pending.wake);
        assert!(pending.menu);
    }

    #[test_context(MonitorTestContext)]
    #[test]
    fn dropped_receiver_is_tolerated(ctx: &mut MonitorTestContext) {
        ctx.receiver.close();
        ctx.state.mark_afk();
        ctx.monitor.on_event(&EventType::KeyPress(Key::F1));
        assert!(!ctx.state.is_afk());
    }
}
