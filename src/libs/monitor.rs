//! Global keyboard and pointer observation.
//!
//! The rdev listener runs on a dedicated OS thread and only touches
//! [`InputState`] and the signal channel. It never classifies, segments or
//! writes to storage; that is the tracking loop's job.
//!
//! `rdev::listen` cannot be stopped once started, so the thread is spawned
//! once per process and tracking sessions [`attach`] and [`detach`] the
//! monitor that receives its events.

use super::clock::Clock;
use super::messages::Message;
use super::signal::{Signal, SignalSender};
use crate::{msg_debug, msg_error, msg_info};
use chrono::{DateTime, NaiveDateTime};
use parking_lot::Mutex;
use rdev::{listen, Event, EventType, Key};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// The hotkey that asks for an out-of-band prompt.
pub const MENU_HOTKEY: Key = Key::F1;

/// Input bookkeeping shared between the listener thread and the tracker.
///
/// The timestamp is last-writer-wins. The AFK flag is only ever cleared with
/// an atomic swap so exactly one input event observes the AFK to active edge.
#[derive(Debug)]
pub struct InputState {
    last_input_ms: AtomicI64,
    afk: AtomicBool,
}

impl InputState {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            last_input_ms: AtomicI64::new(to_millis(now)),
            afk: AtomicBool::new(false),
        }
    }

    /// Records an input event. Returns `true` if this event ended an AFK period.
    pub fn record_input(&self, now: NaiveDateTime) -> bool {
        self.last_input_ms.store(to_millis(now), Ordering::SeqCst);
        self.afk.swap(false, Ordering::SeqCst)
    }

    /// Enters the AFK state. Returns `false` if it was already entered.
    pub fn mark_afk(&self) -> bool {
        !self.afk.swap(true, Ordering::SeqCst)
    }

    pub fn is_afk(&self) -> bool {
        self.afk.load(Ordering::SeqCst)
    }

    pub fn last_input_time(&self) -> NaiveDateTime {
        from_millis(self.last_input_ms.load(Ordering::SeqCst))
    }
}

fn to_millis(time: NaiveDateTime) -> i64 {
    time.and_utc().timestamp_millis()
}

fn from_millis(ms: i64) -> NaiveDateTime {
    DateTime::from_timestamp_millis(ms).map(|t| t.naive_utc()).unwrap_or_default()
}

/// Turns raw input events into [`InputState`] updates and signals.
pub struct InputMonitor {
    state: Arc<InputState>,
    signals: SignalSender,
    clock: Arc<dyn Clock>,
}

impl InputMonitor {
    pub fn new(state: Arc<InputState>, signals: SignalSender, clock: Arc<dyn Clock>) -> Self {
        Self { state, signals, clock }
    }

    pub fn on_event(&self, event: &EventType) {
        match event {
            EventType::KeyPress(key) => {
                self.on_input();
                if *key == MENU_HOTKEY {
                    msg_info!(Message::MenuHotkeyPressed);
                    self.send(Signal::MenuRequested);
                }
            }
            EventType::ButtonPress(_) | EventType::MouseMove { .. } | EventType::Wheel { .. } => self.on_input(),
            _ => {}
        }
    }

    fn on_input(&self) {
        if self.state.record_input(self.clock.now()) {
            msg_info!(Message::UserIsBack);
            self.send(Signal::Wake);
        }
    }

    fn send(&self, signal: Signal) {
        // The receiver is gone once tracking has ended; nothing to tell.
        if self.signals.send(signal).is_err() {
            msg_debug!(format!("Dropped {:?}: tracker is not running", signal));
        }
    }
}

type MonitorSlot = Arc<Mutex<Option<InputMonitor>>>;

static LISTENER: OnceLock<MonitorSlot> = OnceLock::new();

fn listener_slot() -> &'static MonitorSlot {
    LISTENER.get_or_init(|| {
        let slot: MonitorSlot = Arc::new(Mutex::new(None));
        let shared = slot.clone();
        std::thread::spawn(move || loop {
            let for_listener = shared.clone();
            let result = listen(move |event: Event| {
                if let Some(monitor) = for_listener.lock().as_ref() {
                    monitor.on_event(&event.event_type);
                }
            });
            match result {
                Err(e) => {
                    msg_error!(Message::ErrorInRdevListener(format!("{:?}", e)));
                    std::thread::sleep(Duration::from_secs(1));
                }
                Ok(()) => break,
            }
        });
        msg_info!(Message::InputListenersStarted);
        slot
    })
}

/// Routes global input events to `monitor`, starting the listener thread on first use.
pub fn attach(monitor: InputMonitor) {
    *listener_slot().lock() = Some(monitor);
}

/// Stops routing input events. The listener thread keeps running.
pub fn detach() {
    if let Some(slot) = LISTENER.get() {
        slot.lock().take();
    }
}
