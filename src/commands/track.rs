use crate::db::storage::SqliteStorage;
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::monitor::{self, InputMonitor, InputState};
use crate::libs::prompt::ConsolePrompt;
use crate::libs::signal::{self, Signal};
use crate::libs::tracker::Tracker;
use crate::libs::window::SystemWindowSampler;
use crate::{msg_error, msg_info};
use anyhow::Result;
use std::sync::Arc;

/// Tracks until Ctrl-C, then flushes the open activity and returns.
pub async fn cmd() -> Result<()> {
    let config = Config::read()?.tracker.unwrap_or_default();
    config.validate()?;
    let storage = SqliteStorage::new()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let input = Arc::new(InputState::new(clock.now()));
    let (signals, receiver) = signal::channel();

    msg_info!(Message::TrackingStarted, true);
    monitor::attach(InputMonitor::new(input.clone(), signals.clone(), clock.clone()));

    let ctrl_c = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                msg_info!(Message::TrackingInterrupted, true);
                let _ = signals.send(Signal::Stop);
            }
            Err(e) => msg_error!(Message::CtrlCListenFailed(e.to_string())),
        }
    });

    let mut tracker = Tracker::new(
        config,
        storage,
        ConsolePrompt,
        Box::new(SystemWindowSampler::new()),
        clock,
        input,
        receiver,
    );
    let result = tracker.run().await;

    ctrl_c.abort();
    monitor::detach();
    result
}
