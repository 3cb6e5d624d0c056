//! Configuration management for ttrack.
//!
//! Settings are stored as pretty-printed JSON in the platform data directory
//! (see [`DataStorage`]). A missing file is not an error: every section falls
//! back to its defaults, so the tracker runs without any setup.
//!
//! ```rust,no_run
//! use ttrack::libs::config::Config;
//!
//! let config = Config::read()?;
//! let tracker = config.tracker.unwrap_or_default();
//! println!("AFK after {}s", tracker.afk_timeout);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use chrono::TimeDelta;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Upper bound for every timing setting: one week.
pub const MAX_TIMING_SECS: u64 = 7 * 24 * 60 * 60;

/// Timing of the tracking loop, all values in seconds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Pause between two ticks of the tracking loop.
    pub tick_interval: u64,
    /// Input silence after which the user is considered away.
    pub afk_timeout: u64,
    /// Interval of the periodic "what are you working on" prompt.
    pub checkin_interval: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            tick_interval: 5,
            afk_timeout: 60,
            checkin_interval: 1800,
        }
    }
}

impl TrackerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval)
    }

    pub fn afk_timeout(&self) -> TimeDelta {
        seconds(self.afk_timeout)
    }

    pub fn checkin_interval(&self) -> TimeDelta {
        seconds(self.checkin_interval)
    }

    /// Rejects settings the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tick interval", self.tick_interval),
            ("AFK timeout", self.afk_timeout),
            ("check-in interval", self.checkin_interval),
        ] {
            if value > MAX_TIMING_SECS {
                return Err(msg_error_anyhow!(Message::InvalidTrackerConfig(format!(
                    "{} must not exceed {} seconds",
                    name, MAX_TIMING_SECS
                ))));
            }
        }
        if self.tick_interval == 0 {
            return Err(msg_error_anyhow!(Message::InvalidTrackerConfig("tick interval must be positive".to_string())));
        }
        if self.afk_timeout == 0 {
            return Err(msg_error_anyhow!(Message::InvalidTrackerConfig("AFK timeout must be positive".to_string())));
        }
        if self.checkin_interval == 0 {
            return Err(msg_error_anyhow!(Message::InvalidTrackerConfig("check-in interval must be positive".to_string())));
        }
        Ok(())
    }
}

/// Saturates instead of overflowing for values `validate` would reject.
fn seconds(secs: u64) -> TimeDelta {
    i64::try_from(secs).ok().and_then(TimeDelta::try_seconds).unwrap_or(TimeDelta::MAX)
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,
}

impl Config {
    /// Loads the configuration from the data directory.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file if there is one.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Interactive wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let default = config.tracker.clone().unwrap_or_default();

        msg_print!(Message::ConfigModuleTracker);
        let tracker = TrackerConfig {
            tick_interval: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTickInterval.to_string())
                .default(default.tick_interval)
                .interact_text()?,
            afk_timeout: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptAfkTimeout.to_string())
                .default(default.afk_timeout)
                .interact_text()?,
            checkin_interval: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptCheckinInterval.to_string())
                .default(default.checkin_interval)
                .interact_text()?,
        };
        tracker.validate()?;
        config.tracker = Some(tracker);

        Ok(config)
    }
}
