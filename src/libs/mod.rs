//! Core library modules.
//!
//! The tracking loop lives in [`tracker`]; it drives [`segmenter`],
//! [`rule`] and [`coordinator`] and is fed by [`monitor`] and [`window`].
//! The remaining modules are shared infrastructure.

pub mod activity;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod data_storage;
pub mod formatter;
pub mod logging;
pub mod messages;
pub mod monitor;
pub mod project;
pub mod prompt;
pub mod rule;
pub mod segmenter;
pub mod signal;
pub mod task;
pub mod tracker;
pub mod view;
pub mod window;
