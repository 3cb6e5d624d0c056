//! Splits the stream of window samples into activities.
//!
//! At most one segment is open at a time. A segment records the task that
//! was current when it opened, so a later task switch never re-attributes
//! time that was already spent.

use super::activity::Activity;
use super::messages::Message;
use super::window::WindowSample;
use crate::db::storage::Storage;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use chrono::NaiveDateTime;

/// The interval currently being tracked, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySegment {
    pub app_name: String,
    pub window_title: String,
    pub start_time: NaiveDateTime,
    pub task_id: Option<i64>,
}

impl ActivitySegment {
    fn matches(&self, sample: &WindowSample) -> bool {
        self.app_name == sample.app_name && self.window_title == sample.window_title
    }
}

#[derive(Debug, Default)]
pub struct ActivitySegmenter {
    current: Option<ActivitySegment>,
}

impl ActivitySegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&ActivitySegment> {
        self.current.as_ref()
    }

    /// `true` when a segment is open and `sample` is a different window.
    pub fn differs_from(&self, sample: &WindowSample) -> bool {
        self.current.as_ref().is_some_and(|segment| !segment.matches(sample))
    }

    /// Feeds one sample. Opens a segment if none is open, extends the open
    /// one if the window is unchanged, and otherwise closes it at `now` and
    /// opens a new one.
    ///
    /// Returns the activity closed by this call, if any.
    pub fn observe(
        &mut self,
        sample: &WindowSample,
        task_id: Option<i64>,
        now: NaiveDateTime,
        storage: &dyn Storage,
    ) -> Result<Option<Activity>> {
        if self.current.as_ref().is_some_and(|segment| segment.matches(sample)) {
            return Ok(None);
        }
        let closed = self.close(now, storage)?;

        msg_debug!(format!("Segment opened: '{}' / '{}'", sample.app_name, sample.window_title));
        self.current = Some(ActivitySegment {
            app_name: sample.app_name.clone(),
            window_title: sample.window_title.clone(),
            start_time: now,
            task_id,
        });
        Ok(closed)
    }

    /// Closes the open segment at `now`, regardless of what is on screen.
    ///
    /// The segment is cleared even when nothing gets stored: blank
    /// application names and segments without a task are dropped.
    pub fn close(&mut self, now: NaiveDateTime, storage: &dyn Storage) -> Result<Option<Activity>> {
        let Some(segment) = self.current.take() else {
            return Ok(None);
        };

        if segment.app_name.trim().is_empty() {
            msg_debug!(Message::ActivityDiscardedBlankApp);
            return Ok(None);
        }

        let Some(task_id) = segment.task_id else {
            msg_warning!(Message::ActivityDiscardedNoTask(segment.app_name));
            return Ok(None);
        };

        let mut activity = Activity {
            id: None,
            task_id,
            app_name: segment.app_name,
            window_title: segment.window_title,
            start_time: segment.start_time,
            end_time: now.max(segment.start_time),
        };

        match storage.add_activity(&activity)? {
            Some(id) => {
                activity.id = Some(id);
                msg_debug!(Message::ActivityLogged {
                    app_name: activity.app_name.clone(),
                    window_title: activity.window_title.clone(),
                    task_id,
                });
                Ok(Some(activity))
            }
            None => Ok(None),
        }
    }
}
