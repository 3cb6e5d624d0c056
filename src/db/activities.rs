use crate::libs::activity::{Activity, ActivityRecord};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection};

const INSERT_ACTIVITY: &str = "INSERT INTO activities (task_id, app_name, window_title, start_time, end_time) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_DAILY_ACTIVITIES: &str = "SELECT a.id, a.task_id, a.app_name, a.window_title, a.start_time, a.end_time, p.name, t.name
    FROM activities a
    JOIN tasks t ON a.task_id = t.id
    JOIN projects p ON t.project_id = p.id
    WHERE date(a.start_time) = ?1
    ORDER BY a.start_time ASC, a.id ASC";

pub struct Activities<'a> {
    conn: &'a Connection,
}

impl<'a> Activities<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Stores a closed activity. Blank application names are skipped and yield `None`.
    pub fn insert(&self, activity: &Activity) -> Result<Option<i64>> {
        if !activity.has_app_name() {
            return Ok(None);
        }

        self.conn.execute(
            INSERT_ACTIVITY,
            params![
                activity.task_id,
                activity.app_name,
                activity.window_title,
                activity.start_time,
                activity.end_time
            ],
        )?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    /// Activities that started on `date`, in chronological order.
    pub fn fetch_for_date(&self, date: NaiveDate) -> Result<Vec<ActivityRecord>> {
        let mut stmt = self.conn.prepare(SELECT_DAILY_ACTIVITIES)?;
        let records = stmt
            .query_map(params![date], |row| {
                Ok(ActivityRecord {
                    activity: Activity {
                        id: row.get(0)?,
                        task_id: row.get(1)?,
                        app_name: row.get(2)?,
                        window_title: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        start_time: row.get(4)?,
                        end_time: row.get(5)?,
                    },
                    project_name: row.get(6)?,
                    task_name: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
