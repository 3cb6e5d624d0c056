use super::activity::ActivityRecord;
use super::formatter::{format_duration, format_time};
use super::rule::Rule;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn rules(rules: &[Rule]) {
        Self::rules_table(rules).printstd();
    }

    pub fn rules_table(rules: &[Rule]) -> Table {
        let mut table = Table::new();
        table.add_row(row!["ID", "PATTERN", "PROJECT", "TASK"]);
        for rule in rules {
            table.add_row(row![
                rule.id,
                rule.pattern,
                rule.project_name,
                rule.task_name.as_deref().unwrap_or("-")
            ]);
        }
        table
    }

    pub fn activities(records: &[ActivityRecord]) {
        Self::activities_table(records).printstd();
    }

    pub fn activities_table(records: &[ActivityRecord]) -> Table {
        let mut table = Table::new();
        table.add_row(row!["START", "END", "DURATION", "PROJECT", "TASK", "APP", "WINDOW"]);
        for record in records {
            let activity = &record.activity;
            table.add_row(row![
                format_time(&activity.start_time),
                format_time(&activity.end_time),
                format_duration(&activity.duration()),
                record.project_name,
                record.task_name,
                activity.app_name,
                activity.window_title
            ]);
        }
        table
    }
}
