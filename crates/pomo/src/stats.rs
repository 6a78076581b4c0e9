//! Daily focus statistics
//!
//! Nothing here is stored: every snapshot is derived from the task store and
//! the engine's completed-interval minutes for the tracked day.
//! - Completed count: tasks completed on the tracked day
//! - Session minutes: completed intervals plus the whole minutes of time
//!   spent on tasks completed that day

use chrono::{DateTime, Local, NaiveDate};
use pomo_core::format;
use tracing::info;

use crate::store::TaskStore;

/// One completed task as shown in the stats table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRow {
    pub description: String,
    pub tags: String,
    pub time_spent_minutes: u64,
    /// Completion time as HH:MM
    pub completed_at: String,
}

/// Statistics for one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub completed_count: usize,
    pub session_minutes: u64,
    pub completed: Vec<CompletedRow>,
}

impl DaySnapshot {
    /// Date as dd/mm/YYYY for headings
    pub fn date_label(&self) -> String {
        format::date_label(self.date)
    }
}

/// Tracks the current day and derives its statistics
#[derive(Debug)]
pub struct StatsAggregator {
    today: NaiveDate,
}

impl StatsAggregator {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The day currently being tracked
    pub fn current_day(&self) -> NaiveDate {
        self.today
    }

    /// Move to the wall-clock day if it changed. Returns true on rollover;
    /// the caller then zeroes the completed-interval minutes.
    pub fn check_rollover(&mut self, now: DateTime<Local>) -> bool {
        let date = now.date_naive();
        if date == self.today {
            return false;
        }

        info!(from = %self.today, to = %date, "Day rolled over");
        self.today = date;
        true
    }

    /// Derive the tracked day's statistics
    pub fn snapshot(&self, store: &TaskStore, completed_session_minutes: u64) -> DaySnapshot {
        let completed_today = store.list_completed_on(self.today);

        let task_minutes: u64 = completed_today.iter().map(|t| t.time_spent_minutes()).sum();

        let completed = completed_today
            .iter()
            .map(|t| CompletedRow {
                description: t.description().to_string(),
                tags: t.tags().to_string(),
                time_spent_minutes: t.time_spent_minutes(),
                completed_at: t.completed_at().map(format::clock_time).unwrap_or_default(),
            })
            .collect();

        DaySnapshot {
            date: self.today,
            completed_count: completed_today.len(),
            session_minutes: completed_session_minutes + task_minutes,
            completed,
        }
    }
}
