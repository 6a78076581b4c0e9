//! Task model
//!
//! A task is one unit of work that focus time can be credited to.

use chrono::{DateTime, Local, NaiveDate};
use std::fmt;

/// Task identifier, handed out by [`crate::store::TaskStore`] starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logged task
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) description: String,
    pub(crate) tags: String,
    pub(crate) completed_at: Option<DateTime<Local>>,
    pub(crate) time_spent: u64,
    pub(crate) created_at: DateTime<Local>,
}

impl Task {
    pub(crate) fn new(id: TaskId, description: String, tags: String, now: DateTime<Local>) -> Self {
        Self {
            id,
            description,
            tags,
            completed_at: None,
            time_spent: 0,
            created_at: now,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Free-form tags or project name, possibly empty
    pub fn tags(&self) -> &str {
        &self.tags
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Focus seconds last snapshotted onto this task
    pub fn time_spent(&self) -> u64 {
        self.time_spent
    }

    pub fn time_spent_minutes(&self) -> u64 {
        self.time_spent / 60
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    /// Whether the task was completed on the given local calendar day
    pub fn completed_on(&self, date: NaiveDate) -> bool {
        self.completed_at
            .map(|at| at.date_naive() == date)
            .unwrap_or(false)
    }
}
