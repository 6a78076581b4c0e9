//! Task storage
//!
//! Owns every task for the lifetime of the process, in insertion order.
//! - Ids come from a counter that starts at 1 and never goes backwards
//! - Remove, edit and complete on a missing id are silent no-ops
//! - Completion is one-way

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info};

use crate::error::{PomoError, Result};
use crate::task::{Task, TaskId};

/// In-memory task store
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// Last id handed out
    last_id: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a task and append it to the list
    pub fn create(&mut self, description: &str, tags: &str, now: DateTime<Local>) -> Result<&Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PomoError::EmptyDescription);
        }

        self.last_id += 1;
        let id = TaskId(self.last_id);
        info!(%id, description, "Task created");

        self.tasks
            .push(Task::new(id, description.to_string(), tags.trim().to_string(), now));
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Remove a task, returning it if it existed
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        info!(%id, "Task removed");
        Some(self.tasks.remove(index))
    }

    /// Replace a task's description. Returns false when nothing changed.
    pub fn edit(&mut self, id: TaskId, description: &str) -> bool {
        let description = description.trim();
        if description.is_empty() {
            debug!(%id, "Ignoring edit with empty description");
            return false;
        }

        match self.get_mut(id) {
            Some(task) => {
                task.description = description.to_string();
                info!(%id, description, "Task edited");
                true
            }
            None => false,
        }
    }

    /// Mark a task completed. Returns false when it is missing or already done.
    pub fn complete(&mut self, id: TaskId, now: DateTime<Local>) -> bool {
        match self.get_mut(id) {
            Some(task) if !task.is_completed() => {
                task.completed_at = Some(now);
                info!(%id, time_spent = task.time_spent, "Task completed");
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Overwrite the focus time snapshot of a task
    pub(crate) fn set_time_spent(&mut self, id: TaskId, seconds: u64) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.time_spent = seconds;
                true
            }
            None => false,
        }
    }

    /// Tasks still to do, in insertion order
    pub fn list_incomplete(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.is_completed()).collect()
    }

    /// Tasks completed on the given local calendar day, in insertion order
    pub fn list_completed_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed_on(date)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
