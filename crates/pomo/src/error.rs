//! Errors surfaced to the shell when a command is rejected

use thiserror::Error;

use crate::task::TaskId;

/// Reasons a command can be refused. None of them leave partial state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PomoError {
    #[error("Task description cannot be empty")]
    EmptyDescription,

    #[error("Task not found: {0}")]
    UnknownTask(TaskId),

    #[error("Select a task before starting the timer")]
    NoActiveTask,

    #[error("Invalid {field}: {value:?} (expected a whole number from {min} to {max})")]
    InvalidConfig {
        field: &'static str,
        value: String,
        min: u32,
        max: u32,
    },
}

pub type Result<T> = std::result::Result<T, PomoError>;
