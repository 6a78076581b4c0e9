//! Notifications from the core to whatever renders it

use chrono::NaiveDate;

/// Something the shell should re-render or announce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Tasks were added, removed, edited or completed
    TaskListChanged,
    /// The selected task changed; `None` means no task is selected
    ActiveTaskChanged { description: Option<String> },
    /// The countdown moved. `task_time` is set when the active task's time
    /// was snapshotted on this tick.
    TimerTick {
        remaining: String,
        task_time: Option<String>,
    },
    /// The countdown went back to the full interval
    TimerReset { remaining: String },
    /// A focus interval finished; time for an advisory break
    TimerCompleted { break_minutes: u32 },
    /// Day statistics should be recomputed
    StatsChanged,
    /// The tracked calendar day changed
    DayRolledOver { date: NaiveDate },
}
