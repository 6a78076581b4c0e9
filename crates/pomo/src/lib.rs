//! pomo - Task-driven pomodoro timer
//!
//! "One task, one interval, then a break."
//!
//! The non-visual core of the timer:
//! - A task list with one-way completion and never-reused ids
//! - A focus countdown that credits elapsed time to the selected task
//! - Daily statistics that reset when the calendar day changes
//!
//! Shells drive it through [`AppState`]: issue commands, run due ticks,
//! drain [`Event`]s and render.

pub mod clock;
pub mod error;
pub mod event;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod store;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::PomoError;
pub use event::Event;
pub use state::AppState;
pub use stats::{CompletedRow, DaySnapshot, StatsAggregator};
pub use store::TaskStore;
pub use task::{Task, TaskId};
pub use timer::{TimerConfig, TimerEngine, TimerPhase};
