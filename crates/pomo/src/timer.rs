//! Focus countdown state machine
//!
//! The engine is either `Idle` or `Running`. While running, each tick
//! recomputes elapsed time from the wall clock against a start reference
//! (`now - elapsed` at the moment of starting), so late or missed ticks
//! catch up instead of drifting. Pausing keeps the elapsed time; only reset,
//! a config change or a completed interval clear it.
//!
//! Time is credited to the active task as a snapshot: whenever the whole
//! elapsed seconds land on a multiple of ten, and once more on completion,
//! the task's time spent is overwritten with the elapsed seconds. Ticks that
//! arrive late can step over a multiple of ten, in which case that snapshot
//! is simply skipped.

use chrono::{DateTime, Duration, Local};
use std::ops::RangeInclusive;
use tracing::{debug, info};

use crate::error::{PomoError, Result};
use crate::store::TaskStore;
use crate::task::{Task, TaskId};

/// Allowed focus interval lengths in minutes
pub const WORK_MINUTES: RangeInclusive<u32> = 1..=60;
/// Allowed break lengths in minutes
pub const BREAK_MINUTES: RangeInclusive<u32> = 1..=30;
/// Task time is snapshotted when whole elapsed seconds divide by this
pub const SNAPSHOT_INTERVAL_SECS: u64 = 10;

/// Interval lengths, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    work_minutes: u32,
    break_minutes: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
        }
    }
}

impl TimerConfig {
    pub fn new(work_minutes: u32, break_minutes: u32) -> Result<Self> {
        Ok(Self {
            work_minutes: check_range("work minutes", work_minutes, &WORK_MINUTES)?,
            break_minutes: check_range("break minutes", break_minutes, &BREAK_MINUTES)?,
        })
    }

    /// Build a config from raw text fields, as typed by the user
    pub fn parse(work_minutes: &str, break_minutes: &str) -> Result<Self> {
        let work = parse_minutes("work minutes", work_minutes, &WORK_MINUTES)?;
        let brk = parse_minutes("break minutes", break_minutes, &BREAK_MINUTES)?;
        Self::new(work, brk)
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn work_seconds(&self) -> f64 {
        f64::from(self.work_minutes) * 60.0
    }
}

fn invalid(field: &'static str, value: String, range: &RangeInclusive<u32>) -> PomoError {
    PomoError::InvalidConfig {
        field,
        value,
        min: *range.start(),
        max: *range.end(),
    }
}

fn check_range(field: &'static str, value: u32, range: &RangeInclusive<u32>) -> Result<u32> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(invalid(field, value.to_string(), range))
    }
}

fn parse_minutes(field: &'static str, raw: &str, range: &RangeInclusive<u32>) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| invalid(field, raw.to_string(), range))
}

/// Whether the countdown is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
}

/// A focus interval that ran to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub work_minutes: u32,
    pub break_minutes: u32,
}

/// What a single tick observed
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Seconds left in the interval, never negative
    pub remaining: f64,
    /// Seconds written to the active task, if a snapshot was taken
    pub snapshot: Option<u64>,
    pub completed: Option<Completion>,
}

/// The countdown engine
#[derive(Debug)]
pub struct TimerEngine {
    config: TimerConfig,
    phase: TimerPhase,
    /// Elapsed time as of the last tick or pause
    elapsed: Duration,
    /// `now - elapsed` at the moment the timer was (re)started
    started_from: Option<DateTime<Local>>,
    active_task: Option<TaskId>,
    /// Minutes of fully completed intervals since the last day rollover
    session_minutes: u64,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl TimerEngine {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: TimerPhase::Idle,
            elapsed: Duration::zero(),
            started_from: None,
            active_task: None,
            session_minutes: 0,
        }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.num_milliseconds() as f64 / 1000.0
    }

    pub fn remaining_seconds(&self) -> f64 {
        (self.config.work_seconds() - self.elapsed_seconds()).max(0.0)
    }

    /// Remaining time as MM:SS
    pub fn remaining_display(&self) -> String {
        pomo_core::format::countdown(self.remaining_seconds())
    }

    pub fn session_minutes(&self) -> u64 {
        self.session_minutes
    }

    /// Zero the completed-interval minutes, used when the day rolls over
    pub fn clear_session_minutes(&mut self) {
        self.session_minutes = 0;
    }

    pub fn active_task_id(&self) -> Option<TaskId> {
        self.active_task
    }

    /// The active task, if the id still resolves
    pub fn active_task<'a>(&self, store: &'a TaskStore) -> Option<&'a Task> {
        self.active_task.and_then(|id| store.get(id))
    }

    /// Select the task that running time is credited to
    pub fn set_active_task(&mut self, id: TaskId, store: &TaskStore) -> Result<()> {
        match store.get(id) {
            Some(task) if !task.is_completed() => {
                info!(%id, "Active task set");
                self.active_task = Some(id);
                Ok(())
            }
            _ => Err(PomoError::UnknownTask(id)),
        }
    }

    /// Forget the active task if it is `id`. Returns whether it was.
    pub fn release_task(&mut self, id: TaskId) -> bool {
        if self.active_task == Some(id) {
            debug!(%id, "Active task released");
            self.active_task = None;
            true
        } else {
            false
        }
    }

    /// Start, resume or pause the countdown
    pub fn toggle(&mut self, now: DateTime<Local>, store: &TaskStore) -> Result<TimerPhase> {
        match self.phase {
            TimerPhase::Idle => {
                if self.active_task(store).is_none() {
                    return Err(PomoError::NoActiveTask);
                }
                self.started_from = Some(now - self.elapsed);
                self.phase = TimerPhase::Running;
                info!(elapsed = self.elapsed_seconds(), "Timer running");
            }
            TimerPhase::Running => {
                self.started_from = None;
                self.phase = TimerPhase::Idle;
                info!(elapsed = self.elapsed_seconds(), "Timer paused");
            }
        }
        Ok(self.phase)
    }

    /// Advance the countdown to `now`. Returns `None` when the timer is idle.
    pub fn tick(&mut self, now: DateTime<Local>, store: &mut TaskStore) -> Option<TickReport> {
        let started_from = match (self.phase, self.started_from) {
            (TimerPhase::Running, Some(start)) => start,
            _ => return None,
        };

        self.elapsed = (now - started_from).max(Duration::zero());
        let remaining = self.remaining_seconds();
        let whole = self.elapsed.num_seconds().max(0) as u64;

        let mut snapshot = None;
        if whole % SNAPSHOT_INTERVAL_SECS == 0 {
            snapshot = self.snapshot(store, whole);
        }

        let mut completed = None;
        if remaining <= 0.0 {
            snapshot = self.snapshot(store, whole).or(snapshot);
            self.session_minutes += u64::from(self.config.work_minutes);
            completed = Some(Completion {
                work_minutes: self.config.work_minutes,
                break_minutes: self.config.break_minutes,
            });
            info!(
                work_minutes = self.config.work_minutes,
                session_minutes = self.session_minutes,
                "Focus interval completed"
            );
            self.reset();
        }

        Some(TickReport {
            remaining,
            snapshot,
            completed,
        })
    }

    /// Install a new config and reset the countdown. The active task stays.
    pub fn apply_config(&mut self, config: TimerConfig) {
        info!(
            work_minutes = config.work_minutes,
            break_minutes = config.break_minutes,
            "Timer config applied"
        );
        self.config = config;
        self.reset();
    }

    /// Stop and zero the countdown. The active task stays.
    pub fn reset(&mut self) {
        self.phase = TimerPhase::Idle;
        self.elapsed = Duration::zero();
        self.started_from = None;
    }

    fn snapshot(&mut self, store: &mut TaskStore, seconds: u64) -> Option<u64> {
        let id = self.active_task?;
        if store.set_time_spent(id, seconds) {
            debug!(%id, seconds, "Task time snapshot");
            Some(seconds)
        } else {
            debug!(%id, "Active task is gone, dropping reference");
            self.active_task = None;
            None
        }
    }
}
