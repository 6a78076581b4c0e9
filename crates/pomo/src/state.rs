//! Application state
//!
//! [`AppState`] bundles the task store, the timer engine and the stats
//! aggregator behind the command/query surface the shell talks to. It owns
//! the clock and the tick queue, so a shell only has to:
//! - call commands in response to user input
//! - call [`AppState::run_due`] whenever [`AppState::next_due`] has passed
//! - drain [`Event`]s and re-render
//!
//! Everything runs on one thread. A command issued between two ticks is
//! applied before the next tick fires.

use chrono::{DateTime, Duration, Local, NaiveDate};
use pomo_core::format;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::event::Event;
use crate::scheduler::{Scheduler, Tick};
use crate::stats::{DaySnapshot, StatsAggregator};
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::timer::{TimerConfig, TimerEngine, TimerPhase};

/// Countdown tick period while the timer runs
pub const TIMER_TICK_SECS: i64 = 1;
/// How often the calendar day is checked
pub const ROLLOVER_CHECK_SECS: i64 = 60;

pub struct AppState {
    clock: Box<dyn Clock>,
    scheduler: Scheduler,
    store: TaskStore,
    timer: TimerEngine,
    stats: StatsAggregator,
    events: Vec<Event>,
}

impl AppState {
    pub fn new(config: TimerConfig, clock: Box<dyn Clock>) -> Self {
        let now = clock.now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(now, Duration::seconds(ROLLOVER_CHECK_SECS), Tick::Rollover);

        Self {
            clock,
            scheduler,
            store: TaskStore::new(),
            timer: TimerEngine::new(config),
            stats: StatsAggregator::new(now.date_naive()),
            events: Vec::new(),
        }
    }

    /// State driven by the real system clock
    pub fn with_system_clock(config: TimerConfig) -> Self {
        Self::new(config, Box::new(SystemClock))
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    // --- Commands ---

    pub fn create_task(&mut self, description: &str, tags: &str) -> Result<TaskId> {
        let now = self.clock.now();
        let id = self.store.create(description, tags, now)?.id();
        self.events.push(Event::TaskListChanged);
        Ok(id)
    }

    /// Remove a task. Missing ids are ignored.
    pub fn remove_task(&mut self, id: TaskId) -> bool {
        let Some(task) = self.store.remove(id) else {
            return false;
        };

        self.events.push(Event::TaskListChanged);
        if task.is_completed() {
            self.events.push(Event::StatsChanged);
        }
        if self.timer.release_task(id) {
            self.events.push(Event::ActiveTaskChanged { description: None });
        }
        true
    }

    /// Replace a task's description. Missing ids and blank text are ignored.
    pub fn edit_task(&mut self, id: TaskId, description: &str) -> bool {
        if !self.store.edit(id, description) {
            return false;
        }

        self.events.push(Event::TaskListChanged);
        if self.timer.active_task_id() == Some(id) {
            let description = self.store.get(id).map(|t| t.description().to_string());
            self.events.push(Event::ActiveTaskChanged { description });
        }
        true
    }

    /// Complete a task. Missing or already completed ids are ignored.
    pub fn complete_task(&mut self, id: TaskId) -> bool {
        let now = self.clock.now();
        if !self.store.complete(id, now) {
            return false;
        }

        self.events.push(Event::TaskListChanged);
        self.events.push(Event::StatsChanged);
        if self.timer.release_task(id) {
            self.events.push(Event::ActiveTaskChanged { description: None });
        }
        true
    }

    pub fn set_active_task(&mut self, id: TaskId) -> Result<()> {
        self.timer.set_active_task(id, &self.store)?;
        let description = self.store.get(id).map(|t| t.description().to_string());
        self.events.push(Event::ActiveTaskChanged { description });
        Ok(())
    }

    /// Validate and install new interval lengths, resetting the countdown
    pub fn apply_config(&mut self, work_minutes: u32, break_minutes: u32) -> Result<()> {
        let config = TimerConfig::new(work_minutes, break_minutes)?;
        self.install_config(config);
        Ok(())
    }

    /// Same as [`AppState::apply_config`] for raw text input
    pub fn apply_config_input(&mut self, work_minutes: &str, break_minutes: &str) -> Result<()> {
        let config = TimerConfig::parse(work_minutes, break_minutes)?;
        self.install_config(config);
        Ok(())
    }

    /// Start, pause or resume the countdown
    pub fn toggle_timer(&mut self) -> Result<TimerPhase> {
        let now = self.clock.now();
        let phase = self.timer.toggle(now, &self.store)?;

        self.scheduler.cancel(Tick::Timer);
        if phase == TimerPhase::Running {
            // First tick right away, then once per period
            self.scheduler.schedule_after(now, Duration::zero(), Tick::Timer);
        }
        Ok(phase)
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.scheduler.cancel(Tick::Timer);
        self.events.push(Event::TimerReset {
            remaining: self.timer.remaining_display(),
        });
    }

    /// Compare the wall-clock day with the tracked one and roll over if needed
    pub fn check_day_rollover(&mut self) -> bool {
        let now = self.clock.now();
        if !self.stats.check_rollover(now) {
            return false;
        }

        self.timer.clear_session_minutes();
        self.events.push(Event::DayRolledOver {
            date: self.stats.current_day(),
        });
        self.events.push(Event::StatsChanged);
        true
    }

    // --- Queries ---

    pub fn list_incomplete_tasks(&self) -> Vec<&Task> {
        self.store.list_incomplete()
    }

    pub fn day_stats_snapshot(&self) -> DaySnapshot {
        self.stats.snapshot(&self.store, self.timer.session_minutes())
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.store
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.timer.active_task(&self.store)
    }

    pub fn current_day(&self) -> NaiveDate {
        self.stats.current_day()
    }

    /// When the next scheduled tick is due
    pub fn next_due(&self) -> Option<DateTime<Local>> {
        self.scheduler.next_due()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // --- Driving ---

    /// Fire every tick that is due on the clock. Returns how many fired.
    pub fn run_due(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        while let Some(tick) = self.scheduler.pop_due(now) {
            fired += 1;
            match tick {
                Tick::Timer => self.on_timer_tick(now),
                Tick::Rollover => {
                    self.check_day_rollover();
                    self.scheduler
                        .schedule_after(now, Duration::seconds(ROLLOVER_CHECK_SECS), Tick::Rollover);
                }
            }
        }
        fired
    }

    fn on_timer_tick(&mut self, now: DateTime<Local>) {
        let Some(report) = self.timer.tick(now, &mut self.store) else {
            debug!("Timer tick while idle ignored");
            return;
        };

        self.events.push(Event::TimerTick {
            remaining: format::countdown(report.remaining),
            task_time: report.snapshot.map(format::task_time),
        });

        if let Some(completion) = report.completed {
            self.events.push(Event::StatsChanged);
            self.events.push(Event::TimerCompleted {
                break_minutes: completion.break_minutes,
            });
            self.events.push(Event::TimerReset {
                remaining: self.timer.remaining_display(),
            });
        } else {
            self.scheduler
                .schedule_after(now, Duration::seconds(TIMER_TICK_SECS), Tick::Timer);
        }
    }

    fn install_config(&mut self, config: TimerConfig) {
        self.timer.apply_config(config);
        self.scheduler.cancel(Tick::Timer);
        self.events.push(Event::TimerReset {
            remaining: self.timer.remaining_display(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::PomoError;
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn app() -> (AppState, ManualClock) {
        let clock = ManualClock::new(t0());
        let state = AppState::new(TimerConfig::default(), Box::new(clock.clone()));
        (state, clock)
    }

    /// Advance one second at a time, firing due ticks, collecting events
    fn run_seconds(state: &mut AppState, clock: &ManualClock, seconds: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..seconds {
            clock.advance(Duration::seconds(1));
            state.run_due();
            events.extend(state.drain_events());
        }
        events
    }

    fn completions(events: &[Event]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::TimerCompleted { break_minutes } => Some(*break_minutes),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_interval_credits_task_and_stats() {
        let (mut state, clock) = app();

        let id = state.create_task("Write report", "work").unwrap();
        assert_eq!(id, TaskId(1));
        assert_eq!(state.tasks().get(id).unwrap().time_spent(), 0);

        state.set_active_task(id).unwrap();
        assert_eq!(state.toggle_timer(), Ok(TimerPhase::Running));

        // Applying a config resets to idle; start again with a 1 minute interval
        state.apply_config(1, 5).unwrap();
        assert!(!state.timer().is_running());
        assert_eq!(state.toggle_timer(), Ok(TimerPhase::Running));
        state.drain_events();

        let events = run_seconds(&mut state, &clock, 60);
        assert_eq!(completions(&events), vec![5]);
        assert_eq!(state.tasks().get(id).unwrap().time_spent(), 60);
        assert!(!state.timer().is_running());
        assert_eq!(state.timer().elapsed_seconds(), 0.0);
        assert_eq!(state.day_stats_snapshot().session_minutes, 1);

        // The interval is over; no further timer ticks are pending
        let events = run_seconds(&mut state, &clock, 30);
        assert!(completions(&events).is_empty());
        assert_eq!(state.day_stats_snapshot().session_minutes, 1);
    }

    #[test]
    fn test_tick_events() {
        let (mut state, clock) = app();
        let id = state.create_task("Write report", "").unwrap();
        state.set_active_task(id).unwrap();
        state.apply_config(1, 3).unwrap();
        state.toggle_timer().unwrap();
        state.drain_events();

        let events = run_seconds(&mut state, &clock, 10);
        assert_eq!(
            events.last(),
            Some(&Event::TimerTick {
                remaining: "00:50".to_string(),
                task_time: Some("0:10".to_string()),
            })
        );
        assert!(events.contains(&Event::TimerTick {
            remaining: "00:55".to_string(),
            task_time: None,
        }));

        let events = run_seconds(&mut state, &clock, 50);
        let tail: Vec<&Event> = events.iter().rev().take(4).rev().collect();
        assert_eq!(
            tail,
            vec![
                &Event::TimerTick {
                    remaining: "00:00".to_string(),
                    task_time: Some("1:00".to_string()),
                },
                &Event::StatsChanged,
                &Event::TimerCompleted { break_minutes: 3 },
                &Event::TimerReset {
                    remaining: "01:00".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_toggle_without_task_fails() {
        let (mut state, _) = app();
        assert_eq!(state.toggle_timer(), Err(PomoError::NoActiveTask));
        assert!(!state.timer().is_running());
        assert_eq!(state.next_due(), Some(t0() + Duration::seconds(ROLLOVER_CHECK_SECS)));
    }

    #[test]
    fn test_invalid_config_leaves_previous() {
        let (mut state, _) = app();
        state.apply_config(30, 10).unwrap();

        assert!(matches!(
            state.apply_config(0, 5),
            Err(PomoError::InvalidConfig { .. })
        ));
        assert!(state.apply_config_input("45", "abc").is_err());
        assert_eq!(state.timer().config(), TimerConfig::new(30, 10).unwrap());

        state.apply_config_input("45", "15").unwrap();
        assert_eq!(state.timer().config(), TimerConfig::new(45, 15).unwrap());
    }

    #[test]
    fn test_removing_active_task_clears_selection() {
        let (mut state, _) = app();
        let id = state.create_task("Temporary", "").unwrap();
        state.set_active_task(id).unwrap();
        state.drain_events();

        assert!(state.remove_task(id));
        assert!(state.list_incomplete_tasks().is_empty());
        assert_eq!(state.active_task(), None);
        assert_eq!(
            state.drain_events(),
            vec![
                Event::TaskListChanged,
                Event::ActiveTaskChanged { description: None },
            ]
        );
        assert_eq!(state.toggle_timer(), Err(PomoError::NoActiveTask));

        // Second removal is a silent no-op
        assert!(!state.remove_task(id));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_complete_task_is_idempotent() {
        let (mut state, clock) = app();
        let id = state.create_task("Ship", "release").unwrap();

        clock.advance(Duration::minutes(5));
        assert!(state.complete_task(id));
        let first = state.tasks().get(id).unwrap().completed_at();

        clock.advance(Duration::minutes(5));
        assert!(!state.complete_task(id));
        assert_eq!(state.tasks().get(id).unwrap().completed_at(), first);
        assert_eq!(first, Some(t0() + Duration::minutes(5)));

        let snapshot = state.day_stats_snapshot();
        assert_eq!(snapshot.completed_count, 1);
        assert_eq!(snapshot.completed[0].completed_at, "09:05");
    }

    #[test]
    fn test_completing_active_task_keeps_timer_running() {
        let (mut state, clock) = app();
        let id = state.create_task("Focus", "").unwrap();
        state.set_active_task(id).unwrap();
        state.toggle_timer().unwrap();
        run_seconds(&mut state, &clock, 20);
        state.drain_events();

        assert!(state.complete_task(id));
        assert!(state.drain_events().contains(&Event::ActiveTaskChanged { description: None }));
        assert!(state.timer().is_running());

        // Later snapshots no longer touch the completed task
        run_seconds(&mut state, &clock, 20);
        assert_eq!(state.tasks().get(id).unwrap().time_spent(), 20);
        assert_eq!(state.set_active_task(id), Err(PomoError::UnknownTask(id)));
    }

    #[test]
    fn test_pause_stops_ticks_and_resume_continues() {
        let (mut state, clock) = app();
        let id = state.create_task("Focus", "").unwrap();
        state.set_active_task(id).unwrap();
        state.toggle_timer().unwrap();
        run_seconds(&mut state, &clock, 15);
        assert_eq!(state.timer().elapsed_seconds(), 15.0);

        assert_eq!(state.toggle_timer(), Ok(TimerPhase::Idle));
        assert_eq!(state.toggle_timer(), Ok(TimerPhase::Running));
        assert_eq!(state.timer().elapsed_seconds(), 15.0);
        assert_eq!(state.toggle_timer(), Ok(TimerPhase::Idle));

        let events = run_seconds(&mut state, &clock, 120);
        assert!(!events.iter().any(|e| matches!(e, Event::TimerTick { .. })));
        assert_eq!(state.timer().elapsed_seconds(), 15.0);

        state.toggle_timer().unwrap();
        run_seconds(&mut state, &clock, 5);
        assert_eq!(state.timer().elapsed_seconds(), 20.0);
        assert_eq!(state.tasks().get(id).unwrap().time_spent(), 20);
    }

    #[test]
    fn test_reset_timer() {
        let (mut state, clock) = app();
        let id = state.create_task("Focus", "").unwrap();
        state.set_active_task(id).unwrap();
        state.toggle_timer().unwrap();
        run_seconds(&mut state, &clock, 42);

        state.reset_timer();
        assert!(!state.timer().is_running());
        assert_eq!(state.timer().elapsed_seconds(), 0.0);
        assert_eq!(state.active_task().map(|t| t.id()), Some(id));
        assert_eq!(
            state.drain_events(),
            vec![Event::TimerReset {
                remaining: "25:00".to_string()
            }]
        );
        assert!(run_seconds(&mut state, &clock, 5).is_empty());
    }

    #[test]
    fn test_edit_active_task_updates_label() {
        let (mut state, _) = app();
        let id = state.create_task("draft", "").unwrap();
        state.set_active_task(id).unwrap();
        state.drain_events();

        assert!(state.edit_task(id, "final"));
        assert_eq!(
            state.drain_events(),
            vec![
                Event::TaskListChanged,
                Event::ActiveTaskChanged {
                    description: Some("final".to_string())
                },
            ]
        );
        assert!(!state.edit_task(id, "  "));
        assert!(!state.edit_task(TaskId(9), "other"));
    }

    #[test]
    fn test_ids_keep_increasing() {
        let (mut state, _) = app();
        let a = state.create_task("a", "").unwrap();
        state.remove_task(a);
        let b = state.create_task("b", "").unwrap();
        assert!(b > a);
        assert_eq!(b, TaskId(2));
        assert_eq!(state.create_task("  ", "x"), Err(PomoError::EmptyDescription));
    }

    #[test]
    fn test_day_rollover_resets_stats() {
        let (mut state, clock) = app();
        let id = state.create_task("Focus", "").unwrap();
        state.set_active_task(id).unwrap();
        state.apply_config(1, 5).unwrap();
        state.toggle_timer().unwrap();
        run_seconds(&mut state, &clock, 60);
        state.complete_task(id);

        let snapshot = state.day_stats_snapshot();
        assert_eq!(snapshot.completed_count, 1);
        // 1 completed interval + 1 minute spent on the completed task
        assert_eq!(snapshot.session_minutes, 2);
        state.drain_events();

        // Nothing happens until the wall-clock date actually changes
        clock.advance(Duration::minutes(5));
        state.run_due();
        assert!(state.drain_events().is_empty());

        clock.set(Local.with_ymd_and_hms(2024, 3, 5, 0, 0, 30).unwrap());
        state.run_due();
        let next_day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            state.drain_events(),
            vec![Event::DayRolledOver { date: next_day }, Event::StatsChanged]
        );
        assert_eq!(state.current_day(), next_day);

        let snapshot = state.day_stats_snapshot();
        assert_eq!(snapshot.completed_count, 0);
        assert_eq!(snapshot.session_minutes, 0);
        assert_eq!(snapshot.date_label(), "05/03/2024");
    }
}
