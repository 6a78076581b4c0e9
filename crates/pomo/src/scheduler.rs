//! Deferred tick queue
//!
//! A "run this after a delay" primitive for the two periodic ticks. Entries
//! come out in due-time order, ties broken by the order they were scheduled.
//! The queue never looks at the clock itself; callers pass `now` in.

use chrono::{DateTime, Duration, Local};

/// Which periodic callback a queue entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown tick, only scheduled while the timer runs
    Timer,
    /// Calendar day check
    Rollover,
}

#[derive(Debug, Clone)]
struct Entry {
    due: DateTime<Local>,
    seq: u64,
    tick: Tick,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `tick` to fire once `delay` has passed since `now`
    pub fn schedule_after(&mut self, now: DateTime<Local>, delay: Duration, tick: Tick) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            due: now + delay,
            seq,
            tick,
        });
    }

    /// Drop every pending entry for `tick`
    pub fn cancel(&mut self, tick: Tick) {
        self.entries.retain(|e| e.tick != tick);
    }

    pub fn is_scheduled(&self, tick: Tick) -> bool {
        self.entries.iter().any(|e| e.tick == tick)
    }

    /// Due time of the earliest pending entry
    pub fn next_due(&self) -> Option<DateTime<Local>> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Remove and return the earliest entry that is due at `now`
    pub fn pop_due(&mut self, now: DateTime<Local>) -> Option<Tick> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        Some(self.entries.remove(index).tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_nothing_due_before_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(t0(), Duration::seconds(1), Tick::Timer);

        assert_eq!(scheduler.pop_due(t0()), None);
        assert_eq!(scheduler.next_due(), Some(t0() + Duration::seconds(1)));
        assert_eq!(scheduler.pop_due(t0() + Duration::seconds(1)), Some(Tick::Timer));
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn test_fires_in_due_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(t0(), Duration::seconds(60), Tick::Rollover);
        scheduler.schedule_after(t0(), Duration::seconds(1), Tick::Timer);
        scheduler.schedule_after(t0(), Duration::seconds(60), Tick::Timer);

        let later = t0() + Duration::minutes(5);
        assert_eq!(scheduler.pop_due(later), Some(Tick::Timer));
        assert_eq!(scheduler.pop_due(later), Some(Tick::Rollover));
        assert_eq!(scheduler.pop_due(later), Some(Tick::Timer));
        assert_eq!(scheduler.pop_due(later), None);
    }

    #[test]
    fn test_cancel_only_affects_one_kind() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(t0(), Duration::zero(), Tick::Timer);
        scheduler.schedule_after(t0(), Duration::seconds(60), Tick::Rollover);

        scheduler.cancel(Tick::Timer);
        assert!(!scheduler.is_scheduled(Tick::Timer));
        assert!(scheduler.is_scheduled(Tick::Rollover));
        assert_eq!(scheduler.pop_due(t0()), None);
    }
}
