//! Delta-driven timers.
//!
//! The scheduler never reads a clock. The owner advances it by the elapsed
//! frame time, which keeps timer behaviour deterministic under test.

use std::time::Duration;

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
enum Period {
    Once,
    Every(Duration),
}

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    remaining: Duration,
    period: Period,
    task: T,
}

/// A set of one-shot and repeating timers carrying a task value.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    timers: Vec<Timer<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Copy> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TimerId {
        self.push(delay, Period::Once, task)
    }

    /// Fire `task` every `period`. A zero period is bumped to one millisecond
    /// so a single advance cannot spin forever.
    pub fn schedule_repeating(&mut self, period: Duration, task: T) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.push(period, Period::Every(period), task)
    }

    /// Cancel a timer. Safe to call for a timer that already fired or was
    /// cancelled; returns whether anything was removed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Advance time by `delta` and return every task that came due, in
    /// deadline order. Repeating timers fire once per elapsed period.
    pub fn advance(&mut self, delta: Duration) -> Vec<(TimerId, T)> {
        let mut fired: Vec<(Duration, TimerId, T)> = Vec::new();
        self.timers.retain_mut(|timer| {
            let mut offset = Duration::ZERO;
            let mut left = delta;
            while left >= timer.remaining {
                left -= timer.remaining;
                offset += timer.remaining;
                fired.push((offset, timer.id, timer.task));
                match timer.period {
                    Period::Once => return false,
                    Period::Every(period) => timer.remaining = period,
                }
            }
            timer.remaining -= left;
            true
        });
        fired.sort_by_key(|(offset, id, _)| (*offset, id.0));
        fired.into_iter().map(|(_, id, task)| (id, task)).collect()
    }

    fn push(&mut self, delay: Duration, period: Period, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            remaining: delay,
            period,
            task,
        });
        id
    }
}
