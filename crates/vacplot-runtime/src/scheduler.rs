#![forbid(unsafe_code)]

//! Virtual-clock timer queue.
//!
//! The scheduler never reads a wall clock: time only moves when the owner
//! calls [`Scheduler::advance_to`]. Timers are kept in a min-heap ordered by
//! due time, with insertion order breaking ties so timers scheduled for the
//! same instant fire first-in, first-out.
//!
//! # Invariants
//!
//! 1. `now()` is monotonic non-decreasing.
//! 2. [`Scheduler::pop_due`] only yields timers with `due <= now()`, earliest
//!    first, FIFO among equal due times.
//! 3. A timer is yielded at most once.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use tracing::trace;

/// Handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Entry<E> {
    due: Duration,
    id: TimerId,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, the earliest timer must win.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Timer queue carrying events of type `E`.
pub struct Scheduler<E> {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Entry<E>>,
}

impl<E> std::fmt::Debug for Scheduler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` after now.
    pub fn schedule_in(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        trace!(
            target: "vacplot.scheduler",
            id = id.0,
            due_ms = due.as_millis() as u64,
            pending = self.queue.len() + 1,
            "timer scheduled"
        );
        self.queue.push(Entry { due, id, event });
        id
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|entry| entry.due)
    }

    /// Move the clock forward. Earlier times are ignored.
    pub fn advance_to(&mut self, time: Duration) {
        if time > self.now {
            self.now = time;
        }
    }

    /// Pop the earliest timer if it is due.
    pub fn pop_due(&mut self) -> Option<(TimerId, E)> {
        if self.queue.peek()?.due > self.now {
            return None;
        }
        let entry = self.queue.pop()?;
        trace!(
            target: "vacplot.scheduler",
            id = entry.id.0,
            now_ms = self.now.as_millis() as u64,
            "timer fired"
        );
        Some((entry.id, entry.event))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule_in(ms(30), "c");
        s.schedule_in(ms(10), "a");
        s.schedule_in(ms(20), "b");
        assert_eq!(s.next_due(), Some(ms(10)));

        s.advance_to(ms(25));
        assert_eq!(s.pop_due().map(|(_, e)| e), Some("a"));
        assert_eq!(s.pop_due().map(|(_, e)| e), Some("b"));
        assert_eq!(s.pop_due(), None);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn equal_due_times_are_fifo() {
        let mut s = Scheduler::new();
        for name in ["first", "second", "third"] {
            s.schedule_in(ms(5), name);
        }
        s.advance_to(ms(5));
        let order: Vec<_> = std::iter::from_fn(|| s.pop_due().map(|(_, e)| e)).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.advance_to(ms(50));
        s.advance_to(ms(20));
        assert_eq!(s.now(), ms(50));
        s.schedule_in(ms(5), ());
        assert_eq!(s.next_due(), Some(ms(55)));
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let mut s = Scheduler::new();
        s.advance_to(ms(7));
        let id = s.schedule_in(Duration::ZERO, 1u8);
        assert_eq!(s.pop_due(), Some((id, 1)));
        assert!(s.is_empty());
    }
}
