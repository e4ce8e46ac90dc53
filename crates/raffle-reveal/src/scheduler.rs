//! Virtual-clock timer queue
//!
//! Single-threaded replacement for self-rescheduling timeout chains. Every
//! timer is owned by the queue and cancelled with it; nothing fires after
//! `cancel_all`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that reached its deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer<K> {
    pub id: TimerId,
    pub due_ms: u64,
    pub key: K,
}

/// Deadline-ordered timers over a virtual millisecond clock.
///
/// Timers with equal deadlines fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<K> {
    now_ms: u64,
    next_id: u64,
    /// (due, id) min-heap; ids double as FIFO tie-breakers
    deadlines: BinaryHeap<Reverse<(u64, TimerId)>>,
    /// Live timers; cancelled ids are dropped here and skipped on pop
    live: HashMap<TimerId, K>,
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            deadlines: BinaryHeap::new(),
            live: HashMap::new(),
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `key` to fire `delay_ms` from now (rounded to whole ms)
    pub fn schedule(&mut self, delay_ms: f64, key: K) -> TimerId {
        let delay = if delay_ms.is_finite() && delay_ms > 0.0 {
            delay_ms.round() as u64
        } else {
            0
        };
        self.schedule_at(self.now_ms.saturating_add(delay), key)
    }

    /// Schedule `key` at an absolute time (clamped to now)
    pub fn schedule_at(&mut self, due_ms: u64, key: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = due_ms.max(self.now_ms);
        self.deadlines.push(Reverse((due, id)));
        self.live.insert(id, key);
        id
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        self.live.clear();
        self.deadlines.clear();
    }

    /// Earliest pending deadline
    pub fn next_due_ms(&mut self) -> Option<u64> {
        self.discard_cancelled();
        self.deadlines.peek().map(|Reverse((due, _))| *due)
    }

    /// Pop the next timer due at or before `until_ms`, moving the clock to its
    /// deadline. Timers scheduled while handling it are visible to the next pop.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<FiredTimer<K>> {
        self.discard_cancelled();
        let Reverse((due, id)) = *self.deadlines.peek()?;
        if due > until_ms {
            return None;
        }
        self.deadlines.pop();
        let key = self.live.remove(&id)?;
        self.now_ms = self.now_ms.max(due);
        Some(FiredTimer {
            id,
            due_ms: due,
            key,
        })
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.deadlines.peek() {
            if self.live.contains_key(id) {
                break;
            }
            self.deadlines.pop();
        }
    }
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
