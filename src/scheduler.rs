//! Timer plumbing for autoplay.
//!
//! Provides:
//! - `TimerId` - opaque handle for one armed timer
//! - `ManualScheduler` - fires timers only when told to; no clock involved
//! - `DeadlineScheduler` - wall-clock deadlines drained by a host loop

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::traits::Scheduler;

/// Handle for one armed timer. Ids are never reused by a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Deterministic scheduler for tests and step-through tooling.
///
/// Timers fire in the order they were armed, and only when the caller asks.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    armed: VecDeque<(TimerId, Duration)>,
    history: Vec<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest armed timer, as if its delay had elapsed.
    pub fn fire_next(&mut self) -> Option<TimerId> {
        self.armed.pop_front().map(|(id, _)| id)
    }

    /// Number of timers currently armed.
    pub fn pending(&self) -> usize {
        self.armed.len()
    }

    /// Delay of the oldest armed timer.
    pub fn next_delay(&self) -> Option<Duration> {
        self.armed.front().map(|&(_, d)| d)
    }

    /// Every delay ever requested, in order.
    pub fn history(&self) -> &[Duration] {
        &self.history
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.armed.push_back((id, delay));
        self.history.push(delay);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.armed.retain(|&(armed, _)| armed != id);
    }
}

/// Wall-clock scheduler driven by an external loop.
///
/// The host sleeps until [`next_deadline`](Self::next_deadline), then hands
/// every id from [`drain_due`](Self::drain_due) to the controller.
#[derive(Debug, Default)]
pub struct DeadlineScheduler {
    next_id: u64,
    /// Armed timers: id -> fire time.
    pending: HashMap<TimerId, Instant>,
    /// Heap of (fire_at, id) for fast "next deadline" lookup.
    ///
    /// Canceled ids stay in the heap; they are discarded by checking
    /// against `pending`.
    heap: BinaryHeap<Reverse<(Instant, TimerId)>>,
}

impl DeadlineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer relative to an explicit `now`.
    pub fn schedule_at(&mut self, delay: Duration, now: Instant) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let fire_at = now + delay;
        self.pending.insert(id, fire_at);
        self.heap.push(Reverse((fire_at, id)));
        id
    }

    /// Earliest armed deadline, if any.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.pop_stale();
        self.heap.peek().map(|Reverse((t, _))| *t)
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn drain_due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due = Vec::new();
        loop {
            self.pop_stale();
            let Some(&Reverse((fire_at, id))) = self.heap.peek() else {
                break;
            };
            if fire_at > now {
                break;
            }
            let _ = self.heap.pop();
            if self.pending.remove(&id).is_some() {
                due.push(id);
            }
        }
        due
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn pop_stale(&mut self) {
        while let Some(Reverse((_, id))) = self.heap.peek() {
            if self.pending.contains_key(id) {
                break;
            }
            let _ = self.heap.pop();
        }
    }
}

impl Scheduler for DeadlineScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.schedule_at(delay, Instant::now())
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}
