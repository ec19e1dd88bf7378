// Deferred one-shot effects.
//
// Delayed behaviour (a leaf's sway starting, a leaf flutter after a jump, a
// fruit growing back) never blocks the frame. The owner schedules a
// `TimerEffect` some seconds ahead and the world fires it on the first frame
// whose clock reaches the due time. Once scheduled, an effect always fires;
// there is no cancellation. An effect whose target entity is gone is dropped
// by the dispatcher.
//
// Time is kept in whole microseconds so that the heap key `(due, sequence)`
// is a total order: equal due times fire in scheduling order.
//
// See also: `world.rs` for the dispatcher (`fire_due_timers`), `leaf.rs` and
// `fruit.rs` which schedule effects from their update/collision paths.

use crate::types::FloraId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// What should happen when a timer comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEffect {
    /// Start a leaf's looping idle sway.
    LeafSway { leaf: FloraId },
    /// Play a leaf's one-shot jump flutter.
    LeafFlutter { leaf: FloraId },
    /// Make a consumed fruit available again.
    FruitRespawn { fruit: FloraId },
}

/// An effect waiting in the queue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledEffect {
    /// Clock reading, in microseconds, at which the effect fires.
    pub due_micros: u64,
    /// Tiebreak within one due time; lower fires first.
    pub sequence: u64,
    pub effect: TimerEffect,
}

// Min-heap on (due, sequence) through a reversed Ord.
impl PartialEq for ScheduledEffect {
    fn eq(&self, other: &Self) -> bool {
        self.due_micros == other.due_micros && self.sequence == other.sequence
    }
}

impl Eq for ScheduledEffect {}

impl PartialOrd for ScheduledEffect {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEffect {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_micros
            .cmp(&self.due_micros)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Clock plus priority queue of pending effects.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    now_micros: u64,
    heap: BinaryHeap<ScheduledEffect>,
    next_sequence: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock in seconds.
    pub fn now(&self) -> f64 {
        self.now_micros as f64 / MICROS_PER_SEC
    }

    /// Move the clock forward by `dt` seconds. Negative `dt` is ignored.
    pub fn advance(&mut self, dt: f32) {
        self.now_micros = self.now_micros.saturating_add(to_micros(dt));
    }

    /// Queue `effect` to fire `delay_secs` from now. Delays past the end of
    /// the clock's range saturate to the last representable microsecond.
    pub fn schedule_after(&mut self, delay_secs: f32, effect: TimerEffect) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledEffect {
            due_micros: self.now_micros.saturating_add(to_micros(delay_secs)),
            sequence,
            effect,
        });
    }

    /// Pop the earliest effect if it is due at the current clock.
    pub fn pop_due(&mut self) -> Option<ScheduledEffect> {
        if self.heap.peek().is_some_and(|e| e.due_micros <= self.now_micros) {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Seconds until the next effect fires, if any are pending.
    pub fn next_due_in(&self) -> Option<f64> {
        self.heap
            .peek()
            .map(|e| e.due_micros.saturating_sub(self.now_micros) as f64 / MICROS_PER_SEC)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pending effects in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledEffect> {
        self.heap.iter()
    }
}

fn to_micros(secs: f32) -> u64 {
    (f64::from(secs.max(0.0)) * MICROS_PER_SEC).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_time_then_sequence_order() {
        let mut q = TimerQueue::new();
        q.schedule_after(2.0, TimerEffect::FruitRespawn { fruit: FloraId(1) });
        q.schedule_after(1.0, TimerEffect::LeafFlutter { leaf: FloraId(2) });
        q.schedule_after(1.0, TimerEffect::LeafFlutter { leaf: FloraId(3) });

        q.advance(5.0);
        let order: Vec<TimerEffect> = std::iter::from_fn(|| q.pop_due()).map(|e| e.effect).collect();
        assert_eq!(
            order,
            vec![
                TimerEffect::LeafFlutter { leaf: FloraId(2) },
                TimerEffect::LeafFlutter { leaf: FloraId(3) },
                TimerEffect::FruitRespawn { fruit: FloraId(1) },
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn never_fires_early() {
        let mut q = TimerQueue::new();
        q.schedule_after(30.0, TimerEffect::FruitRespawn { fruit: FloraId(0) });
        for _ in 0..749 {
            q.advance(0.04);
            assert!(q.pop_due().is_none(), "fired early at t={}", q.now());
        }
        q.advance(0.04);
        assert!(q.pop_due().is_some());
    }

    #[test]
    fn delays_are_relative_to_current_clock() {
        let mut q = TimerQueue::new();
        q.advance(10.0);
        q.schedule_after(0.5, TimerEffect::LeafSway { leaf: FloraId(4) });
        assert_eq!(q.next_due_in(), Some(0.5));
        q.advance(0.49);
        assert!(q.pop_due().is_none());
        q.advance(0.01);
        assert!(q.pop_due().is_some());
    }

    #[test]
    fn huge_delay_saturates_instead_of_wrapping() {
        let mut q = TimerQueue::new();
        q.advance(0.04);
        q.schedule_after(1e14, TimerEffect::FruitRespawn { fruit: FloraId(9) });
        assert_eq!(q.pending().next().map(|e| e.due_micros), Some(u64::MAX));

        for _ in 0..1000 {
            q.advance(60.0);
        }
        assert!(q.pop_due().is_none());
        assert!(q.next_due_in().is_some_and(|secs| secs > 1e12));
    }

    #[test]
    fn clock_saturates_at_end_of_range() {
        let mut q = TimerQueue::new();
        q.advance(1e14);
        q.advance(1e14);
        q.schedule_after(1.0, TimerEffect::LeafSway { leaf: FloraId(1) });
        assert!(q.pop_due().is_some());
    }

    #[test]
    fn queue_survives_json() {
        let mut q = TimerQueue::new();
        q.schedule_after(1.0, TimerEffect::LeafSway { leaf: FloraId(7) });
        let json = serde_json::to_string(&q).unwrap();
        let mut restored: TimerQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        restored.advance(1.0);
        assert_eq!(
            restored.pop_due().map(|e| e.effect),
            Some(TimerEffect::LeafSway { leaf: FloraId(7) })
        );
    }
}
