//! Delayed despawn scheduling
//!
//! One-shot release timers, one per instance, measured against a
//! [`GameClock`] that the host advances from its update loop. A timer only
//! records which activation it was scheduled for; whether it still applies is
//! decided by the pool when it fires.

use crate::foundation::collections::InstanceId;
use crate::foundation::time::GameClock;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct ScheduledDespawn {
    due: Duration,
    activation: u32,
    sequence: u64,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDespawn {
    /// Instance to release
    pub instance: InstanceId,
    /// Activation the timer was scheduled for
    pub activation: u32,
}

/// Cancellable delayed-despawn timers keyed by instance
#[derive(Debug, Default)]
pub struct DespawnScheduler {
    clock: GameClock,
    pending: HashMap<InstanceId, ScheduledDespawn>,
    next_sequence: u64,
}

impl DespawnScheduler {
    /// Create an empty scheduler at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule (or reschedule) a release `delay_seconds` from now
    ///
    /// Returns `false` and schedules nothing for a negative delay.
    pub fn schedule(&mut self, instance: InstanceId, activation: u32, delay_seconds: f32) -> bool {
        let Some(due) = self.clock.after(delay_seconds) else {
            return false;
        };
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pending.insert(instance, ScheduledDespawn { due, activation, sequence });
        true
    }

    /// Drop the timer for `instance`, if any
    pub fn cancel(&mut self, instance: InstanceId) -> bool {
        self.pending.remove(&instance).is_some()
    }

    /// Drop every timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Whether `instance` has a timer
    pub fn is_scheduled(&self, instance: InstanceId) -> bool {
        self.pending.contains_key(&instance)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance the clock and take every timer that is now due
    ///
    /// Timers come back in due order; timers due at the same moment keep the
    /// order they were scheduled in.
    pub fn advance(&mut self, delta_seconds: f32) -> Vec<DueDespawn> {
        self.clock.advance(delta_seconds);
        let now = self.clock.now();

        let mut due: Vec<(InstanceId, ScheduledDespawn)> = self
            .pending
            .iter()
            .filter(|(_, task)| task.due <= now)
            .map(|(id, task)| (*id, *task))
            .collect();
        due.sort_by_key(|(_, task)| (task.due, task.sequence));

        due.into_iter()
            .map(|(instance, task)| {
                self.pending.remove(&instance);
                DueDespawn { instance, activation: task.activation }
            })
            .collect()
    }
}
