//! One-shot cooperative timers.
//!
//! Timers never run on their own: [`TimerService::tick`] is called once per
//! frame with the frame delta and returns the tokens of every timer that
//! fired, in the order the timers were started. The caller owns a
//! [`TimerHandle`] per logical timer and uses it to cancel before firing.

use std::time::Duration;

/// Caller-owned key for one logical timer.
///
/// A fresh handle is idle. Starting a timer through a handle that is already
/// armed replaces the previous timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerHandle {
    id: Option<u64>,
}

impl TimerHandle {
    /// Creates an idle handle.
    #[must_use]
    pub const fn new() -> Self {
        Self { id: None }
    }
}

#[derive(Debug)]
struct TimerEntry<C> {
    id: u64,
    remaining: Duration,
    token: C,
}

/// Frame-driven one-shot timer service.
#[derive(Debug)]
pub struct TimerService<C> {
    entries: Vec<TimerEntry<C>>,
    next_id: u64,
}

impl<C> TimerService<C> {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(32),
            next_id: 1,
        }
    }

    /// Arms `handle` to fire `token` after `duration`.
    pub fn start(&mut self, handle: &mut TimerHandle, duration: Duration, token: C) {
        self.kill(handle);

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            remaining: duration,
            token,
        });
        handle.id = Some(id);
    }

    /// Cancels the timer behind `handle`, if it has not fired yet.
    ///
    /// Returns true if a pending timer was removed.
    pub fn kill(&mut self, handle: &mut TimerHandle) -> bool {
        let Some(id) = handle.id.take() else {
            return false;
        };
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Returns true if the timer behind `handle` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, handle: &TimerHandle) -> bool {
        handle
            .id
            .is_some_and(|id| self.entries.iter().any(|entry| entry.id == id))
    }

    /// Cancels every pending timer.
    pub fn kill_all(&mut self) {
        self.entries.clear();
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advances every timer by `delta` and returns the tokens that fired.
    pub fn tick(&mut self, delta: Duration) -> Vec<C> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            let entry = &mut self.entries[i];
            if entry.remaining <= delta {
                fired.push(self.entries.remove(i).token);
            } else {
                entry.remaining -= delta;
                i += 1;
            }
        }
        fired
    }
}

impl<C> Default for TimerService<C> {
    fn default() -> Self {
        Self::new()
    }
}
