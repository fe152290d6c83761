//! Debounced scheduling.
//!
//! A [`Debouncer`] holds at most one pending task. Scheduling again cancels
//! and replaces it, so a burst of requests collapses into one execution
//! carrying the last request's payload. Time comes from a [`Clock`] so tests
//! can drive it by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock monotonic time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        self.millis.store(at.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Single-slot cancellable task.
#[derive(Debug)]
pub struct Debouncer<T> {
    pending: Option<(Duration, T)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due at `now + delay`, replacing any
    /// pending task. Returns true if a pending task was replaced.
    pub fn schedule(&mut self, now: Duration, delay: Duration, payload: T) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some((now + delay, payload));
        replaced
    }

    /// Take the pending payload if it is due.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }

    /// When the pending task becomes due.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Time left until the pending task is due, zero if overdue.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline().map(|due| due.saturating_sub(now))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending task, returning its payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, p)| p)
    }
}
