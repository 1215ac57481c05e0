//! Trailing-edge debounce for deferred work.
//!
//! Each request restarts the quiet window; only the last request in a burst
//! fires, once, when the window has elapsed. The caller supplies the clock so
//! the same logic runs under a host timer or in tests.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Replace any pending request with `value`, due `delay` after `now`.
    pub fn request(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    /// Drop the pending request.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending request fires, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending value if its window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }
}
