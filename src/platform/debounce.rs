//! Trailing-edge debouncer
//!
//! Collapses a burst of calls into one value that is released once no new
//! call has arrived for the configured window. Time is passed in by the
//! caller (milliseconds), so this works identically under `requestAnimationFrame`
//! timestamps and in tests.

/// Holds the most recent value of a burst until it settles
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            pending: None,
        }
    }

    /// Record a call; replaces any pending value and restarts the window
    pub fn call(&mut self, value: T, now_ms: f64) {
        self.pending = Some((value, now_ms + self.window_ms));
    }

    /// Release the pending value if its window has elapsed
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now_ms >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending value without releasing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
