// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A small time-windowed rate limiter for diagnostic logging.
//!
//! The merger can be driven at very high frequency (one call per ingress
//! item), so logging on every unknown-key drop or every backlog check would
//! drown real signal in noise. `RateLimiter` tracks how many times it was
//! asked to log within the current window and only lets one message through
//! per window, reporting how many occurrences were folded into it.

use std::time::{Duration, Instant};

/// Gates repeated log lines to at most once per `window`.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    last_emitted: Option<Instant>,
    suppressed: u64,
}

impl RateLimiter {
    /// Creates a rate limiter that allows one log line per `window`.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_emitted: None,
            suppressed: 0,
        }
    }

    /// Records an occurrence. Returns `Some(suppressed)` if this occurrence
    /// should be logged now, where `suppressed` is the number of prior
    /// occurrences that were folded silently into this one; returns `None`
    /// if we are still inside the current window.
    pub fn record(&mut self, now: Instant) -> Option<u64> {
        let should_emit = match self.last_emitted {
            None => true,
            Some(last) => now.duration_since(last) >= self.window,
        };

        if should_emit {
            let suppressed = self.suppressed;
            self.last_emitted = Some(now);
            self.suppressed = 0;
            Some(suppressed)
        } else {
            self.suppressed += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_always_emits() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        assert_eq!(limiter.record(Instant::now()), Some(0));
    }

    #[test]
    fn occurrences_within_window_are_suppressed_and_counted() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        let t0 = Instant::now();
        assert_eq!(limiter.record(t0), Some(0));
        assert_eq!(limiter.record(t0), None);
        assert_eq!(limiter.record(t0), None);
        assert_eq!(limiter.record(t0 + Duration::from_millis(1)), None);
        let emitted = limiter.record(t0 + Duration::from_secs(61));
        assert_eq!(emitted, Some(3));
    }
}
