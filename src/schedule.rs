//! Deadline-based debounce and throttle, polled from the UI tick.
//!
//! Both take the current `Instant` explicitly so the main loop and tests
//! drive time the same way.

use std::time::{Duration, Instant};

/// Trailing-edge debounce: only the last value of a burst is delivered, once
/// `delay` has passed without another call.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a call, cancelling and restarting any pending one.
    pub fn call(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Deliver the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Rate limit: the first call of a window fires immediately, later calls in
/// the same window collapse into one trailing call fired when it closes.
#[derive(Debug)]
pub struct Throttler<T> {
    limit: Duration,
    window_end: Option<Instant>,
    trailing: Option<T>,
}

impl<T> Throttler<T> {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            window_end: None,
            trailing: None,
        }
    }

    /// Record a call. Returns the value when it may fire right away.
    pub fn call(&mut self, value: T, now: Instant) -> Option<T> {
        match self.window_end {
            Some(end) if now < end => {
                self.trailing = Some(value);
                None
            }
            _ => {
                self.window_end = Some(now + self.limit);
                self.trailing = None;
                Some(value)
            }
        }
    }

    /// Close an elapsed window, delivering the trailing call if one was made.
    ///
    /// A delivered trailing call opens a new window.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let end = self.window_end?;
        if now < end {
            return None;
        }
        match self.trailing.take() {
            Some(value) => {
                self.window_end = Some(now + self.limit);
                Some(value)
            }
            None => {
                self.window_end = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn debounce_delivers_last_value_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(150));
        d.call("g", t0);
        d.call("gi", t0 + ms(100));
        d.call("git", t0 + ms(200));
        assert_eq!(d.poll(t0 + ms(300)), None);
        assert_eq!(d.poll(t0 + ms(350)), Some("git"));
        assert_eq!(d.poll(t0 + ms(500)), None);
    }

    #[test]
    fn debounce_cancel_drops_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(10));
        d.call(1, t0);
        d.cancel();
        assert_eq!(d.poll(t0 + ms(50)), None);
    }

    #[test]
    fn throttle_fires_leading_and_keeps_trailing() {
        let t0 = Instant::now();
        let mut th = Throttler::new(ms(120));
        assert_eq!(th.call(1, t0), Some(1));
        assert_eq!(th.call(2, t0 + ms(10)), None);
        assert_eq!(th.call(3, t0 + ms(20)), None);
        assert_eq!(th.poll(t0 + ms(100)), None);
        assert_eq!(th.poll(t0 + ms(120)), Some(3));
        // The trailing call opened a new window.
        assert_eq!(th.call(4, t0 + ms(130)), None);
        assert_eq!(th.poll(t0 + ms(240)), Some(4));
        assert_eq!(th.poll(t0 + ms(400)), None);
        assert_eq!(th.call(5, t0 + ms(401)), Some(5));
    }

    #[test]
    fn throttle_without_trailing_call_just_reopens() {
        let t0 = Instant::now();
        let mut th = Throttler::new(ms(50));
        assert_eq!(th.call("a", t0), Some("a"));
        assert_eq!(th.poll(t0 + ms(60)), None);
        assert_eq!(th.call("b", t0 + ms(61)), Some("b"));
    }
}
