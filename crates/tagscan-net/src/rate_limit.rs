//! Request rate limiting
//!
//! Two limits apply: a minimum gap between consecutive requests and a cap on
//! requests per one-minute window.

use std::time::{Duration, Instant};

/// Length of a counting window.
pub const WINDOW: Duration = Duration::from_secs(60);

/// Default cap on requests per window.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 120;

/// Tracks request times and decides whether another request may go out.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests_per_minute: u32,
    min_interval: Duration,
    last_request: Option<Instant>,
    window_start: Instant,
    window_count: u32,
}

/// Why [`RateLimiter::check`] would hold a request back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// The previous request was too recent; wait this long.
    Interval(Duration),
    /// The window is full; wait this long.
    Window(Duration),
}

impl Throttle {
    pub fn delay(self) -> Duration {
        match self {
            Throttle::Interval(delay) | Throttle::Window(delay) => delay,
        }
    }
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32, min_interval: Duration) -> Self {
        Self {
            requests_per_minute,
            min_interval,
            last_request: None,
            window_start: Instant::now(),
            window_count: 0,
        }
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Requests counted in the current window.
    pub fn window_count(&self) -> u32 {
        self.window_count
    }

    /// Check both limits, sleeping through them when `wait` is set.
    ///
    /// Returns `false` only when a limit applies and `wait` is not set.
    pub fn check(&self, wait: bool) -> bool {
        tracing::debug!(wait, "checking rate limiting");

        if let Some(throttle) = self.interval_throttle(Instant::now()) {
            if !wait {
                tracing::debug!(?throttle, "not waiting for rate limiting, aborting");
                return false;
            }
            tracing::debug!(?throttle, "waiting for rate limiting");
            std::thread::sleep(throttle.delay());
        }

        if let Some(throttle) = self.window_throttle(Instant::now()) {
            if !wait {
                tracing::debug!(?throttle, "not waiting for rate limiting, aborting");
                return false;
            }
            tracing::debug!(?throttle, "waiting for rate limiting");
            std::thread::sleep(throttle.delay());
        }

        true
    }

    /// Pending throttle at `now`, interval first.
    pub fn throttle_at(&self, now: Instant) -> Option<Throttle> {
        self.interval_throttle(now).or_else(|| self.window_throttle(now))
    }

    fn interval_throttle(&self, now: Instant) -> Option<Throttle> {
        let last = self.last_request?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < self.min_interval).then(|| Throttle::Interval(self.min_interval - elapsed))
    }

    fn window_throttle(&self, now: Instant) -> Option<Throttle> {
        if self.window_count < self.requests_per_minute {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.window_start);
        let delay = WINDOW.checked_sub(elapsed).filter(|d| !d.is_zero());
        Some(Throttle::Window(delay.unwrap_or(self.min_interval)))
    }

    /// Count a request that was started at `request_time`.
    pub fn record(&mut self, request_time: Instant) {
        self.record_at(request_time, Instant::now());
    }

    /// [`RateLimiter::record`] with an explicit completion time.
    pub fn record_at(&mut self, request_time: Instant, now: Instant) {
        self.last_request = Some(now);
        if request_time.saturating_duration_since(self.window_start) > WINDOW {
            tracing::debug!("reset rate limiting window");
            self.window_start = now;
            self.window_count = 0;
        }
        self.window_count += 1;
        tracing::debug!(count = self.window_count, "updated rate limiting");
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_MINUTE, Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_limiter_allows() {
        let limiter = RateLimiter::default();
        assert!(limiter.check(false));
        assert_eq!(limiter.throttle_at(Instant::now()), None);
    }

    #[test]
    fn test_min_interval_blocks_without_wait() {
        let mut limiter = RateLimiter::new(120, Duration::from_secs(30));
        let now = Instant::now();
        limiter.record_at(now, now);
        assert!(!limiter.check(false));
        match limiter.throttle_at(now + Duration::from_secs(10)) {
            Some(Throttle::Interval(delay)) => assert_eq!(delay, Duration::from_secs(20)),
            other => panic!("expected interval throttle, got {other:?}"),
        }
        assert_eq!(limiter.throttle_at(now + Duration::from_secs(30)), None);
    }

    #[test]
    fn test_window_cap_blocks_without_wait() {
        let mut limiter = RateLimiter::new(2, Duration::ZERO);
        let now = Instant::now();
        limiter.record_at(now, now);
        limiter.record_at(now, now);
        assert_eq!(limiter.window_count(), 2);
        assert!(!limiter.check(false));
        assert!(matches!(
            limiter.throttle_at(now + Duration::from_secs(1)),
            Some(Throttle::Window(_))
        ));
    }

    #[test]
    fn test_window_resets_after_a_minute() {
        let mut limiter = RateLimiter::new(2, Duration::ZERO);
        let start = Instant::now();
        limiter.record_at(start, start);
        limiter.record_at(start, start);

        let later = start + WINDOW + Duration::from_secs(5);
        limiter.record_at(later, later);
        assert_eq!(limiter.window_count(), 1);
        assert_eq!(limiter.throttle_at(later), None);
    }

    #[test]
    fn test_wait_sleeps_through_short_interval() {
        let mut limiter = RateLimiter::new(120, Duration::from_millis(20));
        let now = Instant::now();
        limiter.record_at(now, now);
        let before = Instant::now();
        assert!(limiter.check(true));
        assert!(before.elapsed() >= Duration::from_millis(10));
    }
}
