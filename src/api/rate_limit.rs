//! Per-user request throttle for the boundary layer.
//!
//! One request per interval per user, mirroring the host-facing AJAX
//! throttle. This is a boundary concern only; the services themselves are
//! not rate limited.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    min_interval: Duration,
    last_seen: Mutex<HashMap<i64, Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// The default boundary policy: one request per second per user.
    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Whether this user's request may proceed. Allowed requests update the
    /// user's timestamp; denied ones do not.
    pub fn allow(&self, user: i64) -> bool {
        let now = Instant::now();
        let mut last_seen = self.last_seen.lock().unwrap();

        if let Some(last) = last_seen.get(&user) {
            if now.duration_since(*last) < self.min_interval {
                return false;
            }
        }

        last_seen.insert(user, now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_allowed() {
        let limiter = RateLimiter::per_second();
        assert!(limiter.allow(1));
    }

    #[test]
    fn test_rapid_second_request_denied() {
        let limiter = RateLimiter::per_second();
        assert!(limiter.allow(1));
        assert!(!limiter.allow(1));
    }

    #[test]
    fn test_users_are_independent() {
        let limiter = RateLimiter::per_second();
        assert!(limiter.allow(1));
        assert!(limiter.allow(2));
    }

    #[test]
    fn test_allowed_again_after_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(10));
        assert!(limiter.allow(1));
        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.allow(1));
    }

    #[test]
    fn test_zero_interval_never_limits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        assert!(limiter.allow(1));
        assert!(limiter.allow(1));
    }
}
