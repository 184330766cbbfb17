use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Sliding window approximated from the previous and current fixed windows.
#[derive(Debug)]
pub struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    /// Counts the request if it fits and returns the decision.
    fn allow(&mut self, now: Instant) -> RateDecision {
        self.roll(now);
        self.last_seen = now;

        let elapsed = now.duration_since(self.current_window_start).as_secs_f64();
        let window = self.window_size.as_secs_f64();
        let weight = (elapsed / window).min(1.0);
        let effective = (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64);

        if effective + 1.0 <= self.limit as f64 + 1e-9 {
            self.current_count += 1;
            let remaining = (self.limit as f64 - effective - 1.0).max(0.0).floor() as u64;
            return RateDecision::Allowed { remaining };
        }

        // Wait until enough of the previous window has slid out, or until
        // the current window closes when it alone is full.
        let retry_after = if self.current_count >= self.limit || self.prev_count == 0 {
            window - elapsed
        } else {
            let excess = effective + 1.0 - self.limit as f64;
            (excess / self.prev_count as f64) * window
        };

        RateDecision::Limited { retry_after_secs: (retry_after.ceil() as u64).max(1) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u64 },
    Limited { retry_after_secs: u64 },
}

type Key = String;

/// Per-client sliding-window limiter.
#[derive(Clone)]
pub struct ClientRateLimiter {
    map: Arc<DashMap<Key, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u64,
}

impl ClientRateLimiter {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit,
        }
    }

    fn get_window(&self, key: &str, now: Instant) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        match self.map.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let window = Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, now)));
                entry.insert(window.clone());
                window
            }
        }
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let window = self.get_window(key, now);
        let mut guard = window.lock();
        guard.allow(now)
    }

    /// Drops clients not seen for `ttl`. Returns how many were removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, window| now.duration_since(window.lock().last_seen) < ttl);
        before.saturating_sub(self.map.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_after_quota() {
        let limiter = ClientRateLimiter::new(3, Duration::from_secs(3600));
        let now = Instant::now();

        assert_eq!(limiter.check_at("10.0.0.1", now), RateDecision::Allowed { remaining: 2 });
        assert_eq!(limiter.check_at("10.0.0.1", now), RateDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at("10.0.0.1", now), RateDecision::Allowed { remaining: 0 });
        assert!(matches!(limiter.check_at("10.0.0.1", now), RateDecision::Limited { .. }));

        // Other clients are unaffected.
        assert!(matches!(limiter.check_at("10.0.0.2", now), RateDecision::Allowed { .. }));
    }

    #[test]
    fn window_slides_open_again() {
        let limiter = ClientRateLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();

        limiter.check_at("a", start);
        limiter.check_at("a", start);
        assert!(matches!(limiter.check_at("a", start), RateDecision::Limited { .. }));

        let later = start + Duration::from_secs(25);
        assert!(matches!(limiter.check_at("a", later), RateDecision::Allowed { .. }));
    }

    #[test]
    fn evicts_idle_clients() {
        let limiter = ClientRateLimiter::new(2, Duration::from_secs(10));
        limiter.check("a");
        assert_eq!(limiter.tracked_clients(), 1);
        assert_eq!(limiter.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(limiter.evict_idle(Duration::ZERO), 1);
    }
}
