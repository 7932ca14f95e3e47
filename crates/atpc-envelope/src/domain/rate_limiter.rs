//! # Rate Limiter
//!
//! Token bucket rate limiter for the external endpoint surface. Not part of
//! the wire protocol itself, but a concrete primitive any HTTP binding needs
//! to enforce a per-DID request ceiling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;

pub struct RateLimiter {
    capacity: u64,
    refill_per_sec: u64,
    tokens: AtomicU64,
    last_refill: Mutex<Instant>,
}

impl RateLimiter {
    /// `capacity` is the maximum burst size; `refill_per_sec` tokens are
    /// added back per second.
    pub fn new(capacity: u64, refill_per_sec: u64) -> Self {
        Self {
            capacity,
            refill_per_sec,
            tokens: AtomicU64::new(capacity),
            last_refill: Mutex::new(Instant::now()),
        }
    }

    /// 100 requests/minute per DID, expressed as a token bucket: burst of
    /// 100, refilling at ~1.67 tokens/sec.
    pub fn per_minute(requests_per_minute: u64) -> Self {
        Self::new(requests_per_minute, requests_per_minute.max(1))
    }

    pub fn try_acquire(&self) -> bool {
        self.refill();
        loop {
            let current = self.tokens.load(Ordering::Relaxed);
            if current == 0 {
                return false;
            }
            if self
                .tokens
                .compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    fn refill(&self) {
        let mut last = self.last_refill.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(*last);

        // Refill rate is tokens/minute; convert to a fractional-seconds add.
        let tokens_to_add = (elapsed.as_secs_f64() * self.refill_per_sec as f64 / 60.0) as u64;

        if tokens_to_add > 0 {
            *last = now;
            loop {
                let current = self.tokens.load(Ordering::Relaxed);
                let new_value = (current + tokens_to_add).min(self.capacity);
                if self
                    .tokens
                    .compare_exchange(current, new_value, Ordering::SeqCst, Ordering::Relaxed)
                    .is_ok()
                {
                    break;
                }
            }
        }
    }

    pub fn available(&self) -> u64 {
        self.refill();
        self.tokens.load(Ordering::Relaxed)
    }

    pub fn is_limited(&self) -> bool {
        self.available() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_within_capacity() {
        let limiter = RateLimiter::new(5, 60);
        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
    }

    #[test]
    fn blocks_over_capacity() {
        let limiter = RateLimiter::new(3, 60);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn per_minute_preset_matches_requested_burst() {
        let limiter = RateLimiter::per_minute(100);
        assert_eq!(limiter.available(), 100);
    }

    #[test]
    fn is_limited_reflects_exhaustion() {
        let limiter = RateLimiter::new(1, 0);
        assert!(!limiter.is_limited());
        limiter.try_acquire();
        assert!(limiter.is_limited());
    }
}
