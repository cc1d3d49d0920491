//! Injectable time source
//!
//! Waits block the calling thread between polls. Production code uses
//! [`SystemClock`]; tests inject [`MockClock`], whose `sleep` advances virtual
//! time instantly so poll schedules can be asserted exactly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of "now" and blocking sleeps
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current monotonic instant
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock for tests
#[derive(Clone, Debug)]
pub struct MockClock {
    origin: Instant,
    elapsed: Arc<Mutex<Duration>>,
    sleeps: Arc<AtomicU64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            sleeps: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move virtual time forward without counting a sleep
    pub fn advance(&self, delta: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed = elapsed.saturating_add(delta);
    }

    /// Virtual time since construction
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of `sleep` calls so far
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_sleep_advances() {
        let clock = MockClock::new();
        let start = clock.now();

        clock.sleep(Duration::from_secs(2));
        clock.sleep(Duration::from_secs(3));

        assert_eq!(clock.now() - start, Duration::from_secs(5));
        assert_eq!(clock.sleep_count(), 2);
    }

    #[test]
    fn test_mock_clock_shared_between_clones() {
        let clock = MockClock::new();
        let other = clock.clone();

        other.advance(Duration::from_millis(250));
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
        assert_eq!(clock.sleep_count(), 0);
    }
}
