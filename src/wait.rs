//! Polling wait engine
//!
//! Repeatedly evaluates a predicate against the remote UI until it holds or a
//! deadline passes. The calling thread blocks for each poll interval.
//!
//! Two call modes are offered on top of one loop:
//! - [`Waiter::check`] (boolean mode) collapses every failure to `false`
//! - [`Waiter::verify`] (asserting mode) raises [`Error::WaitTimeout`] with the
//!   caller's message, treating "element not found" as "not yet"

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::TimingConfig;
use crate::{Error, Result};

/// Smallest poll interval accepted; a zero interval would spin
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Result of one predicate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Satisfied,
    Unsatisfied,
    NotFound,
}

impl Probe {
    /// Classify a predicate result; errors other than "not found" pass through
    pub fn from_result(result: Result<bool>) -> Result<Probe> {
        match result {
            Ok(true) => Ok(Probe::Satisfied),
            Ok(false) => Ok(Probe::Unsatisfied),
            Err(e) if e.is_not_found() => Ok(Probe::NotFound),
            Err(e) => Err(e),
        }
    }
}

/// How a wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied { polls: u32, elapsed: Duration },
    NotFound { polls: u32, elapsed: Duration },
    TimedOut { polls: u32, elapsed: Duration },
}

impl WaitOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitOutcome::Satisfied { .. })
    }

    /// Number of predicate evaluations
    pub fn polls(&self) -> u32 {
        match *self {
            WaitOutcome::Satisfied { polls, .. }
            | WaitOutcome::NotFound { polls, .. }
            | WaitOutcome::TimedOut { polls, .. } => polls,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match *self {
            WaitOutcome::Satisfied { elapsed, .. }
            | WaitOutcome::NotFound { elapsed, .. }
            | WaitOutcome::TimedOut { elapsed, .. } => elapsed,
        }
    }
}

/// Parameters of one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSpec {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub message: Option<String>,
}

impl WaitSpec {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            message: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("Condition not met within {:?}", self.timeout))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Boolean,
    Asserting,
}

/// Runs polling waits against an injectable clock
#[derive(Debug, Clone)]
pub struct Waiter {
    clock: Arc<dyn Clock>,
    defaults: WaitSpec,
}

impl Waiter {
    /// Create a waiter with explicit defaults
    pub fn new(clock: Arc<dyn Clock>, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            clock,
            defaults: WaitSpec::new(timeout, poll_interval),
        }
    }

    /// Create a waiter using the configured default policy
    pub fn from_timing(clock: Arc<dyn Clock>, timing: &TimingConfig) -> Self {
        Self::new(clock, timing.wait_timeout(), timing.poll_interval())
    }

    /// Wall-clock waiter
    pub fn system(timing: &TimingConfig) -> Self {
        Self::from_timing(Arc::new(SystemClock), timing)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Default spec (default timeout and poll interval, no message)
    pub fn spec(&self) -> WaitSpec {
        self.defaults.clone()
    }

    /// Default poll interval with an overridden timeout
    pub fn within(&self, timeout: Duration) -> WaitSpec {
        self.spec().with_timeout(timeout)
    }

    /// Run the poll loop and report how it ended
    ///
    /// Errors other than "not found" raised by the predicate are returned as-is.
    pub fn poll<F>(&self, spec: &WaitSpec, predicate: F) -> Result<WaitOutcome>
    where
        F: FnMut() -> Result<bool>,
    {
        self.run(spec, Mode::Asserting, predicate)
    }

    /// Boolean mode: `true` once the predicate holds, `false` on timeout or "not found"
    pub fn check<F>(&self, spec: &WaitSpec, predicate: F) -> bool
    where
        F: FnMut() -> Result<bool>,
    {
        match self.run(spec, Mode::Boolean, predicate) {
            Ok(outcome) => outcome.is_satisfied(),
            Err(e) => {
                warn!("Wait predicate failed: {}", e);
                false
            }
        }
    }

    /// Asserting mode: `Ok` once the predicate holds, [`Error::WaitTimeout`] at the deadline
    pub fn verify<F>(&self, spec: &WaitSpec, predicate: F) -> Result<()>
    where
        F: FnMut() -> Result<bool>,
    {
        match self.run(spec, Mode::Asserting, predicate)? {
            WaitOutcome::Satisfied { .. } => Ok(()),
            outcome => {
                let message = spec.failure_message();
                debug!(
                    "Wait failed after {} polls in {:?}: {}",
                    outcome.polls(),
                    outcome.elapsed(),
                    message
                );
                Err(Error::wait_timeout(message))
            }
        }
    }

    /// Fixed delay
    pub fn sleep(&self, duration: Duration) {
        self.clock.sleep(duration);
    }

    /// Scroll until `visible` holds, at most `max_attempts` scrolls
    ///
    /// Returns the number of scrolls performed. Exhausting the bound raises
    /// [`Error::WaitTimeout`].
    pub fn scroll_until_visible<S, V>(
        &self,
        max_attempts: u32,
        message: &str,
        mut scroll: S,
        mut visible: V,
    ) -> Result<u32>
    where
        S: FnMut() -> Result<()>,
        V: FnMut() -> bool,
    {
        for attempt in 0..=max_attempts {
            if visible() {
                return Ok(attempt);
            }
            if attempt < max_attempts {
                debug!("Scrolling ({}/{}): {}", attempt + 1, max_attempts, message);
                scroll()?;
            }
        }

        Err(Error::wait_timeout(format!(
            "{} (not visible after {} scrolls)",
            message, max_attempts
        )))
    }

    fn run<F>(&self, spec: &WaitSpec, mode: Mode, mut predicate: F) -> Result<WaitOutcome>
    where
        F: FnMut() -> Result<bool>,
    {
        let start = self.clock.now();
        // An unrepresentable deadline means the wait never expires
        let deadline = start.checked_add(spec.timeout);
        let interval = spec.poll_interval.max(MIN_POLL_INTERVAL);
        let mut polls = 0u32;

        loop {
            polls += 1;
            let probe = Probe::from_result(predicate())?;
            let now = self.clock.now();
            let elapsed = now.saturating_duration_since(start);

            match probe {
                Probe::Satisfied => return Ok(WaitOutcome::Satisfied { polls, elapsed }),
                Probe::NotFound if mode == Mode::Boolean => {
                    return Ok(WaitOutcome::NotFound { polls, elapsed })
                }
                Probe::NotFound | Probe::Unsatisfied => {}
            }

            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    return Ok(WaitOutcome::TimedOut { polls, elapsed })
                }
                // Last sleep stops at the deadline
                Some(deadline) => interval.min(deadline - now),
                None => interval,
            };
            self.clock.sleep(pause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn waiter(clock: &MockClock) -> Waiter {
        Waiter::new(Arc::new(clock.clone()), secs(10), secs(2))
    }

    #[test]
    fn test_true_predicate_returns_without_sleeping() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        assert!(waiter.check(&waiter.spec(), || Ok(true)));
        assert_eq!(clock.sleep_count(), 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);

        waiter.verify(&waiter.spec(), || Ok(true)).unwrap();
        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn test_becomes_true_after_three_intervals() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        let mut calls = 0;
        let outcome = waiter
            .poll(&waiter.spec(), || {
                calls += 1;
                Ok(calls > 3)
            })
            .unwrap();

        assert!(outcome.is_satisfied());
        assert_eq!(outcome.polls(), 4);
        assert_eq!(clock.elapsed(), secs(6));
    }

    #[test]
    fn test_unbounded_timeout_still_polls() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);
        let spec = waiter.within(Duration::MAX);

        let mut calls = 0;
        let outcome = waiter
            .poll(&spec, || {
                calls += 1;
                Ok(calls > 2)
            })
            .unwrap();

        assert!(outcome.is_satisfied());
        assert_eq!(clock.elapsed(), secs(4));
    }

    #[test]
    fn test_configured_timeout_beyond_clock_range() {
        let mut timing = TimingConfig::default();
        timing.wait_timeout_secs = u64::MAX;
        let waiter = Waiter::system(&timing);

        assert!(waiter.check(&waiter.spec(), || Ok(true)));
        waiter.verify(&waiter.spec(), || Ok(true)).unwrap();
    }

    #[test]
    fn test_boolean_mode_times_out_at_deadline() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        assert!(!waiter.check(&waiter.spec(), || Ok(false)));
        assert_eq!(clock.elapsed(), secs(10));
    }

    #[test]
    fn test_asserting_mode_raises_with_message() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);
        let spec = waiter
            .within(secs(5))
            .with_message("Login button is not clickable");

        let err = waiter.verify(&spec, || Ok(false)).unwrap_err();

        assert!(matches!(err, Error::WaitTimeout(ref m) if m == "Login button is not clickable"));
        assert_eq!(clock.elapsed(), secs(5));
        assert!(clock.elapsed() < secs(5) + secs(2));
    }

    #[test]
    fn test_boolean_mode_stops_on_not_found() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        let found = waiter.check(&waiter.spec(), || {
            Err(Error::remote("no such element", "gone"))
        });

        assert!(!found);
        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn test_asserting_mode_keeps_polling_through_not_found() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        let mut calls = 0;
        waiter
            .verify(&waiter.spec(), || {
                calls += 1;
                if calls < 3 {
                    Err(Error::element_not_found("banner"))
                } else {
                    Ok(true)
                }
            })
            .unwrap();

        assert_eq!(calls, 3);
        assert_eq!(clock.elapsed(), secs(4));
    }

    #[test]
    fn test_asserting_mode_propagates_other_errors() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        let err = waiter
            .verify(&waiter.spec(), || Err(Error::unsupported_platform("windows")))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform(_)));
        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn test_asserting_mode_not_found_until_deadline() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);
        let spec = waiter.within(secs(2)).with_message("Cart button is not displayed or clickable.");

        let err = waiter
            .verify(&spec, || Err(Error::element_not_found("cart")))
            .unwrap_err();
        assert!(matches!(err, Error::WaitTimeout(_)));
        assert_eq!(clock.elapsed(), secs(2));
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let spec = WaitSpec::new(secs(1), Duration::ZERO);
        assert_eq!(spec.poll_interval, MIN_POLL_INTERVAL);
    }

    #[test]
    fn test_scroll_until_visible_counts_scrolls() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        let scrolls = std::cell::Cell::new(0);
        let performed = waiter.scroll_until_visible(
            10,
            "Item total",
            || {
                scrolls.set(scrolls.get() + 1);
                Ok(())
            },
            || scrolls.get() >= 2,
        );

        assert_eq!(performed.unwrap(), 2);
    }

    #[test]
    fn test_scroll_until_visible_is_bounded() {
        let clock = MockClock::new();
        let waiter = waiter(&clock);

        let mut scrolls = 0;
        let err = waiter
            .scroll_until_visible(
                3,
                "Item total not displayed",
                || {
                    scrolls += 1;
                    Ok(())
                },
                || false,
            )
            .unwrap_err();

        assert_eq!(scrolls, 3);
        assert!(matches!(err, Error::WaitTimeout(ref m) if m.starts_with("Item total not displayed")));
    }
}
