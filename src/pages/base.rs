//! Shared page operations
//!
//! [`PageContext`] bundles what every page object needs: the session, the
//! action dispatcher, the waiter, the timing tunables and the report sink.
//! Page objects borrow it for the duration of one test case.

use std::sync::Arc;
use std::time::Duration;

use crate::config::TimingConfig;
use crate::gestures::ActionDispatcher;
use crate::locator::Locator;
use crate::report::ReportSink;
use crate::session::Session;
use crate::wait::Waiter;
use crate::{Error, Result};

/// Per-test context shared by the page objects
#[derive(Clone)]
pub struct PageContext {
    session: Arc<Session>,
    actions: ActionDispatcher,
    waiter: Waiter,
    timing: TimingConfig,
    sink: Arc<dyn ReportSink>,
}

impl PageContext {
    pub fn new(
        session: Arc<Session>,
        waiter: Waiter,
        timing: TimingConfig,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        let actions = ActionDispatcher::new(session.clone(), waiter.clone(), &timing);
        Self {
            session,
            actions,
            waiter,
            timing,
            sink,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn actions(&self) -> &ActionDispatcher {
        &self.actions
    }

    pub fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// First matching element is displayed
    fn displayed(&self, locator: &Locator) -> Result<bool> {
        match self.session.find_all(locator)?.first() {
            Some(element) => element.is_displayed(),
            None => Ok(false),
        }
    }

    /// First matching element is displayed and enabled
    fn clickable(&self, locator: &Locator) -> Result<bool> {
        match self.session.find_all(locator)?.first() {
            Some(element) => Ok(element.is_displayed()? && element.is_enabled()?),
            None => Ok(false),
        }
    }

    /// Boolean-mode visibility check with the default timeout
    pub fn is_displayed(&self, locator: &Locator) -> bool {
        self.is_displayed_within(locator, self.timing.wait_timeout())
    }

    pub fn is_displayed_within(&self, locator: &Locator, timeout: Duration) -> bool {
        self.waiter
            .check(&self.waiter.within(timeout), || self.displayed(locator))
    }

    /// Asserting-mode visibility check with the default timeout
    pub fn verify_displayed(&self, locator: &Locator, message: &str) -> Result<()> {
        self.verify_displayed_within(locator, message, self.timing.wait_timeout())
    }

    pub fn verify_displayed_within(
        &self,
        locator: &Locator,
        message: &str,
        timeout: Duration,
    ) -> Result<()> {
        let spec = self.waiter.within(timeout).with_message(message);
        self.waiter.verify(&spec, || self.displayed(locator))
    }

    /// Asserting-mode displayed-and-enabled check with the default timeout
    pub fn verify_clickable(&self, locator: &Locator, message: &str) -> Result<()> {
        self.verify_clickable_within(locator, message, self.timing.wait_timeout())
    }

    pub fn verify_clickable_within(
        &self,
        locator: &Locator,
        message: &str,
        timeout: Duration,
    ) -> Result<()> {
        let spec = self.waiter.within(timeout).with_message(message);
        self.waiter.verify(&spec, || self.clickable(locator))
    }

    /// Boolean check with the validation timeout, failing with `message`
    pub fn validate_displayed(&self, locator: &Locator, message: &str) -> Result<()> {
        if self.is_displayed_within(locator, self.timing.validate_timeout()) {
            Ok(())
        } else {
            Err(Error::wait_timeout(message))
        }
    }

    /// Visible text of the first matching element
    pub fn text_of(&self, locator: &Locator) -> Result<String> {
        self.session.find(locator)?.text()
    }

    /// Fixed delay
    pub fn pause(&self, duration: Duration) {
        self.waiter.sleep(duration);
    }

    pub fn pass(&self, message: &str) {
        self.sink.pass(message);
    }

    pub fn info(&self, message: &str) {
        self.sink.info(message);
    }

    /// Run `body`; on failure report `failure` with the reason and propagate
    pub fn step<T, F>(&self, failure: &str, body: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        body().map_err(|e| {
            self.sink.fail(&format!("{}. Reason: {}", failure, e));
            e
        })
    }
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("session", &self.session.id())
            .field("platform", self.session.platform())
            .finish()
    }
}
