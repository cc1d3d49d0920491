//! Session and element handles

use serde_json::Value;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::debug;

use super::capabilities::SessionConfig;
use super::platform::Platform;
use crate::driver::{DriverFactory, ElementId, Rect, RemoteDriver};
use crate::locator::Locator;
use crate::{Error, Result};

/// One live remote connection owned by one thread
#[derive(Debug)]
pub struct Session {
    id: String,
    platform: Platform,
    driver: Arc<dyn RemoteDriver>,
    thread: ThreadId,
}

impl Session {
    /// Open a remote connection for the calling thread
    pub(crate) fn open(config: &SessionConfig, factory: &dyn DriverFactory) -> Result<Self> {
        let driver = factory.open(config)?;
        let platform = driver
            .capabilities()
            .get("platformName")
            .and_then(Value::as_str)
            .map(Platform::parse)
            .unwrap_or_else(|| config.platform.clone());

        Ok(Self::attach(driver, platform))
    }

    /// Wrap an already-open driver
    pub(crate) fn attach(driver: Arc<dyn RemoteDriver>, platform: Platform) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            platform,
            driver,
            thread: thread::current().id(),
        }
    }

    /// Local session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Session id assigned by the endpoint
    pub fn remote_id(&self) -> &str {
        self.driver.session_id()
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Thread the session was opened on
    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub fn is_active(&self) -> bool {
        self.driver.is_active()
    }

    /// Every element matching `locator` on this session's platform
    pub fn find_all(&self, locator: &Locator) -> Result<Vec<Element>> {
        let by = match locator.resolve(&self.platform)? {
            Some(by) => by,
            None => {
                debug!("{} has no query for {}", locator, self.platform);
                return Ok(Vec::new());
            }
        };

        let ids = self.driver.find_elements(by)?;
        Ok(ids
            .into_iter()
            .map(|id| Element::new(id, self.driver.clone(), locator.name()))
            .collect())
    }

    /// First element matching `locator`
    pub fn find(&self, locator: &Locator) -> Result<Element> {
        self.find_all(locator)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::element_not_found(locator.name()))
    }

    /// Run a named endpoint command
    pub fn execute(&self, command: &str, params: Value) -> Result<Value> {
        self.driver.execute(command, params)
    }

    /// PNG screenshot of the device screen
    pub fn screenshot(&self) -> Result<Vec<u8>> {
        self.driver.screenshot()
    }

    /// Terminate the remote connection
    pub fn close(&self) -> Result<()> {
        self.driver.close()
    }
}

/// Resolved element reference
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    driver: Arc<dyn RemoteDriver>,
    description: String,
}

impl Element {
    fn new(id: ElementId, driver: Arc<dyn RemoteDriver>, description: &str) -> Self {
        Self {
            id,
            driver,
            description: description.to_string(),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Name of the locator that produced this element
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_displayed(&self) -> Result<bool> {
        self.driver.is_displayed(&self.id)
    }

    pub fn is_enabled(&self) -> Result<bool> {
        self.driver.is_enabled(&self.id)
    }

    pub fn text(&self) -> Result<String> {
        self.driver.text(&self.id)
    }

    pub fn rect(&self) -> Result<Rect> {
        self.driver.rect(&self.id)
    }

    pub fn clear(&self) -> Result<()> {
        self.driver.clear(&self.id)
    }

    pub fn click(&self) -> Result<()> {
        self.driver.click(&self.id)
    }

    pub fn send_text(&self, text: &str) -> Result<()> {
        self.driver.send_text(&self.id, text)
    }
}
