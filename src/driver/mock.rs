//! Mock driver implementation for testing
//!
//! This module provides an in-memory stand-in for the automation endpoint. Elements
//! are registered per query, can be scripted to appear after a number of checks
//! or scrolls, and every command is recorded in a journal.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::*;
use super::types::{ElementId, Rect};
use crate::locator::By;
use crate::session::SessionConfig;
use crate::Error;

/// Minimal PNG payload returned by mock screenshots
pub const MOCK_PNG: &[u8] = b"\x89PNG\r\n\x1a\nmock";

/// Command recorded by [`MockDriver`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Find(By),
    Displayed(ElementId),
    Enabled(ElementId),
    Text(ElementId),
    Rect(ElementId),
    Clear(ElementId),
    Click(ElementId),
    SendText(ElementId, String),
    Execute(String, Value),
    Screenshot,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Visibility {
    Always,
    Never,
    AfterChecks(u32),
    AfterScrolls(u32),
}

/// Scripted element
#[derive(Debug, Clone)]
pub struct MockElement {
    text: String,
    rect: Rect,
    enabled: bool,
    stale: bool,
    visibility: Visibility,
}

impl MockElement {
    /// Displayed, enabled element with the given text
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rect: Rect::new(0.0, 0.0, 100.0, 40.0),
            enabled: true,
            stale: false,
            visibility: Visibility::Always,
        }
    }

    /// Element present in the tree but never displayed
    pub fn hidden(text: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Never,
            ..Self::visible(text)
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// First `checks` visibility checks report hidden
    pub fn appears_after_checks(mut self, checks: u32) -> Self {
        self.visibility = Visibility::AfterChecks(checks);
        self
    }

    /// Hidden until `scrolls` scroll commands have been executed
    pub fn revealed_by_scrolls(mut self, scrolls: u32) -> Self {
        self.visibility = Visibility::AfterScrolls(scrolls);
        self
    }

    /// Reference detached from the UI tree
    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    pub fn at(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

#[derive(Debug)]
struct MockEntry {
    element: MockElement,
    displayed_checks: u32,
}

#[derive(Debug, Default)]
struct MockState {
    elements: HashMap<ElementId, MockEntry>,
    index: HashMap<By, Vec<ElementId>>,
    journal: Vec<Command>,
    scrolls: u32,
    next_id: u64,
}

/// In-memory driver
#[derive(Debug)]
pub struct MockDriver {
    session_id: String,
    capabilities: Value,
    state: Mutex<MockState>,
    active: AtomicBool,
    fail_screenshots: AtomicBool,
}

impl MockDriver {
    /// Create a mock session reporting `platform_name`
    pub fn new(platform_name: &str) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            capabilities: json!({ "platformName": platform_name }),
            state: Mutex::new(MockState::default()),
            active: AtomicBool::new(true),
            fail_screenshots: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_active(&self) -> Result<(), Error> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::session_closed(self.session_id.clone()))
        }
    }

    /// Register an element returned by queries for `by`
    pub fn add_element(&self, by: By, element: MockElement) -> ElementId {
        let mut state = self.state();
        state.next_id += 1;
        let id = ElementId::new(format!("mock-{}", state.next_id));
        state.elements.insert(
            id.clone(),
            MockEntry {
                element,
                displayed_checks: 0,
            },
        );
        state.index.entry(by).or_default().push(id.clone());
        id
    }

    /// Drop every element registered for `by`; held references go stale
    pub fn remove_elements(&self, by: &By) {
        let mut state = self.state();
        if let Some(ids) = state.index.remove(by) {
            for id in ids {
                if let Some(entry) = state.elements.get_mut(&id) {
                    entry.element.stale = true;
                }
            }
        }
    }

    pub fn set_displayed(&self, id: &ElementId, displayed: bool) {
        if let Some(entry) = self.state().elements.get_mut(id) {
            entry.element.visibility = if displayed {
                Visibility::Always
            } else {
                Visibility::Never
            };
        }
    }

    pub fn set_text(&self, id: &ElementId, text: impl Into<String>) {
        if let Some(entry) = self.state().elements.get_mut(id) {
            entry.element.text = text.into();
        }
    }

    /// Make subsequent screenshots fail
    pub fn fail_screenshots(&self, fail: bool) {
        self.fail_screenshots.store(fail, Ordering::SeqCst);
    }

    /// Every command received so far
    pub fn journal(&self) -> Vec<Command> {
        self.state().journal.clone()
    }

    /// Named commands executed so far
    pub fn executed(&self) -> Vec<(String, Value)> {
        self.state()
            .journal
            .iter()
            .filter_map(|c| match c {
                Command::Execute(name, params) => Some((name.clone(), params.clone())),
                _ => None,
            })
            .collect()
    }

    /// Text sent to `id`
    pub fn typed_text(&self, id: &ElementId) -> Vec<String> {
        self.state()
            .journal
            .iter()
            .filter_map(|c| match c {
                Command::SendText(target, text) if target == id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn with_element<T>(
        &self,
        command: Command,
        id: &ElementId,
        f: impl FnOnce(&mut MockEntry, u32) -> T,
    ) -> Result<T, Error> {
        self.ensure_active()?;
        let mut state = self.state();
        state.journal.push(command);
        let scrolls = state.scrolls;
        let entry = state
            .elements
            .get_mut(id)
            .ok_or_else(|| Error::remote("no such element", format!("Unknown element {}", id)))?;
        if entry.element.stale {
            return Err(Error::remote(
                "stale element reference",
                format!("Element {} is no longer attached", id),
            ));
        }
        Ok(f(entry, scrolls))
    }
}

impl RemoteDriver for MockDriver {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    fn find_elements(&self, by: &By) -> Result<Vec<ElementId>, Error> {
        self.ensure_active()?;
        let mut state = self.state();
        state.journal.push(Command::Find(by.clone()));
        Ok(state.index.get(by).cloned().unwrap_or_default())
    }

    fn is_displayed(&self, element: &ElementId) -> Result<bool, Error> {
        self.with_element(Command::Displayed(element.clone()), element, |entry, scrolls| {
            entry.displayed_checks += 1;
            match entry.element.visibility {
                Visibility::Always => true,
                Visibility::Never => false,
                Visibility::AfterChecks(n) => entry.displayed_checks > n,
                Visibility::AfterScrolls(n) => scrolls >= n,
            }
        })
    }

    fn is_enabled(&self, element: &ElementId) -> Result<bool, Error> {
        self.with_element(Command::Enabled(element.clone()), element, |entry, _| {
            entry.element.enabled
        })
    }

    fn text(&self, element: &ElementId) -> Result<String, Error> {
        self.with_element(Command::Text(element.clone()), element, |entry, _| {
            entry.element.text.clone()
        })
    }

    fn rect(&self, element: &ElementId) -> Result<Rect, Error> {
        self.with_element(Command::Rect(element.clone()), element, |entry, _| {
            entry.element.rect
        })
    }

    fn clear(&self, element: &ElementId) -> Result<(), Error> {
        self.with_element(Command::Clear(element.clone()), element, |_, _| ())
    }

    fn click(&self, element: &ElementId) -> Result<(), Error> {
        self.with_element(Command::Click(element.clone()), element, |_, _| ())
    }

    fn send_text(&self, element: &ElementId, text: &str) -> Result<(), Error> {
        self.with_element(
            Command::SendText(element.clone(), text.to_string()),
            element,
            |_, _| (),
        )
    }

    fn execute(&self, command: &str, params: Value) -> Result<Value, Error> {
        self.ensure_active()?;
        let mut state = self.state();
        if command.contains("scroll") {
            state.scrolls += 1;
        }
        state
            .journal
            .push(Command::Execute(command.to_string(), params));
        Ok(Value::Null)
    }

    fn screenshot(&self) -> Result<Vec<u8>, Error> {
        self.ensure_active()?;
        self.state().journal.push(Command::Screenshot);
        if self.fail_screenshots.load(Ordering::SeqCst) {
            return Err(Error::remote("unknown error", "Screenshot capture failed"));
        }
        Ok(MOCK_PNG.to_vec())
    }

    fn close(&self) -> Result<(), Error> {
        self.state().journal.push(Command::Close);
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

type Seed = Arc<dyn Fn(&MockDriver) + Send + Sync>;

/// Factory handing out [`MockDriver`] sessions
#[derive(Default)]
pub struct MockDriverFactory {
    reported_platform: Option<String>,
    seed: Option<Seed>,
    failure: Mutex<Option<String>>,
    opened: Mutex<Vec<Arc<MockDriver>>>,
}

impl MockDriverFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `platform` from every session regardless of the request
    pub fn reporting_platform(mut self, platform: impl Into<String>) -> Self {
        self.reported_platform = Some(platform.into());
        self
    }

    /// Populate every new session with elements
    pub fn with_seed<F>(mut self, seed: F) -> Self
    where
        F: Fn(&MockDriver) + Send + Sync + 'static,
    {
        self.seed = Some(Arc::new(seed));
        self
    }

    /// Make the next `open` fail with a session-not-created error
    pub fn fail_next_open(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// Every driver opened so far
    pub fn opened(&self) -> Vec<Arc<MockDriver>> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Most recently opened driver
    pub fn last(&self) -> Option<Arc<MockDriver>> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl DriverFactory for MockDriverFactory {
    fn open(&self, config: &SessionConfig) -> Result<Arc<dyn RemoteDriver>, Error> {
        if let Some(message) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            return Err(Error::remote("session not created", message));
        }

        let platform = self
            .reported_platform
            .clone()
            .unwrap_or_else(|| config.platform.name().to_string());
        let driver = Arc::new(MockDriver::new(&platform));
        if let Some(seed) = &self.seed {
            seed(&driver);
        }

        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(driver.clone());
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appears_after_checks() {
        let driver = MockDriver::new("Android");
        let id = driver.add_element(
            By::accessibility_id("test-LOGIN"),
            MockElement::visible("LOGIN").appears_after_checks(2),
        );

        assert!(!driver.is_displayed(&id).unwrap());
        assert!(!driver.is_displayed(&id).unwrap());
        assert!(driver.is_displayed(&id).unwrap());
    }

    #[test]
    fn test_revealed_by_scrolls() {
        let driver = MockDriver::new("Android");
        let id = driver.add_element(
            By::ui_automator("total"),
            MockElement::visible("Item total: $7.99").revealed_by_scrolls(1),
        );

        assert!(!driver.is_displayed(&id).unwrap());
        driver.execute("mobile: scrollGesture", json!({})).unwrap();
        assert!(driver.is_displayed(&id).unwrap());
    }

    #[test]
    fn test_removed_elements_go_stale() {
        let driver = MockDriver::new("iOS");
        let by = By::accessibility_id("test-Menu");
        let id = driver.add_element(by.clone(), MockElement::visible("Menu"));

        driver.remove_elements(&by);

        assert!(driver.find_elements(&by).unwrap().is_empty());
        assert!(driver.is_displayed(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_closed_driver_rejects_commands() {
        let driver = MockDriver::new("Android");
        driver.close().unwrap();

        assert!(!driver.is_active());
        assert!(matches!(
            driver.find_elements(&By::xpath("//*")),
            Err(Error::SessionClosed(_))
        ));
    }
}
