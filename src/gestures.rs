//! Gesture and action dispatch
//!
//! Abstract actions (tap, type text, scroll) are translated into the endpoint
//! command form of the session's platform. The platform check runs before any
//! remote command, so a session outside the supported set never reaches the
//! endpoint.

use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::{ScrollRegion, TimingConfig};
use crate::locator::{Locator, Strategy};
use crate::session::{Element, Platform, Session};
use crate::wait::Waiter;
use crate::{Error, Result};

/// Scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(Error::action(format!("Unknown scroll direction '{}'", other))),
        }
    }
}

/// Gestures with a per-platform endpoint command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    DoubleTap,
    LongPress,
    Scroll,
}

impl Gesture {
    /// Endpoint command implementing this gesture on `platform`
    pub fn command(self, platform: &Platform) -> Result<&'static str> {
        let command = match (self, platform) {
            (_, Platform::Other(name)) => return Err(Error::unsupported_platform(name.clone())),
            (Gesture::Tap, Platform::Android) => "mobile: clickGesture",
            (Gesture::Tap, Platform::Ios) => "mobile: tap",
            (Gesture::DoubleTap, Platform::Android) => "mobile: doubleClickGesture",
            (Gesture::DoubleTap, Platform::Ios) => "mobile: doubleTap",
            (Gesture::LongPress, Platform::Android) => "mobile: longClickGesture",
            (Gesture::LongPress, Platform::Ios) => "mobile: touchAndHold",
            (Gesture::Scroll, Platform::Android) => "mobile: scrollGesture",
            (Gesture::Scroll, Platform::Ios) => "mobile: scroll",
        };
        Ok(command)
    }
}

/// Issues actions against one session
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    session: Arc<Session>,
    waiter: Waiter,
    keyboard_settle: Duration,
    scroll: ScrollRegion,
}

impl ActionDispatcher {
    pub fn new(session: Arc<Session>, waiter: Waiter, timing: &TimingConfig) -> Self {
        Self {
            session,
            waiter,
            keyboard_settle: timing.keyboard_settle(),
            scroll: timing.scroll,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn ensure_supported(&self) -> Result<&Platform> {
        let platform = self.session.platform();
        if platform.is_supported() {
            Ok(platform)
        } else {
            Err(Error::unsupported_platform(platform.name()))
        }
    }

    fn resolve(&self, target: &Locator) -> Result<Element> {
        self.session
            .find_all(target)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::action(format!("No element matches '{}'", target)))
    }

    /// Tap the first element matching `target`
    #[instrument(skip(self), fields(target = %target))]
    pub fn tap(&self, target: &Locator) -> Result<()> {
        self.ensure_supported()?;
        let element = self.resolve(target)?;
        self.tap_element(&element)
    }

    /// Tap a resolved element
    ///
    /// Android taps the element's centroid; iOS taps the element reference.
    pub fn tap_element(&self, element: &Element) -> Result<()> {
        let platform = self.ensure_supported()?;
        let command = Gesture::Tap.command(platform)?;

        let params = match platform {
            Platform::Android => {
                let (x, y) = element.rect()?.center();
                json!({ "x": x, "y": y })
            }
            _ => json!({ "elementId": element.id().as_str() }),
        };

        debug!("{} on {}", command, element.description());
        self.session.execute(command, params)?;
        Ok(())
    }

    #[instrument(skip(self), fields(target = %target))]
    pub fn double_tap(&self, target: &Locator) -> Result<()> {
        self.element_gesture(Gesture::DoubleTap, target)
    }

    #[instrument(skip(self), fields(target = %target))]
    pub fn long_press(&self, target: &Locator) -> Result<()> {
        self.element_gesture(Gesture::LongPress, target)
    }

    fn element_gesture(&self, gesture: Gesture, target: &Locator) -> Result<()> {
        let platform = self.ensure_supported()?;
        let command = gesture.command(platform)?;
        let element = self.resolve(target)?;
        self.session
            .execute(command, json!({ "elementId": element.id().as_str() }))?;
        Ok(())
    }

    /// Native click on the first element matching `target`
    #[instrument(skip(self), fields(target = %target))]
    pub fn click(&self, target: &Locator) -> Result<()> {
        self.ensure_supported()?;
        self.resolve(target)?.click()
    }

    /// Clear, focus, let the keyboard settle, then type `value`
    #[instrument(skip(self, value), fields(target = %target))]
    pub fn enter_text(&self, target: &Locator, value: &str) -> Result<()> {
        self.ensure_supported()?;
        let element = self.resolve(target)?;
        element.clear()?;
        element.click()?;
        self.waiter.sleep(self.keyboard_settle);
        element.send_text(value)
    }

    /// Swipe over the configured screen region
    #[instrument(skip(self))]
    pub fn scroll(&self, direction: Direction) -> Result<()> {
        let platform = self.ensure_supported()?;
        let command = Gesture::Scroll.command(platform)?;
        let region = self.scroll;

        self.session.execute(
            command,
            json!({
                "left": region.left,
                "top": region.top,
                "width": region.width,
                "height": region.height,
                "direction": direction.as_str(),
                "percent": region.percent,
            }),
        )?;
        Ok(())
    }

    /// Bring `target` on screen
    ///
    /// On Android the locator's query is expected to be a `UiScrollable`
    /// selector, which scrolls as a side effect of the lookup. On iOS the query
    /// is passed to `mobile: scroll`. A locator without a query for the
    /// session's platform is a no-op.
    #[instrument(skip(self), fields(target = %target))]
    pub fn scroll_into_view(&self, target: &Locator) -> Result<()> {
        let platform = self.ensure_supported()?;
        let by = match target.resolve(platform)? {
            Some(by) => by,
            None => return Ok(()),
        };

        match platform {
            Platform::Android => {
                let found = self.session.find_all(target)?;
                debug!("Scrolled to {} ({} matches)", target, found.len());
                Ok(())
            }
            _ => {
                let key = match by.strategy {
                    Strategy::IosPredicate => "predicateString",
                    Strategy::AccessibilityId => "name",
                    _ => {
                        return Err(Error::action(format!(
                            "Cannot scroll to '{}' using {}",
                            target,
                            by.strategy.as_w3c()
                        )))
                    }
                };
                let mut params = serde_json::Map::new();
                params.insert(key.to_string(), json!(by.value));
                params.insert("direction".to_string(), json!("down"));
                params.insert("percent".to_string(), json!(1.0));

                let command = Gesture::Scroll.command(platform)?;
                self.session.execute(command, Value::Object(params))?;
                Ok(())
            }
        }
    }

    /// Run an arbitrary named command
    pub fn execute(&self, command: &str, params: Value) -> Result<Value> {
        self.ensure_supported()?;
        self.session.execute(command, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::driver::{Command, MockDriver, MockElement, Rect};
    use crate::locator::By;

    fn dispatcher(platform: Platform) -> (Arc<MockDriver>, MockClock, ActionDispatcher) {
        let driver = Arc::new(MockDriver::new(platform.name()));
        let session = Arc::new(Session::attach(driver.clone(), platform));
        let clock = MockClock::new();
        let timing = TimingConfig::default();
        let waiter = Waiter::from_timing(Arc::new(clock.clone()), &timing);
        (driver, clock, ActionDispatcher::new(session, waiter, &timing))
    }

    fn login_button() -> Locator {
        Locator::new("login button")
            .android(By::accessibility_id("test-LOGIN"))
            .ios(By::ios_predicate("name == 'test-LOGIN'"))
    }

    #[test]
    fn test_android_tap_uses_centroid() {
        let (driver, _, dispatcher) = dispatcher(Platform::Android);
        driver.add_element(
            By::accessibility_id("test-LOGIN"),
            MockElement::visible("LOGIN").at(Rect::new(100.0, 200.0, 300.0, 51.0)),
        );

        dispatcher.tap(&login_button()).unwrap();

        let executed = driver.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].0, "mobile: clickGesture");
        assert_eq!(executed[0].1, json!({ "x": 250, "y": 225 }));
    }

    #[test]
    fn test_ios_tap_uses_element_reference() {
        let (driver, _, dispatcher) = dispatcher(Platform::Ios);
        let id = driver.add_element(
            By::ios_predicate("name == 'test-LOGIN'"),
            MockElement::visible("LOGIN"),
        );

        dispatcher.tap(&login_button()).unwrap();

        let executed = driver.executed();
        assert_eq!(executed[0].0, "mobile: tap");
        assert_eq!(executed[0].1, json!({ "elementId": id.as_str() }));
    }

    #[test]
    fn test_tap_without_match_is_action_error() {
        let (driver, _, dispatcher) = dispatcher(Platform::Android);

        let err = dispatcher.tap(&login_button()).unwrap_err();
        assert!(matches!(err, Error::Action(_)));
        assert!(driver.executed().is_empty());
    }

    #[test]
    fn test_unsupported_platform_issues_no_command() {
        let (driver, _, dispatcher) = dispatcher(Platform::Other("windows".to_string()));

        let err = dispatcher.tap(&login_button()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform(_)));
        assert!(matches!(
            dispatcher.scroll(Direction::Down),
            Err(Error::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            dispatcher.enter_text(&login_button(), "x"),
            Err(Error::UnsupportedPlatform(_))
        ));
        assert!(driver.journal().is_empty());
    }

    #[test]
    fn test_enter_text_sequence() {
        let (driver, clock, dispatcher) = dispatcher(Platform::Android);
        let username = By::accessibility_id("test-Username");
        let id = driver.add_element(username.clone(), MockElement::visible(""));

        dispatcher
            .enter_text(&Locator::both("username", username), "standard_user")
            .unwrap();

        let journal: Vec<Command> = driver
            .journal()
            .into_iter()
            .filter(|c| !matches!(c, Command::Find(_)))
            .collect();
        assert_eq!(
            journal,
            vec![
                Command::Clear(id.clone()),
                Command::Click(id.clone()),
                Command::SendText(id.clone(), "standard_user".to_string()),
            ]
        );
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_scroll_uses_configured_region() {
        let (driver, _, dispatcher) = dispatcher(Platform::Android);

        dispatcher.scroll(Direction::Down).unwrap();

        let (command, params) = &driver.executed()[0];
        assert_eq!(command, "mobile: scrollGesture");
        assert_eq!(params["left"], 450);
        assert_eq!(params["top"], 1900);
        assert_eq!(params["width"], 400);
        assert_eq!(params["height"], 1300);
        assert_eq!(params["direction"], "down");
        assert_eq!(params["percent"], 0.75);
    }

    #[test]
    fn test_ios_scroll_into_view_by_predicate() {
        let (driver, _, dispatcher) = dispatcher(Platform::Ios);
        let onesie = Locator::new("onesie")
            .ios(By::ios_predicate("label == 'Sauce Labs Onesie'"));

        dispatcher.scroll_into_view(&onesie).unwrap();

        let (command, params) = &driver.executed()[0];
        assert_eq!(command, "mobile: scroll");
        assert_eq!(params["predicateString"], "label == 'Sauce Labs Onesie'");
        assert_eq!(params["direction"], "down");
    }

    #[test]
    fn test_scroll_into_view_without_query_is_noop() {
        let (driver, _, dispatcher) = dispatcher(Platform::Ios);
        let finish = Locator::new("finish").android(By::ui_automator(
            "new UiScrollable(new UiSelector()).scrollIntoView(description(\"test-FINISH\"))",
        ));

        dispatcher.scroll_into_view(&finish).unwrap();
        assert!(driver.journal().is_empty());
    }

    #[test]
    fn test_double_tap_and_long_press_commands() {
        let (driver, _, dispatcher) = dispatcher(Platform::Ios);
        driver.add_element(
            By::ios_predicate("name == 'test-LOGIN'"),
            MockElement::visible("LOGIN"),
        );

        dispatcher.double_tap(&login_button()).unwrap();
        dispatcher.long_press(&login_button()).unwrap();

        let names: Vec<String> = driver.executed().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["mobile: doubleTap", "mobile: touchAndHold"]);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert!("left".parse::<Direction>().is_err());
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(
            Gesture::LongPress.command(&Platform::Android).unwrap(),
            "mobile: longClickGesture"
        );
        assert!(Gesture::Tap
            .command(&Platform::Other("tizen".to_string()))
            .is_err());
    }
}
