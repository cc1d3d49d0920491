//! Platform-tagged element queries
//!
//! A [`Locator`] carries one query per platform family side by side; the
//! session picks the one matching its platform when resolving elements.

use crate::session::Platform;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// W3C/Appium element location strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strategy {
    AccessibilityId,
    AndroidUiAutomator,
    XPath,
    IosPredicate,
    IosClassChain,
    Id,
    ClassName,
}

impl Strategy {
    /// Strategy name as sent in the `using` field
    pub fn as_w3c(&self) -> &'static str {
        match self {
            Strategy::AccessibilityId => "accessibility id",
            Strategy::AndroidUiAutomator => "-android uiautomator",
            Strategy::XPath => "xpath",
            Strategy::IosPredicate => "-ios predicate string",
            Strategy::IosClassChain => "-ios class chain",
            Strategy::Id => "id",
            Strategy::ClassName => "class name",
        }
    }
}

/// A single concrete query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct By {
    pub strategy: Strategy,
    pub value: String,
}

impl By {
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Self::new(Strategy::AccessibilityId, value)
    }

    pub fn ui_automator(value: impl Into<String>) -> Self {
        Self::new(Strategy::AndroidUiAutomator, value)
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    pub fn ios_predicate(value: impl Into<String>) -> Self {
        Self::new(Strategy::IosPredicate, value)
    }

    pub fn ios_class_chain(value: impl Into<String>) -> Self {
        Self::new(Strategy::IosClassChain, value)
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_w3c(), self.value)
    }
}

/// Named query with one variant per platform family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    name: String,
    android: Option<By>,
    ios: Option<By>,
}

impl Locator {
    /// Start a locator with no platform queries
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            android: None,
            ios: None,
        }
    }

    /// Same query on both platforms
    pub fn both(name: impl Into<String>, by: By) -> Self {
        Self {
            name: name.into(),
            android: Some(by.clone()),
            ios: Some(by),
        }
    }

    pub fn android(mut self, by: By) -> Self {
        self.android = Some(by);
        self
    }

    pub fn ios(mut self, by: By) -> Self {
        self.ios = Some(by);
        self
    }

    /// Human readable name used in messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Query for `platform`
    ///
    /// `Ok(None)` means the screen has no such element on that platform.
    pub fn resolve(&self, platform: &Platform) -> Result<Option<&By>> {
        match platform {
            Platform::Android => Ok(self.android.as_ref()),
            Platform::Ios => Ok(self.ios.as_ref()),
            Platform::Other(name) => Err(Error::unsupported_platform(name.clone())),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
