//! Remote automation endpoint traits
//!
//! This module defines the contract the suite needs from a remote UI-automation
//! endpoint. All calls block the calling thread until the endpoint answers.

use serde_json::Value;
use std::sync::Arc;

use super::types::{ElementId, Rect};
use crate::locator::By;
use crate::session::SessionConfig;
use crate::Error;

/// One open connection to the automation endpoint
pub trait RemoteDriver: Send + Sync + std::fmt::Debug {
    /// Endpoint-assigned session id
    fn session_id(&self) -> &str;

    /// Capabilities the endpoint reported when the session was created
    fn capabilities(&self) -> &Value;

    /// Query elements; an empty result is not an error
    fn find_elements(&self, by: &By) -> Result<Vec<ElementId>, Error>;

    /// Element visibility
    fn is_displayed(&self, element: &ElementId) -> Result<bool, Error>;

    /// Element enabled state
    fn is_enabled(&self, element: &ElementId) -> Result<bool, Error>;

    /// Visible text of the element
    fn text(&self, element: &ElementId) -> Result<String, Error>;

    /// Bounding box of the element
    fn rect(&self, element: &ElementId) -> Result<Rect, Error>;

    /// Clear an editable element
    fn clear(&self, element: &ElementId) -> Result<(), Error>;

    /// Native click
    fn click(&self, element: &ElementId) -> Result<(), Error>;

    /// Type text into the element
    fn send_text(&self, element: &ElementId, text: &str) -> Result<(), Error>;

    /// Run a named command (e.g. `mobile: scrollGesture`)
    fn execute(&self, command: &str, params: Value) -> Result<Value, Error>;

    /// PNG screenshot of the device screen
    fn screenshot(&self) -> Result<Vec<u8>, Error>;

    /// Terminate the remote session
    fn close(&self) -> Result<(), Error>;

    /// Check if the session is still open
    fn is_active(&self) -> bool;
}

/// Opens new driver connections
pub trait DriverFactory: Send + Sync {
    fn open(&self, config: &SessionConfig) -> Result<Arc<dyn RemoteDriver>, Error>;
}

impl<F> DriverFactory for F
where
    F: Fn(&SessionConfig) -> Result<Arc<dyn RemoteDriver>, Error> + Send + Sync,
{
    fn open(&self, config: &SessionConfig) -> Result<Arc<dyn RemoteDriver>, Error> {
        self(config)
    }
}
