//! W3C WebDriver / Appium wire types
//!
//! This module defines the JSON payloads exchanged with the automation endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Key under which W3C endpoints return element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecc";

/// Legacy JSONWP element key, still emitted by some drivers
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Remote element reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract an element reference from a W3C element object
    pub fn from_value(value: &Value) -> Option<Self> {
        value
            .get(ELEMENT_KEY)
            .or_else(|| value.get(LEGACY_ELEMENT_KEY))
            .and_then(|v| v.as_str())
            .map(|s| ElementId(s.to_string()))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element bounding box in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Centroid in whole pixels (integer halves of the size)
    pub fn center(&self) -> (i64, i64) {
        let x = self.x as i64 + (self.width as i64) / 2;
        let y = self.y as i64 + (self.height as i64) / 2;
        (x, y)
    }
}

/// `POST /session` body
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRequest {
    pub capabilities: CapabilitiesRequest,
}

/// W3C capability negotiation block
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitiesRequest {
    #[serde(rename = "alwaysMatch")]
    pub always_match: serde_json::Map<String, Value>,
    #[serde(rename = "firstMatch")]
    pub first_match: Vec<serde_json::Map<String, Value>>,
}

impl NewSessionRequest {
    pub fn new(capabilities: serde_json::Map<String, Value>) -> Self {
        Self {
            capabilities: CapabilitiesRequest {
                always_match: capabilities,
                first_match: vec![serde_json::Map::new()],
            },
        }
    }
}

/// `value` of a successful `POST /session`
#[derive(Debug, Clone, Deserialize)]
pub struct NewSessionValue {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub capabilities: Value,
}

/// Response envelope, `{"value": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct W3cResponse<T> {
    pub value: T,
}

/// `value` of an error response
#[derive(Debug, Clone, Deserialize)]
pub struct W3cErrorValue {
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stacktrace: Option<String>,
}

/// `POST .../elements` body
#[derive(Debug, Clone, Serialize)]
pub struct FindElementsRequest<'a> {
    pub using: &'a str,
    pub value: &'a str,
}

/// `POST .../execute/sync` body
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest<'a> {
    pub script: &'a str,
    pub args: Vec<Value>,
}

/// `POST .../element/{id}/value` body
#[derive(Debug, Clone, Serialize)]
pub struct SendTextRequest<'a> {
    pub text: &'a str,
}
