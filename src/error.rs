//! Unified error types for the suite

use phf::phf_map;
use std::fmt;
use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds reported by a W3C endpoint in the `value.error` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    NoSuchElement,
    StaleElementReference,
    ElementNotInteractable,
    InvalidSessionId,
    SessionNotCreated,
    InvalidArgument,
    UnknownCommand,
    JavascriptError,
    Timeout,
    Unknown,
}

static W3C_ERROR_MAP: phf::Map<&'static str, RemoteErrorKind> = phf_map! {
    "no such element" => RemoteErrorKind::NoSuchElement,
    "stale element reference" => RemoteErrorKind::StaleElementReference,
    "element not interactable" => RemoteErrorKind::ElementNotInteractable,
    "invalid session id" => RemoteErrorKind::InvalidSessionId,
    "session not created" => RemoteErrorKind::SessionNotCreated,
    "invalid argument" => RemoteErrorKind::InvalidArgument,
    "unknown command" => RemoteErrorKind::UnknownCommand,
    "unknown method" => RemoteErrorKind::UnknownCommand,
    "javascript error" => RemoteErrorKind::JavascriptError,
    "timeout" => RemoteErrorKind::Timeout,
    "script timeout" => RemoteErrorKind::Timeout,
};

impl RemoteErrorKind {
    /// Map a W3C error code string to its kind
    pub fn from_w3c(code: &str) -> Self {
        W3C_ERROR_MAP
            .get(code)
            .copied()
            .unwrap_or(RemoteErrorKind::Unknown)
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteErrorKind::NoSuchElement => "no such element",
            RemoteErrorKind::StaleElementReference => "stale element reference",
            RemoteErrorKind::ElementNotInteractable => "element not interactable",
            RemoteErrorKind::InvalidSessionId => "invalid session id",
            RemoteErrorKind::SessionNotCreated => "session not created",
            RemoteErrorKind::InvalidArgument => "invalid argument",
            RemoteErrorKind::UnknownCommand => "unknown command",
            RemoteErrorKind::JavascriptError => "javascript error",
            RemoteErrorKind::Timeout => "timeout",
            RemoteErrorKind::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}

/// Unified error type for the suite
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed or missing capability/config values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An asserting wait exceeded its deadline
    #[error("Wait timed out: {0}")]
    WaitTimeout(String),

    /// A gesture/action target could not be resolved or interacted with
    #[error("Action failed: {0}")]
    Action(String),

    /// No dispatch branch exists for the session's platform
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Element reference missing or no longer attached
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Error payload returned by the automation endpoint
    #[error("Remote error ({kind}): {message}")]
    Remote {
        kind: RemoteErrorKind,
        message: String,
    },

    /// On-screen value differs from the expected one
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Session already terminated
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new wait timeout error
    pub fn wait_timeout<S: Into<String>>(msg: S) -> Self {
        Error::WaitTimeout(msg.into())
    }

    /// Create a new action error
    pub fn action<S: Into<String>>(msg: S) -> Self {
        Error::Action(msg.into())
    }

    /// Create a new unsupported platform error
    pub fn unsupported_platform<S: Into<String>>(name: S) -> Self {
        Error::UnsupportedPlatform(name.into())
    }

    /// Create a new element not found error
    pub fn element_not_found<S: Into<String>>(what: S) -> Self {
        Error::ElementNotFound(what.into())
    }

    /// Create a new remote error from a W3C error code
    pub fn remote<S: Into<String>>(code: &str, message: S) -> Self {
        Error::Remote {
            kind: RemoteErrorKind::from_w3c(code),
            message: message.into(),
        }
    }

    /// Create a new assertion error
    pub fn assertion<S: Into<String>>(msg: S) -> Self {
        Error::Assertion(msg.into())
    }

    /// Create a new session closed error
    pub fn session_closed<S: Into<String>>(id: S) -> Self {
        Error::SessionClosed(id.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Whether this error means "the element is not there (yet)"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ElementNotFound(_)
                | Error::Remote {
                    kind: RemoteErrorKind::NoSuchElement | RemoteErrorKind::StaleElementReference,
                    ..
                }
        )
    }
}
