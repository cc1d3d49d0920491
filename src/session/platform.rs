//! Target platform families

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Operating-system family a session automates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    Android,
    Ios,
    /// Anything the endpoint reports outside the supported set
    Other(String),
}

impl Platform {
    /// Parse a `platformName` value (case-insensitive)
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            _ => Platform::Other(name.trim().to_string()),
        }
    }

    /// Parse a requested platform, rejecting names outside the supported set
    pub fn requested(name: &str) -> Result<Self> {
        match Self::parse(name) {
            Platform::Other(other) => Err(Error::configuration(format!(
                "Unsupported platform variant '{}'",
                other
            ))),
            platform => Ok(platform),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Other(_))
    }

    /// Value sent as `platformName`
    pub fn name(&self) -> &str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
