//! Swag Labs mobile end-to-end suite
//!
//! This library drives the Swag Labs shopping-cart demo app through a remote
//! Appium/W3C automation endpoint. It provides the synchronisation core (polling
//! waits, thread-scoped sessions, gesture dispatch), the page objects for every
//! screen of the checkout flow, and the suite harness that runs scenarios and
//! writes a report.

pub mod error;
pub mod config;
pub mod clock;

pub mod driver;
pub mod locator;
pub mod session;
pub mod wait;
pub mod gestures;
pub mod app;
pub mod report;
pub mod pages;
pub mod scenarios;
pub mod suite;

// Re-exports
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
