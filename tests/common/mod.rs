//! Common test utilities
//!
//! This module provides shared fixtures for the integration tests: a mock
//! Swag Labs app seeded into every mock session, device profiles and a suite
//! wired to the mock driver and a virtual clock.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use swaglabs_e2e::clock::MockClock;
use swaglabs_e2e::config::Config;
use swaglabs_e2e::driver::{MockDriver, MockDriverFactory, MockElement, Rect};
use swaglabs_e2e::locator::{By, Locator};
use swaglabs_e2e::pages::{line_items, ProductsPage};
use swaglabs_e2e::report::{Reporter, ScreenshotSource};
use swaglabs_e2e::session::{Platform, SessionRegistry};
use swaglabs_e2e::suite::Suite;

pub const BACKPACK: &str = "Sauce Labs Backpack";
pub const ONESIE: &str = "Sauce Labs Onesie";

fn android(locator: &Locator) -> By {
    locator
        .resolve(&Platform::Android)
        .unwrap()
        .expect("locator has an Android query")
        .clone()
}

fn button() -> MockElement {
    MockElement::visible("").at(Rect::new(20.0, 40.0, 300.0, 60.0))
}

fn text(value: &str) -> By {
    By::ui_automator(format!("new UiSelector().text(\"{}\")", value))
}

/// Seed the Android app with catalogue prices
pub fn seed_app_with_prices(driver: &MockDriver, backpack: &str, onesie: &str) {
    // Login
    driver.add_element(By::accessibility_id("test-Username"), MockElement::visible(""));
    driver.add_element(By::accessibility_id("test-Password"), MockElement::visible(""));
    driver.add_element(By::accessibility_id("test-LOGIN"), button());

    // Products
    driver.add_element(text("PRODUCTS"), MockElement::visible("PRODUCTS"));
    driver.add_element(By::accessibility_id("test-Cart"), button());
    driver.add_element(By::accessibility_id("test-Menu"), button());

    // Cart and overview rows
    driver.add_element(text("YOUR CART"), MockElement::visible("YOUR CART"));
    driver.add_element(By::accessibility_id("test-CHECKOUT"), button());
    for (name, price) in [(BACKPACK, backpack), (ONESIE, onesie)] {
        driver.add_element(android(&ProductsPage::add_to_cart_button(name)), button());
        driver.add_element(
            android(&ProductsPage::remove_button(name)),
            MockElement::visible("REMOVE"),
        );
        driver.add_element(android(&line_items::name_label(name)), MockElement::visible(name));
        driver.add_element(android(&line_items::price_label(name)), MockElement::visible(price));
    }

    // Checkout
    driver.add_element(
        text("CHECKOUT: INFORMATION"),
        MockElement::visible("CHECKOUT: INFORMATION"),
    );
    for field in ["test-First Name", "test-Last Name", "test-Zip/Postal Code"] {
        driver.add_element(By::accessibility_id(field), MockElement::visible(""));
    }
    driver.add_element(By::accessibility_id("test-CONTINUE"), button());
    driver.add_element(text("CHECKOUT: OVERVIEW"), MockElement::visible("CHECKOUT: OVERVIEW"));
    driver.add_element(
        By::ui_automator("new UiSelector().textStartsWith(\"Item total:\")"),
        MockElement::visible("Item total: $37.98").revealed_by_scrolls(1),
    );
    driver.add_element(By::accessibility_id("test-FINISH"), button());
    driver.add_element(text("CHECKOUT: COMPLETE!"), MockElement::visible("CHECKOUT: COMPLETE!"));
    driver.add_element(
        text("THANK YOU FOR YOU ORDER"),
        MockElement::visible("THANK YOU FOR YOU ORDER"),
    );
}

/// Seed the Android app with its real catalogue prices
pub fn seed_app(driver: &MockDriver) {
    seed_app_with_prices(driver, "$29.99", "$7.99");
}

/// Write an Android emulator profile and return a config pointing at `dir`
pub fn test_config(dir: &Path) -> Config {
    let profiles = dir.join("device-profiles");
    std::fs::create_dir_all(&profiles).unwrap();
    std::fs::write(
        profiles.join("android_emulator.json"),
        r#"{
            "platform_name": "Android",
            "platform_version": "14",
            "device_name": "emulator-5554",
            "automation_name": "UiAutomator2"
        }"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.endpoint.manage_service = false;
    config.device.profile_dir = profiles;
    config.report.dir = dir.join("reports");
    config
}

/// Suite over `factory` with screenshots and a virtual clock
pub fn mock_suite(config: Config, factory: Arc<MockDriverFactory>) -> (MockClock, Suite) {
    let registry = Arc::new(SessionRegistry::new(factory));
    let camera: Arc<dyn ScreenshotSource> = registry.clone();
    let reporter = Arc::new(Reporter::new(&config.report).with_screenshots(camera));
    let clock = MockClock::new();
    let suite = Suite::new(config, registry, reporter).with_clock(Arc::new(clock.clone()));
    (clock, suite)
}
