//! Page object tests

use super::*;
use crate::clock::MockClock;
use crate::config::TimingConfig;
use crate::driver::{Command, MockDriver, MockElement, Rect};
use crate::locator::By;
use crate::report::ReportSink;
use crate::session::{Platform, Session};
use crate::wait::Waiter;
use crate::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingSink {
    fn messages(&self, kind: &str) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn pass(&self, message: &str) {
        self.events.lock().unwrap().push(("pass", message.to_string()));
    }

    fn fail(&self, message: &str) {
        self.events.lock().unwrap().push(("fail", message.to_string()));
    }

    fn info(&self, message: &str) {
        self.events.lock().unwrap().push(("info", message.to_string()));
    }
}

struct Fixture {
    driver: Arc<MockDriver>,
    clock: MockClock,
    sink: Arc<RecordingSink>,
    ctx: PageContext,
}

fn fixture(platform: Platform) -> Fixture {
    let driver = Arc::new(MockDriver::new(platform.name()));
    let session = Arc::new(Session::attach(driver.clone(), platform));
    let clock = MockClock::new();
    let timing = TimingConfig::default();
    let waiter = Waiter::from_timing(Arc::new(clock.clone()), &timing);
    let sink = Arc::new(RecordingSink::default());
    let ctx = PageContext::new(session, waiter, timing, sink.clone());
    Fixture {
        driver,
        clock,
        sink,
        ctx,
    }
}

fn button() -> MockElement {
    MockElement::visible("").at(Rect::new(0.0, 0.0, 100.0, 40.0))
}

#[test]
fn test_login_types_credentials_and_taps() {
    let f = fixture(Platform::Android);
    let username = f
        .driver
        .add_element(By::accessibility_id("test-Username"), MockElement::visible(""));
    let password = f
        .driver
        .add_element(By::accessibility_id("test-Password"), MockElement::visible(""));
    f.driver.add_element(By::accessibility_id("test-LOGIN"), button());

    LoginPage::new(&f.ctx)
        .login("standard_user", "secret_sauce")
        .unwrap();

    assert_eq!(f.driver.typed_text(&username), vec!["standard_user"]);
    assert_eq!(f.driver.typed_text(&password), vec!["secret_sauce"]);
    assert_eq!(f.driver.executed()[0].0, "mobile: clickGesture");
    assert_eq!(
        f.sink.messages("pass"),
        vec!["Login action completed successfully with username: standard_user"]
    );
}

#[test]
fn test_login_missing_field_reports_reason() {
    let f = fixture(Platform::Ios);

    let err = LoginPage::new(&f.ctx).login("standard_user", "secret_sauce").unwrap_err();

    assert!(matches!(err, Error::WaitTimeout(_)));
    assert_eq!(
        f.sink.messages("fail"),
        vec!["Login action failed. Reason: Wait timed out: Username input field is not displayed"]
    );
    assert_eq!(f.clock.elapsed(), Duration::from_secs(10));
}

#[test]
fn test_products_navigation_uses_validate_timeout() {
    let f = fixture(Platform::Android);

    let err = ProductsPage::new(&f.ctx).validate_navigation().unwrap_err();

    assert!(matches!(err, Error::WaitTimeout(_)));
    assert_eq!(f.clock.elapsed(), Duration::from_secs(5));
    assert!(f.sink.messages("pass").is_empty());

    f.driver.add_element(
        By::ui_automator("new UiSelector().text(\"PRODUCTS\")"),
        MockElement::visible("PRODUCTS"),
    );
    ProductsPage::new(&f.ctx).validate_navigation().unwrap();
    assert_eq!(
        f.sink.messages("pass"),
        vec!["Successfully navigated to Products Page."]
    );
}

#[test]
fn test_add_product_to_cart_checks_remove_button() {
    let f = fixture(Platform::Android);
    let add = ProductsPage::add_to_cart_button("Sauce Labs Onesie");
    let remove = ProductsPage::remove_button("Sauce Labs Onesie");
    let platform = Platform::Android;
    f.driver
        .add_element(add.resolve(&platform).unwrap().unwrap().clone(), button());

    let page = ProductsPage::new(&f.ctx);
    let err = page.add_product_to_cart("Sauce Labs Onesie").unwrap_err();
    assert!(matches!(err, Error::WaitTimeout(_)));
    assert!(f.sink.messages("fail")[0]
        .starts_with("Remove button not displayed for given product. Reason:"));

    f.driver.add_element(
        remove.resolve(&platform).unwrap().unwrap().clone(),
        MockElement::visible("REMOVE"),
    );
    page.add_product_to_cart("Sauce Labs Onesie").unwrap();

    let scrolled = f.driver.journal().iter().any(|c| {
        matches!(c, Command::Find(by) if by.value.contains("scrollIntoView(text(\"Sauce Labs Onesie\"))"))
    });
    assert!(scrolled);
    assert!(f
        .sink
        .messages("pass")
        .contains(&"Remove button for product 'Sauce Labs Onesie' is displayed after adding to cart.".to_string()));
}

#[test]
fn test_ios_add_to_cart_scrolls_with_predicate() {
    let f = fixture(Platform::Ios);
    let add = ProductsPage::add_to_cart_button("Sauce Labs Backpack");
    f.driver.add_element(
        add.resolve(&Platform::Ios).unwrap().unwrap().clone(),
        button(),
    );

    ProductsPage::new(&f.ctx)
        .scroll_to_product_and_click("Sauce Labs Backpack")
        .unwrap();

    let executed = f.driver.executed();
    assert_eq!(executed[0].0, "mobile: scroll");
    assert_eq!(
        executed[0].1["predicateString"],
        "label == '\u{F0741} Sauce Labs Backpack'"
    );
    assert_eq!(executed[1].0, "mobile: tap");
}

#[test]
fn test_cart_button_waits_before_native_click() {
    let f = fixture(Platform::Android);
    f.driver.add_element(By::accessibility_id("test-Cart"), button());

    ProductsPage::new(&f.ctx).click_cart_button().unwrap();

    assert_eq!(f.clock.elapsed(), Duration::from_secs(5));
    assert!(matches!(f.driver.journal().last(), Some(Command::Click(_))));
    assert_eq!(f.sink.messages("pass"), vec!["Cart button clicked successfully."]);
}

#[test]
fn test_disabled_menu_button_is_not_clickable() {
    let f = fixture(Platform::Android);
    f.driver
        .add_element(By::accessibility_id("test-Menu"), button().disabled());

    let err = ProductsPage::new(&f.ctx).click_menu_button().unwrap_err();

    assert_eq!(
        err.to_string(),
        "Wait timed out: Menu button is not displayed or clickable."
    );
    assert!(f.driver.executed().is_empty());
}

#[test]
fn test_price_mismatch_is_assertion_failure() {
    let f = fixture(Platform::Android);
    let name = "Sauce Labs Onesie";
    let platform = Platform::Android;
    f.driver.add_element(
        line_items::name_label(name)
            .resolve(&platform)
            .unwrap()
            .unwrap()
            .clone(),
        MockElement::visible(name),
    );
    f.driver.add_element(
        line_items::price_label(name)
            .resolve(&platform)
            .unwrap()
            .unwrap()
            .clone(),
        MockElement::visible("$8.99"),
    );

    let products = [Product::new(name, 7.99)];
    let err = CartPage::new(&f.ctx)
        .validate_product_details(&products)
        .unwrap_err();

    assert!(matches!(err, Error::Assertion(_)));
    assert!(err
        .to_string()
        .contains("Product name: Sauce Labs Onesie. Expected price: $7.99. Actual price: $8.99"));
    assert_eq!(
        f.sink.messages("pass"),
        vec!["Product 'Sauce Labs Onesie' name validated successfully."]
    );
}

#[test]
fn test_item_total_scrolls_until_visible() {
    let f = fixture(Platform::Android);
    f.driver.add_element(
        By::ui_automator("new UiSelector().textStartsWith(\"Item total:\")"),
        MockElement::visible("Item total: $37.98").revealed_by_scrolls(2),
    );

    let products = [
        Product::new("Sauce Labs Backpack", 29.99),
        Product::new("Sauce Labs Onesie", 7.99),
    ];
    CheckoutOverviewPage::new(&f.ctx)
        .validate_item_total(&products)
        .unwrap();

    let scrolls: Vec<_> = f
        .driver
        .executed()
        .into_iter()
        .filter(|(command, _)| command == "mobile: scrollGesture")
        .collect();
    assert_eq!(scrolls.len(), 2);
    assert_eq!(scrolls[0].1["direction"], "down");
}

#[test]
fn test_item_total_scroll_is_bounded() {
    let f = fixture(Platform::Android);

    let err = CheckoutOverviewPage::new(&f.ctx)
        .validate_item_total(&[Product::new("Sauce Labs Onesie", 7.99)])
        .unwrap_err();

    assert!(matches!(err, Error::WaitTimeout(_)));
    assert!(err.to_string().contains("(not visible after 10 scrolls)"));
    assert_eq!(f.driver.executed().len(), 10);
}

#[test]
fn test_item_total_mismatch() {
    let f = fixture(Platform::Ios);
    f.driver.add_element(
        By::ios_predicate("label BEGINSWITH 'Item total:'"),
        MockElement::visible("Item total: $29.99"),
    );

    let err = CheckoutOverviewPage::new(&f.ctx)
        .validate_item_total(&[
            Product::new("Sauce Labs Backpack", 29.99),
            Product::new("Sauce Labs Onesie", 7.99),
        ])
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Assertion failed: Item total does not match. Expected: $37.98. Actual: $29.99."
    );
    assert!(f.sink.messages("fail")[0].starts_with("Failed to validate item total. Reason:"));
}

#[test]
fn test_customer_details_fill_every_field() {
    let f = fixture(Platform::Ios);
    let chain = |id: &str| By::ios_class_chain(format!("**/XCUIElementTypeTextField[`name == \"{}\"`]", id));
    let first = f.driver.add_element(chain("test-First Name"), MockElement::visible(""));
    let last = f.driver.add_element(chain("test-Last Name"), MockElement::visible(""));
    let zip = f
        .driver
        .add_element(chain("test-Zip/Postal Code"), MockElement::visible(""));

    let customer = Customer::new("Arunangshu", "Podder", "560068");
    CheckoutInfoPage::new(&f.ctx)
        .enter_customer_details(&customer)
        .unwrap();

    assert_eq!(f.driver.typed_text(&first), vec!["Arunangshu"]);
    assert_eq!(f.driver.typed_text(&last), vec!["Podder"]);
    assert_eq!(f.driver.typed_text(&zip), vec!["560068"]);
    assert_eq!(
        f.sink.messages("pass"),
        vec!["Customer details entered successfully: Arunangshu Podder, 560068"]
    );
}

#[test]
fn test_order_confirmation_message() {
    let f = fixture(Platform::Android);
    f.driver.add_element(
        By::ui_automator("new UiSelector().text(\"THANK YOU FOR YOU ORDER\")"),
        MockElement::visible("THANK YOU FOR YOU ORDER"),
    );

    OrderConfirmationPage::new(&f.ctx)
        .validate_thank_you_message()
        .unwrap();
    assert_eq!(
        f.sink.messages("pass"),
        vec!["Thank You message displayed successfully."]
    );
}
