//! Checkout: Information screen

use super::base::PageContext;
use super::model::Customer;
use crate::locator::{By, Locator};
use crate::Result;

pub struct CheckoutInfoPage<'a> {
    ctx: &'a PageContext,
    banner: Locator,
    first_name: Locator,
    last_name: Locator,
    zip_code: Locator,
    continue_button: Locator,
}

fn text_field(name: &str, test_id: &str) -> Locator {
    Locator::new(name)
        .android(By::accessibility_id(test_id))
        .ios(By::ios_class_chain(format!(
            "**/XCUIElementTypeTextField[`name == \"{}\"`]",
            test_id
        )))
}

impl<'a> CheckoutInfoPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self {
            ctx,
            banner: Locator::new("checkout information banner")
                .android(By::ui_automator(
                    "new UiSelector().text(\"CHECKOUT: INFORMATION\")",
                ))
                .ios(By::ios_predicate(
                    "label == 'CHECKOUT: INFORMATION' AND type == 'XCUIElementTypeOther'",
                )),
            first_name: text_field("first name field", "test-First Name"),
            last_name: text_field("last name field", "test-Last Name"),
            zip_code: text_field("zip code field", "test-Zip/Postal Code"),
            continue_button: Locator::new("continue button")
                .android(By::accessibility_id("test-CONTINUE"))
                .ios(By::ios_predicate("name == 'test-CONTINUE'")),
        }
    }

    pub fn validate_navigation(&self) -> Result<()> {
        self.ctx.step("Failed to navigate to Checkout: Information Page", || {
            self.ctx.validate_displayed(
                &self.banner,
                "Failed to navigate to Checkout: Information Page. Expected banner not displayed.",
            )
        })?;
        self.ctx
            .pass("Successfully navigated to Checkout: Information Page.");
        Ok(())
    }

    pub fn enter_customer_details(&self, customer: &Customer) -> Result<()> {
        let ctx = self.ctx;
        let fields = [
            (&self.first_name, customer.first_name.as_str(), "First Name field not displayed."),
            (&self.last_name, customer.last_name.as_str(), "Last Name field not displayed."),
            (&self.zip_code, customer.zip_code.as_str(), "Zip Code Name field not displayed."),
        ];

        ctx.step("Failed to enter customer details", || {
            for (field, value, missing) in fields {
                ctx.verify_displayed(field, missing)?;
                ctx.actions().enter_text(field, value)?;
            }
            Ok(())
        })?;
        ctx.pass(&format!("Customer details entered successfully: {}", customer));
        Ok(())
    }

    pub fn click_continue_button(&self) -> Result<()> {
        let ctx = self.ctx;
        ctx.step("Failed to click on Continue button", || {
            ctx.verify_clickable(
                &self.continue_button,
                "Continue button is not clickable or not displayed.",
            )?;
            ctx.actions().tap(&self.continue_button)
        })?;
        ctx.pass("Continue button clicked successfully.");
        Ok(())
    }
}
