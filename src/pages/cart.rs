//! Your Cart screen

use super::base::PageContext;
use super::line_items;
use super::model::Product;
use crate::locator::{By, Locator};
use crate::Result;

pub struct CartPage<'a> {
    ctx: &'a PageContext,
    banner: Locator,
    checkout_button: Locator,
    checkout_scroll: Locator,
}

impl<'a> CartPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self {
            ctx,
            banner: Locator::new("cart banner")
                .android(By::ui_automator("new UiSelector().text(\"YOUR CART\")"))
                .ios(By::ios_predicate(
                    "label == 'YOUR CART' AND type == 'XCUIElementTypeOther'",
                )),
            checkout_button: Locator::new("checkout button")
                .android(By::accessibility_id("test-CHECKOUT"))
                .ios(By::ios_predicate("name == 'test-CHECKOUT'")),
            checkout_scroll: Locator::new("checkout button")
                .android(By::ui_automator(
                    "new UiScrollable(new UiSelector()).scrollIntoView(description(\"test-CHECKOUT\"))",
                ))
                .ios(By::ios_predicate("name == 'test-CHECKOUT'")),
        }
    }

    pub fn validate_navigation(&self) -> Result<()> {
        self.ctx.step("Failed to navigate to Your Cart Page", || {
            self.ctx.validate_displayed(
                &self.banner,
                "Failed to navigate to Your Cart Page. Expected banner not displayed.",
            )
        })?;
        self.ctx.pass("Successfully navigated to Your Cart Page.");
        Ok(())
    }

    pub fn validate_product_details(&self, products: &[Product]) -> Result<()> {
        line_items::validate_products(self.ctx, products)
    }

    pub fn click_checkout_button(&self) -> Result<()> {
        let ctx = self.ctx;
        ctx.step("Failed to click on Checkout button", || {
            ctx.actions().scroll_into_view(&self.checkout_scroll)?;
            ctx.verify_clickable(
                &self.checkout_button,
                "Checkout button is not displayed or not clickable.",
            )?;
            ctx.actions().tap(&self.checkout_button)
        })?;
        ctx.pass("Checkout button clicked successfully.");
        Ok(())
    }
}
