//! Checkout: Overview screen

use super::base::PageContext;
use super::line_items;
use super::model::{format_price, parse_price, Product};
use crate::gestures::Direction;
use crate::locator::{By, Locator};
use crate::{Error, Result};

pub struct CheckoutOverviewPage<'a> {
    ctx: &'a PageContext,
    banner: Locator,
    item_total: Locator,
    finish_button: Locator,
    finish_scroll: Locator,
}

impl<'a> CheckoutOverviewPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self {
            ctx,
            banner: Locator::new("checkout overview banner")
                .android(By::ui_automator("new UiSelector().text(\"CHECKOUT: OVERVIEW\")"))
                .ios(By::ios_predicate(
                    "label == 'CHECKOUT: OVERVIEW' AND type == 'XCUIElementTypeOther'",
                )),
            item_total: Locator::new("item total")
                .android(By::ui_automator(
                    "new UiSelector().textStartsWith(\"Item total:\")",
                ))
                .ios(By::ios_predicate("label BEGINSWITH 'Item total:'")),
            finish_button: Locator::new("finish button")
                .android(By::accessibility_id("test-FINISH"))
                .ios(By::ios_predicate("name == 'test-FINISH'")),
            finish_scroll: Locator::new("finish button")
                .android(By::ui_automator(
                    "new UiScrollable(new UiSelector()).scrollIntoView(description(\"test-FINISH\"))",
                ))
                .ios(By::ios_predicate("name == 'test-FINISH'")),
        }
    }

    pub fn validate_navigation(&self) -> Result<()> {
        self.ctx.step("Failed to navigate to Checkout: Overview Page", || {
            self.ctx.validate_displayed(
                &self.banner,
                "Failed to navigate to Checkout: Overview Page. Expected banner not displayed.",
            )
        })?;
        self.ctx.pass("Successfully navigated to Checkout: Overview Page.");
        Ok(())
    }

    pub fn validate_product_details(&self, products: &[Product]) -> Result<()> {
        line_items::validate_products(self.ctx, products)
    }

    /// Scroll down to the item total and compare it with the sum of `products`
    pub fn validate_item_total(&self, products: &[Product]) -> Result<()> {
        let ctx = self.ctx;
        let expected = Product::total(products);

        ctx.step("Failed to validate item total", || {
            let timing = ctx.timing();
            ctx.waiter().scroll_until_visible(
                timing.max_scroll_attempts,
                "Item total not displayed.",
                || ctx.actions().scroll(Direction::Down),
                || ctx.is_displayed_within(&self.item_total, timing.quick_timeout()),
            )?;

            let shown = ctx.text_of(&self.item_total)?;
            let actual = parse_price(&shown)?;
            if actual != expected {
                return Err(Error::assertion(format!(
                    "Item total does not match. Expected: {}. Actual: {}.",
                    format_price(expected),
                    format_price(actual)
                )));
            }
            Ok(())
        })?;
        ctx.pass(&format!(
            "Item total validated successfully: {}",
            format_price(expected)
        ));
        Ok(())
    }

    pub fn click_finish_button(&self) -> Result<()> {
        let ctx = self.ctx;
        ctx.step("Failed to click Finish button", || {
            ctx.actions().scroll_into_view(&self.finish_scroll)?;
            ctx.verify_clickable(
                &self.finish_button,
                "Finish button is not displayed or not clickable.",
            )?;
            ctx.actions().tap(&self.finish_button)
        })?;
        ctx.pass("Finish button clicked successfully.");
        Ok(())
    }
}
