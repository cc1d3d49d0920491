//! Checkout: Complete screen

use super::base::PageContext;
use crate::locator::{By, Locator};
use crate::Result;

pub struct OrderConfirmationPage<'a> {
    ctx: &'a PageContext,
    banner: Locator,
    thank_you: Locator,
}

impl<'a> OrderConfirmationPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self {
            ctx,
            banner: Locator::new("checkout complete banner")
                .android(By::ui_automator(
                    "new UiSelector().text(\"CHECKOUT: COMPLETE!\")",
                ))
                .ios(By::ios_predicate(
                    "label == 'CHECKOUT: COMPLETE!' AND type == 'XCUIElementTypeOther'",
                )),
            thank_you: Locator::new("thank you message")
                .android(By::ui_automator(
                    "new UiSelector().text(\"THANK YOU FOR YOU ORDER\")",
                ))
                .ios(By::ios_predicate(
                    "label == 'THANK YOU FOR YOU ORDER' AND type == 'XCUIElementTypeStaticText'",
                )),
        }
    }

    pub fn validate_navigation(&self) -> Result<()> {
        self.ctx.step("Failed to navigate to Checkout: Complete Page", || {
            self.ctx.validate_displayed(
                &self.banner,
                "Failed to navigate to Checkout: Complete Page. Expected banner not displayed.",
            )
        })?;
        self.ctx.pass("Successfully navigated to Checkout: Complete Page.");
        Ok(())
    }

    pub fn validate_thank_you_message(&self) -> Result<()> {
        self.ctx.step("Failed to validate Thank You message", || {
            self.ctx
                .validate_displayed(&self.thank_you, "Thank You message not displayed.")
        })?;
        self.ctx.pass("Thank You message displayed successfully.");
        Ok(())
    }
}
