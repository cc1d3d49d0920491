//! Product catalogue screen

use super::base::PageContext;
use crate::locator::{By, Locator};
use crate::Result;

/// Icon glyph the iOS build prefixes product labels with
const IOS_PRODUCT_GLYPH: char = '\u{F0741}';

pub struct ProductsPage<'a> {
    ctx: &'a PageContext,
    banner: Locator,
    cart_button: Locator,
    menu_button: Locator,
}

impl<'a> ProductsPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self {
            ctx,
            banner: Locator::new("products banner")
                .android(By::ui_automator("new UiSelector().text(\"PRODUCTS\")"))
                .ios(By::ios_predicate(
                    "label == 'PRODUCTS' AND type == 'XCUIElementTypeOther'",
                )),
            cart_button: Locator::new("cart button")
                .android(By::accessibility_id("test-Cart"))
                .ios(By::xpath("//XCUIElementTypeOther[@name='test-Cart']")),
            menu_button: Locator::both("menu button", By::accessibility_id("test-Menu")),
        }
    }

    fn product_scroll(name: &str) -> Locator {
        Locator::new(format!("{} in catalogue", name))
            .android(By::ui_automator(format!(
                "new UiScrollable(new UiSelector()).scrollIntoView(text(\"{}\"))",
                name
            )))
            .ios(By::ios_predicate(format!(
                "label == '{} {}'",
                IOS_PRODUCT_GLYPH, name
            )))
    }

    fn product_button(name: &str, android_desc: &str, ios_name: &str) -> Locator {
        Locator::new(format!("{} button for {}", ios_name, name))
            .android(By::xpath(format!(
                "//android.widget.TextView[@text='{}']//following-sibling::android.view.ViewGroup[@content-desc='{}']",
                name, android_desc
            )))
            .ios(By::xpath(format!(
                "//XCUIElementTypeStaticText[@label='{}']//ancestor::XCUIElementTypeOther[contains(@label, '{}')][2]//XCUIElementTypeOther[@name='{}']",
                name, name, ios_name
            )))
    }

    /// Add-to-cart button of a product card
    pub fn add_to_cart_button(name: &str) -> Locator {
        Self::product_button(name, "test-ADD TO CART", "ADD TO CART")
    }

    /// Remove button of a product card
    pub fn remove_button(name: &str) -> Locator {
        Self::product_button(name, "test-REMOVE", "REMOVE")
    }

    pub fn validate_navigation(&self) -> Result<()> {
        self.ctx.step("Failed to navigate to Products Page", || {
            self.ctx.validate_displayed(
                &self.banner,
                "Failed to navigate to Products Page. Expected banner not displayed.",
            )
        })?;
        self.ctx.pass("Successfully navigated to Products Page.");
        Ok(())
    }

    pub fn add_product_to_cart(&self, name: &str) -> Result<()> {
        self.scroll_to_product_and_click(name)?;
        self.validate_remove_button(name)
    }

    pub fn scroll_to_product_and_click(&self, name: &str) -> Result<()> {
        let actions = self.ctx.actions();
        self.ctx.step("Failed to add product to cart", || {
            actions.scroll_into_view(&Self::product_scroll(name))?;
            actions.tap(&Self::add_to_cart_button(name))
        })?;
        self.ctx
            .pass(&format!("Product '{}' added to cart successfully.", name));
        Ok(())
    }

    pub fn validate_remove_button(&self, name: &str) -> Result<()> {
        self.ctx
            .step("Remove button not displayed for given product", || {
                self.ctx.validate_displayed(
                    &Self::remove_button(name),
                    &format!("Remove button for product {} not displayed.", name),
                )
            })?;
        self.ctx.pass(&format!(
            "Remove button for product '{}' is displayed after adding to cart.",
            name
        ));
        Ok(())
    }

    pub fn click_cart_button(&self) -> Result<()> {
        let ctx = self.ctx;
        ctx.step("Failed to click on Cart button", || {
            ctx.verify_clickable_within(
                &self.cart_button,
                "Cart button is not displayed or clickable.",
                ctx.timing().quick_timeout(),
            )?;
            ctx.pause(ctx.timing().cart_settle());
            ctx.actions().click(&self.cart_button)
        })?;
        ctx.pass("Cart button clicked successfully.");
        Ok(())
    }

    pub fn click_menu_button(&self) -> Result<()> {
        let ctx = self.ctx;
        ctx.step("Failed to click on Menu button", || {
            ctx.verify_clickable_within(
                &self.menu_button,
                "Menu button is not displayed or clickable.",
                ctx.timing().quick_timeout(),
            )?;
            ctx.actions().tap(&self.menu_button)
        })?;
        ctx.pass("Menu button clicked successfully.");
        Ok(())
    }
}
