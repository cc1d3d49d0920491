//! Product rows shared by the cart and checkout overview screens

use super::base::PageContext;
use super::model::{format_price, parse_price, Product};
use crate::locator::{By, Locator};
use crate::{Error, Result};

fn name_scroll(name: &str) -> Locator {
    Locator::new(format!("{} row", name)).android(By::ui_automator(format!(
        "new UiScrollable(new UiSelector()).scrollIntoView(text(\"{}\"))",
        name
    )))
}

/// Name label of a product row
pub fn name_label(name: &str) -> Locator {
    Locator::new(format!("{} name", name))
        .android(By::ui_automator(format!(
            "new UiSelector().text(\"{}\")",
            name
        )))
        .ios(By::ios_predicate(format!(
            "label == '{}' AND type == 'XCUIElementTypeStaticText'",
            name
        )))
}

/// Price label of a product row
pub fn price_label(name: &str) -> Locator {
    Locator::new(format!("{} price", name))
        .android(By::xpath(format!(
            "//android.widget.TextView[@text='{}']//parent::android.view.ViewGroup//following-sibling::android.view.ViewGroup[@content-desc='test-Price']/android.widget.TextView",
            name
        )))
        .ios(By::xpath(format!(
            "//XCUIElementTypeStaticText[@name='{}']//parent::XCUIElementTypeOther//following-sibling::XCUIElementTypeOther[@name='test-Price']/XCUIElementTypeStaticText",
            name
        )))
}

/// Bring the row of `product` on screen and check its name is shown
pub fn validate_name(ctx: &PageContext, product: &Product) -> Result<()> {
    let name = &product.name;
    ctx.step(
        &format!("Failed to validate product name for {}", name),
        || {
            ctx.actions().scroll_into_view(&name_scroll(name))?;
            ctx.verify_displayed(
                &name_label(name),
                &format!("Product with name {} not displayed.", name),
            )
        },
    )?;
    ctx.pass(&format!("Product '{}' name validated successfully.", name));
    Ok(())
}

/// Check the displayed price of `product` matches its expected price
pub fn validate_price(ctx: &PageContext, product: &Product) -> Result<()> {
    let name = &product.name;
    ctx.step(
        &format!("Failed to validate product price for {}", name),
        || {
            let price = price_label(name);
            ctx.verify_displayed(
                &price,
                &format!("Price of product with name {} not displayed.", name),
            )?;
            let shown = ctx.text_of(&price)?;
            let actual = parse_price(&shown)?;
            if actual != product.price {
                return Err(Error::assertion(format!(
                    "Product name: {}. Expected price: {}. Actual price: {}",
                    name,
                    format_price(product.price),
                    shown.trim()
                )));
            }
            Ok(())
        },
    )?;
    ctx.pass(&format!("Product '{}' price validated successfully.", name));
    Ok(())
}

/// Name and price of every product, in order
pub fn validate_products(ctx: &PageContext, products: &[Product]) -> Result<()> {
    for product in products {
        validate_name(ctx, product)?;
        validate_price(ctx, product)?;
    }
    Ok(())
}
