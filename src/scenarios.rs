//! Test scenarios
//!
//! Each scenario drives the page objects in order against the calling
//! thread's session. Scenarios start on the login screen of a freshly
//! launched app and leave teardown to the suite harness.

use crate::pages::{
    CartPage, CheckoutInfoPage, CheckoutOverviewPage, Customer, LoginPage,
    OrderConfirmationPage, PageContext, Product, ProductsPage,
};
use crate::Result;

/// Demo account accepted by the app
pub const USERNAME: &str = "standard_user";
pub const PASSWORD: &str = "secret_sauce";

/// Scenario entry point
pub type ScenarioFn = fn(&PageContext) -> Result<()>;

/// Named test case
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub run: ScenarioFn,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

/// Every scenario in suite order
pub fn all() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Login with valid credentials",
            run: login,
        },
        Scenario {
            name: "Checkout single product",
            run: checkout_single_product,
        },
        Scenario {
            name: "Checkout multiple products",
            run: checkout_multiple_products,
        },
        Scenario {
            name: "Open menu",
            run: open_menu,
        },
    ]
}

fn sign_in(ctx: &PageContext) -> Result<()> {
    LoginPage::new(ctx).login(USERNAME, PASSWORD)?;
    ProductsPage::new(ctx).validate_navigation()
}

/// Log in and land on the product catalogue
pub fn login(ctx: &PageContext) -> Result<()> {
    sign_in(ctx)
}

/// Add one product, check it in the cart and start the checkout
pub fn checkout_single_product(ctx: &PageContext) -> Result<()> {
    let products = [Product::new("Sauce Labs Onesie", 7.99)];
    ctx.info("Data setup completed.");

    sign_in(ctx)?;
    let catalogue = ProductsPage::new(ctx);
    for product in &products {
        catalogue.add_product_to_cart(&product.name)?;
    }
    catalogue.click_cart_button()?;

    let cart = CartPage::new(ctx);
    cart.validate_navigation()?;
    cart.validate_product_details(&products)?;
    cart.click_checkout_button()
}

/// Buy two products and walk the full checkout
pub fn checkout_multiple_products(ctx: &PageContext) -> Result<()> {
    let products = [
        Product::new("Sauce Labs Backpack", 29.99),
        Product::new("Sauce Labs Onesie", 7.99),
    ];
    let customer = Customer::new("Arunangshu", "Podder", "560068");
    ctx.info("Data setup completed.");

    sign_in(ctx)?;
    let catalogue = ProductsPage::new(ctx);
    for product in &products {
        catalogue.add_product_to_cart(&product.name)?;
    }
    catalogue.click_cart_button()?;

    let cart = CartPage::new(ctx);
    cart.validate_navigation()?;
    cart.validate_product_details(&products)?;
    cart.click_checkout_button()?;

    let information = CheckoutInfoPage::new(ctx);
    information.validate_navigation()?;
    information.enter_customer_details(&customer)?;
    information.click_continue_button()?;

    let overview = CheckoutOverviewPage::new(ctx);
    overview.validate_navigation()?;
    overview.validate_product_details(&products)?;
    overview.validate_item_total(&products)?;
    overview.click_finish_button()?;

    let confirmation = OrderConfirmationPage::new(ctx);
    confirmation.validate_navigation()?;
    confirmation.validate_thank_you_message()
}

/// Log in and open the side menu
pub fn open_menu(ctx: &PageContext) -> Result<()> {
    sign_in(ctx)?;
    ProductsPage::new(ctx).click_menu_button()
}
