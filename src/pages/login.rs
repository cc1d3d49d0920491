//! Login screen

use super::base::PageContext;
use crate::locator::{By, Locator};
use crate::Result;

pub struct LoginPage<'a> {
    ctx: &'a PageContext,
    username: Locator,
    password: Locator,
    login_button: Locator,
}

impl<'a> LoginPage<'a> {
    pub fn new(ctx: &'a PageContext) -> Self {
        Self {
            ctx,
            username: Locator::new("username field")
                .android(By::accessibility_id("test-Username"))
                .ios(By::ios_predicate("name == 'test-Username'")),
            password: Locator::new("password field")
                .android(By::accessibility_id("test-Password"))
                .ios(By::ios_predicate("name == 'test-Password'")),
            login_button: Locator::new("login button")
                .android(By::accessibility_id("test-LOGIN"))
                .ios(By::ios_predicate("name == 'test-LOGIN'")),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let ctx = self.ctx;
        ctx.step("Login action failed", || {
            ctx.verify_displayed(&self.username, "Username input field is not displayed")?;
            ctx.actions().enter_text(&self.username, username)?;
            ctx.verify_displayed(&self.password, "Password input field is not displayed")?;
            ctx.actions().enter_text(&self.password, password)?;
            ctx.verify_clickable(&self.login_button, "Login button is not clickable")?;
            ctx.actions().tap(&self.login_button)
        })?;
        ctx.pass(&format!(
            "Login action completed successfully with username: {}",
            username
        ));
        Ok(())
    }
}
