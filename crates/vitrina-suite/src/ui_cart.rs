//! Cart scenarios driven through the browser.
//!
//! The group logs in through the UI form once; scenarios then accumulate
//! state sequentially — the add-to-cart scenario leaves a cart line the
//! API cross-check scenario depends on.

use crate::selectors;
use crate::ui_login::login_via_form;
use vitrina::{assert_element, assert_shape, assert_status, assert_that, ElementExpectation, Group, Scenario};

/// Group name
pub const NAME: &str = "ui: cart";

/// Build the cart group
#[must_use]
pub fn group() -> Group {
    Group::new(NAME)
        .requires_ui()
        .before(|ctx| Box::pin(login_via_form(ctx)))
        .scenario(Scenario::new(
            "navigation exposes the cart to an authenticated user",
            |ctx| {
                Box::pin(async move {
                    let url = ctx.config.ui_url("/");
                    let driver = ctx.driver()?;
                    driver.navigate(&url).await?;
                    let cart = driver.find(selectors::NAV_CART).await?;
                    let logout = driver.find(selectors::NAV_LOGOUT).await?;
                    ctx.check_all(assert_element(
                        &cart,
                        &ElementExpectation::new()
                            .visible(true)
                            .text_contains("Mon panier"),
                    ));
                    ctx.check_all(assert_element(
                        &logout,
                        &ElementExpectation::new().visible(true),
                    ));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new("adding a product lands in the cart", |ctx| {
            Box::pin(async move {
                let url = ctx.config.ui_url("/products");
                let driver = ctx.driver()?;
                driver.navigate(&url).await?;

                let link = driver.find(selectors::PRODUCT_LINK).await?;
                driver.click(&link).await?;
                let detail_url = driver.current_url().await?;

                let quantity = driver.find(selectors::DETAIL_QUANTITY).await?;
                driver.clear(&quantity).await?;
                driver.type_text(&quantity, "1").await?;
                let add = driver.find(selectors::DETAIL_ADD).await?;
                driver.click(&add).await?;

                let cart_url = driver.current_url().await?;
                let lines = driver.find_all(selectors::CART_LINE).await?;

                ctx.check(assert_that(
                    detail_url.contains("/products/"),
                    "started from a product detail page",
                ));
                ctx.check(assert_that(
                    cart_url.contains("/cart"),
                    "add-to-cart redirects to the cart",
                ));
                ctx.check(assert_that(
                    !lines.is_empty(),
                    "cart shows at least one line item",
                ));
                Ok(())
            })
        }))
        .scenario(Scenario::new(
            "cart contents are confirmed over the api",
            |ctx| {
                Box::pin(async move {
                    let token = ctx
                        .driver()?
                        .read_local_storage(selectors::LOCAL_STORAGE_USER_KEY)
                        .await?;
                    let Some(token) = token.filter(|t| !t.is_empty()) else {
                        return Err(ctx.skip("no session token in localStorage"));
                    };
                    let resp = ctx
                        .api
                        .get("/orders")
                        .bearer_token(&token)
                        .fail_on_status(false)
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, 200));
                    ctx.check(assert_shape(&resp.body, &["orderLines"]));
                    let count = resp
                        .field("orderLines")
                        .and_then(serde_json::Value::as_array)
                        .map_or(0, Vec::len);
                    ctx.check(assert_that(
                        count > 0,
                        "the line added through the UI is visible over the API",
                    ));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "logging out hides the cart from the navigation",
            |ctx| {
                Box::pin(async move {
                    let url = ctx.config.ui_url("/");
                    let driver = ctx.driver()?;
                    driver
                        .remove_local_storage(selectors::LOCAL_STORAGE_USER_KEY)
                        .await?;
                    driver.navigate(&url).await?;

                    let carts = driver.find_all(selectors::NAV_CART).await?;
                    let login = driver.find(selectors::NAV_LOGIN).await?;
                    let register = driver.find(selectors::NAV_REGISTER).await?;

                    ctx.check(assert_that(
                        carts.iter().all(|c| !c.is_visible()),
                        "cart link is absent for an anonymous visitor",
                    ));
                    ctx.check_all(assert_element(
                        &login,
                        &ElementExpectation::new().visible(true),
                    ));
                    ctx.check_all(assert_element(
                        &register,
                        &ElementExpectation::new().visible(true),
                    ));
                    Ok(())
                })
            },
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_shape() {
        let group = group();
        assert_eq!(group.name, NAME);
        assert_eq!(group.scenario_count(), 4);
        assert!(group.requires_ui);
        // Mutates the fixture account's cart, like the orders API group
        assert!(!group.isolated);
    }
}
