//! Catalog browsing scenarios: home page cards, products page, product
//! detail.
//!
//! Card contents are verified by pairing the card count against the count
//! of each nested element — every card must expose an image, a name, a
//! price, its ingredients, and a detail link.

use crate::selectors;
use vitrina::{assert_element, assert_that, ElementExpectation, Group, Scenario};

/// Group name
pub const NAME: &str = "ui: catalog";

/// Build the catalog browsing group
#[must_use]
pub fn group() -> Group {
    Group::new(NAME)
        .requires_ui()
        .scenario(Scenario::new(
            "home page lists products with their details",
            |ctx| {
                Box::pin(async move {
                    let url = ctx.config.ui_url("/");
                    let driver = ctx.driver()?;
                    driver.navigate(&url).await?;

                    let cards = driver.find_all(selectors::PRODUCT_HOME).await?;
                    let images = driver
                        .find_all_within(selectors::PRODUCT_HOME, selectors::PRODUCT_HOME_IMG)
                        .await?;
                    let names = driver
                        .find_all_within(selectors::PRODUCT_HOME, selectors::PRODUCT_HOME_NAME)
                        .await?;
                    let prices = driver
                        .find_all_within(selectors::PRODUCT_HOME, selectors::PRODUCT_HOME_PRICE)
                        .await?;
                    let ingredients = driver
                        .find_all_within(
                            selectors::PRODUCT_HOME,
                            selectors::PRODUCT_HOME_INGREDIENTS,
                        )
                        .await?;
                    let links = driver
                        .find_all_within(selectors::PRODUCT_HOME, selectors::PRODUCT_HOME_LINK)
                        .await?;

                    ctx.check(assert_that(
                        !cards.is_empty(),
                        "home page shows at least one product card",
                    ));
                    ctx.check(assert_that(
                        images.len() == cards.len(),
                        "every card has an image",
                    ));
                    ctx.check(assert_that(
                        images
                            .iter()
                            .all(|img| img.attr("src").map_or(false, |src| !src.is_empty())),
                        "every image has a non-empty src",
                    ));
                    ctx.check(assert_that(
                        names.len() == cards.len(),
                        "every card has a name",
                    ));
                    ctx.check(assert_that(
                        prices.len() == cards.len(),
                        "every card has a price",
                    ));
                    ctx.check(assert_that(
                        prices.iter().all(|p| p.text().contains('€')),
                        "every price is in euros",
                    ));
                    ctx.check(assert_that(
                        ingredients.len() == cards.len(),
                        "every card lists its ingredients",
                    ));
                    ctx.check(assert_that(
                        links.len() == cards.len()
                            && links.iter().all(|l| l.text().contains("Consulter")),
                        "every card has a Consulter link",
                    ));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "products page links every card to its detail",
            |ctx| {
                Box::pin(async move {
                    let url = ctx.config.ui_url("/products");
                    let driver = ctx.driver()?;
                    driver.navigate(&url).await?;

                    let cards = driver.find_all(selectors::PRODUCT).await?;
                    let links = driver
                        .find_all_within(selectors::PRODUCT, selectors::PRODUCT_LINK)
                        .await?;
                    ctx.check(assert_that(
                        !cards.is_empty(),
                        "products page shows at least one card",
                    ));
                    ctx.check(assert_that(
                        links.len() == cards.len()
                            && links.iter().all(|l| l.text().contains("Consulter")),
                        "every card has a Consulter link",
                    ));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "product detail shows stock and cart controls",
            |ctx| {
                Box::pin(async move {
                    let url = ctx.config.ui_url("/products");
                    let driver = ctx.driver()?;
                    driver.navigate(&url).await?;

                    let link = driver.find(selectors::PRODUCT_LINK).await?;
                    driver.click(&link).await?;
                    let current = driver.current_url().await?;

                    let form = driver.find(selectors::DETAIL_FORM).await?;
                    let name = driver.find(selectors::DETAIL_NAME).await?;
                    let stock = driver.find(selectors::DETAIL_STOCK).await?;
                    let quantity = driver.find(selectors::DETAIL_QUANTITY).await?;
                    let add = driver.find(selectors::DETAIL_ADD).await?;

                    ctx.check(assert_that(
                        current.contains("/products/"),
                        "link leads to a product detail route",
                    ));
                    ctx.check_all(assert_element(
                        &form,
                        &ElementExpectation::new().visible(true),
                    ));
                    ctx.check(assert_that(
                        !name.text().is_empty(),
                        "detail page names the product",
                    ));
                    ctx.check_all(assert_element(
                        &stock,
                        &ElementExpectation::new()
                            .visible(true)
                            .text_contains("en stock"),
                    ));
                    ctx.check_all(assert_element(
                        &quantity,
                        &ElementExpectation::new()
                            .visible(true)
                            .attr("type", "number"),
                    ));
                    ctx.check_all(assert_element(
                        &add,
                        &ElementExpectation::new()
                            .visible(true)
                            .text_contains("Ajouter au panier"),
                    ));
                    ctx.check(assert_that(
                        add.attr("disabled").is_none(),
                        "add-to-cart button is clickable",
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
        assert_eq!(group.scenario_count(), 3);
        assert!(group.requires_ui);
    }
}
