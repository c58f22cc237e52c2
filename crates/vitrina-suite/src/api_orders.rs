//! Cart scenarios against `GET /orders` and `PUT /orders/add`.
//!
//! The group logs in once and selects fixture products from the live
//! catalog in its `before` hook; scenarios share that session read-only.
//! The out-of-stock scenario skips when the catalog has no such product —
//! absence of the fixture is a valid state, not a failure.

use serde_json::json;
use vitrina::{assert_shape, assert_status, assert_that, Group, Scenario, StockPredicate};

/// Group name
pub const NAME: &str = "api: orders";

const AVAILABLE_PRODUCT: &str = "available_product";
const OUT_OF_STOCK_PRODUCT: &str = "out_of_stock_product";

/// Build the orders group
#[must_use]
pub fn group() -> Group {
    Group::new(NAME)
        .before(|ctx| {
            Box::pin(async move {
                let credentials = ctx.config.credentials.clone();
                let session = ctx.fixtures.login(&credentials).await?;
                ctx.session = Some(session);

                if let Some(product) = ctx
                    .fixtures
                    .find_product_by_stock(StockPredicate::Available)
                    .await?
                {
                    ctx.set_var(AVAILABLE_PRODUCT, json!(product.id));
                }
                if let Some(product) = ctx
                    .fixtures
                    .find_product_by_stock(StockPredicate::OutOfStock)
                    .await?
                {
                    ctx.set_var(OUT_OF_STOCK_PRODUCT, json!(product.id));
                }
                Ok(())
            })
        })
        .scenario(Scenario::new(
            "session token is accepted by the orders endpoint",
            |ctx| {
                Box::pin(async move {
                    let session = ctx.session()?.clone();
                    let resp = ctx
                        .api
                        .get("/orders")
                        .bearer(&session)
                        .fail_on_status(false)
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, 200));
                    ctx.check(assert_shape(&resp.body, &["orderLines"]));
                    let lines = resp.field("orderLines").and_then(serde_json::Value::as_array);
                    ctx.check(assert_that(lines.is_some(), "orderLines is an array"));
                    // Line shape only checked when the cart has content
                    if let Some(line) = lines.and_then(|l| l.first()) {
                        ctx.check(assert_shape(line, &["id", "quantity", "product"]));
                        if let Some(product) = line.get("product") {
                            ctx.check(assert_shape(product, &["id", "name", "price"]));
                        }
                    }
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "available product can be added to the cart",
            |ctx| {
                Box::pin(async move {
                    let Some(product) = ctx.var_i64(AVAILABLE_PRODUCT) else {
                        return Err(ctx.skip("no product with available stock in the catalog"));
                    };
                    let session = ctx.session()?.clone();
                    let resp = ctx
                        .api
                        .put("/orders/add")
                        .bearer(&session)
                        .json(json!({"product": product, "quantity": 1}))
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, 200));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "several units of an available product can be added",
            |ctx| {
                Box::pin(async move {
                    let Some(product) = ctx.var_i64(AVAILABLE_PRODUCT) else {
                        return Err(ctx.skip("no product with available stock in the catalog"));
                    };
                    let session = ctx.session()?.clone();
                    let resp = ctx
                        .api
                        .put("/orders/add")
                        .bearer(&session)
                        .json(json!({"product": product, "quantity": 3}))
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, 200));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "out-of-stock product cannot be added",
            |ctx| {
                Box::pin(async move {
                    let Some(product) = ctx.var_i64(OUT_OF_STOCK_PRODUCT) else {
                        return Err(ctx.skip("no out-of-stock product in the catalog"));
                    };
                    let session = ctx.session()?.clone();
                    let resp = ctx
                        .api
                        .put("/orders/add")
                        .bearer(&session)
                        .json(json!({"product": product, "quantity": 1}))
                        .fail_on_status(false)
                        .send()
                        .await?;
                    // Never 200: stock must gate the cart
                    ctx.check(assert_status(resp.status, [400, 409, 422]));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "adding to the cart requires authentication",
            |ctx| {
                Box::pin(async move {
                    let product = ctx.var_i64(AVAILABLE_PRODUCT).unwrap_or(1);
                    let resp = ctx
                        .api
                        .put("/orders/add")
                        .json(json!({"product": product, "quantity": 1}))
                        .fail_on_status(false)
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, 401));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new("negative quantity is rejected", |ctx| {
            Box::pin(async move {
                let Some(product) = ctx.var_i64(AVAILABLE_PRODUCT) else {
                    return Err(ctx.skip("no product with available stock in the catalog"));
                };
                let session = ctx.session()?.clone();
                let resp = ctx
                    .api
                    .put("/orders/add")
                    .bearer(&session)
                    .json(json!({"product": product, "quantity": -1}))
                    .fail_on_status(false)
                    .send()
                    .await?;
                ctx.check(assert_status(resp.status, [400, 422]));
                Ok(())
            })
        }))
        .scenario(Scenario::new("zero quantity is rejected", |ctx| {
            Box::pin(async move {
                let Some(product) = ctx.var_i64(AVAILABLE_PRODUCT) else {
                    return Err(ctx.skip("no product with available stock in the catalog"));
                };
                let session = ctx.session()?.clone();
                let resp = ctx
                    .api
                    .put("/orders/add")
                    .bearer(&session)
                    .json(json!({"product": product, "quantity": 0}))
                    .fail_on_status(false)
                    .send()
                    .await?;
                ctx.check(assert_status(resp.status, [400, 422]));
                Ok(())
            })
        }))
        .scenario(Scenario::new("unknown product is rejected", |ctx| {
            Box::pin(async move {
                let session = ctx.session()?.clone();
                let resp = ctx
                    .api
                    .put("/orders/add")
                    .bearer(&session)
                    .json(json!({"product": 99999, "quantity": 1}))
                    .fail_on_status(false)
                    .send()
                    .await?;
                ctx.check(assert_status(resp.status, [404, 422]));
                Ok(())
            })
        }))
}
