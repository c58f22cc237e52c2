//! Public catalog scenarios: product list, product detail, random
//! selection, review list.

use vitrina::{assert_shape, assert_status, assert_that, ApiResponse, Group, Scenario};

/// Group name
pub const NAME: &str = "api: catalog";

/// Every field a product detail response must carry
const PRODUCT_FIELDS: [&str; 9] = [
    "id",
    "name",
    "price",
    "availableStock",
    "description",
    "picture",
    "skin",
    "aromas",
    "ingredients",
];

fn id_set(resp: &ApiResponse) -> Vec<i64> {
    let mut ids: Vec<i64> = resp
        .array()
        .map(|items| {
            items
                .iter()
                .filter_map(|p| p.get("id").and_then(serde_json::Value::as_i64))
                .collect()
        })
        .unwrap_or_default();
    ids.sort_unstable();
    ids
}

/// Build the catalog group.
///
/// Product-detail scenarios live in a nested child group: they all consume
/// the ids stashed by the parent's list scenario.
#[must_use]
pub fn group() -> Group {
    Group::new(NAME)
        .isolated()
        .scenario(Scenario::new("product list is served", |ctx| {
            Box::pin(async move {
                let resp = ctx.api.get("/products").send().await?;
                ctx.check(assert_status(resp.status, 200));
                let count = resp.array().map_or(0, Vec::len);
                ctx.check(assert_that(
                    resp.array().is_some(),
                    "product list body is an array",
                ));
                ctx.check(assert_that(count > 0, "catalog is not empty"));
                // Later scenarios reuse the first two ids
                if let Some(ids) = resp.array().map(|items| {
                    items
                        .iter()
                        .filter_map(|p| p.get("id").and_then(serde_json::Value::as_i64))
                        .take(2)
                        .collect::<Vec<_>>()
                }) {
                    ctx.set_var("catalog_ids", serde_json::json!(ids));
                }
                Ok(())
            })
        }))
        .scenario(Scenario::new("random selection is served", |ctx| {
            Box::pin(async move {
                let resp = ctx.api.get("/products/random").send().await?;
                ctx.check(assert_status(resp.status, 200));
                ctx.check(assert_that(
                    resp.array().is_some(),
                    "random selection body is an array",
                ));
                Ok(())
            })
        }))
        .scenario(Scenario::new("product list reads are idempotent", |ctx| {
            Box::pin(async move {
                let first = ctx.api.get("/products").send().await?;
                let second = ctx.api.get("/products").send().await?;
                ctx.check(assert_status(first.status, 200));
                ctx.check(assert_status(second.status, 200));
                ctx.check(assert_that(
                    id_set(&first) == id_set(&second),
                    "two consecutive reads return identical id sets",
                ));
                Ok(())
            })
        }))
        .scenario(Scenario::new("review list is served", |ctx| {
            Box::pin(async move {
                let resp = ctx.api.get("/reviews").send().await?;
                ctx.check(assert_status(resp.status, 200));
                ctx.check(assert_that(
                    resp.array().is_some(),
                    "review list body is an array",
                ));
                Ok(())
            })
        }))
        .child(detail_group())
}

/// Nested child group for product-detail reads
fn detail_group() -> Group {
    Group::new("product detail")
        .scenario(Scenario::new(
            "product detail carries the full shape",
            |ctx| {
                Box::pin(async move {
                    let Some(id) = ctx
                        .var("catalog_ids")
                        .and_then(|ids| ids.get(0))
                        .and_then(serde_json::Value::as_i64)
                    else {
                        return Err(ctx.skip("catalog produced no product id"));
                    };
                    let resp = ctx.api.get(format!("/products/{id}")).send().await?;
                    ctx.check(assert_status(resp.status, 200));
                    ctx.check(assert_shape(&resp.body, &PRODUCT_FIELDS));
                    ctx.check(assert_that(
                        resp.field("id").and_then(serde_json::Value::as_i64) == Some(id),
                        "detail id matches the requested id",
                    ));
                    ctx.check(assert_that(
                        resp.field("price").map_or(false, serde_json::Value::is_number),
                        "price is a number",
                    ));
                    ctx.check(assert_that(
                        resp.field("availableStock")
                            .map_or(false, serde_json::Value::is_number),
                        "availableStock is a number",
                    ));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new("unknown product id is an error", |ctx| {
            Box::pin(async move {
                let resp = ctx
                    .api
                    .get("/products/99999")
                    .fail_on_status(false)
                    .send()
                    .await?;
                ctx.check(assert_status(resp.status, [404, 500]));
                Ok(())
            })
        }))
        .scenario(Scenario::new(
            "distinct ids serve distinct products",
            |ctx| {
                Box::pin(async move {
                    let ids: Vec<i64> = ctx
                        .var("catalog_ids")
                        .and_then(serde_json::Value::as_array)
                        .map(|ids| ids.iter().filter_map(serde_json::Value::as_i64).collect())
                        .unwrap_or_default();
                    let [first, second] = ids[..] else {
                        return Err(ctx.skip("fewer than two products in the catalog"));
                    };
                    let one = ctx.api.get(format!("/products/{first}")).send().await?;
                    let two = ctx.api.get(format!("/products/{second}")).send().await?;
                    ctx.check(assert_that(
                        one.field("id") != two.field("id"),
                        "ids differ",
                    ));
                    ctx.check(assert_that(
                        one.field("name") != two.field("name"),
                        "names differ",
                    ));
                    Ok(())
                })
            },
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(body: serde_json::Value) -> ApiResponse {
        ApiResponse {
            status: 200,
            headers: HashMap::new(),
            text: body.to_string(),
            body,
        }
    }

    #[test]
    fn group_shape() {
        let group = group();
        assert_eq!(group.name, NAME);
        assert_eq!(group.scenario_count(), 4);
        assert_eq!(group.total_scenario_count(), 7);
        assert!(!group.requires_ui_anywhere());
    }

    #[test]
    fn id_set_is_order_insensitive() {
        let a = response(serde_json::json!([{"id": 3}, {"id": 1}, {"id": 2}]));
        let b = response(serde_json::json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        assert_eq!(id_set(&a), id_set(&b));
        assert_eq!(id_set(&a), vec![1, 2, 3]);
    }

    #[test]
    fn id_set_of_non_array_is_empty() {
        let resp = response(serde_json::json!({"error": "boom"}));
        assert!(id_set(&resp).is_empty());
    }
}
