//! Review scenarios against `POST /reviews`.
//!
//! Ratings are bounded 1..=5; everything else is a validation error.

use serde_json::json;
use vitrina::{assert_status, Group, Scenario, ScenarioCtx};

/// Group name
pub const NAME: &str = "api: reviews";

async fn post_review(
    ctx: &mut ScenarioCtx,
    body: serde_json::Value,
    expected: impl Into<vitrina::StatusSet>,
) -> vitrina::HarnessResult<()> {
    let session = ctx.session()?.clone();
    let resp = ctx
        .api
        .post("/reviews")
        .bearer(&session)
        .json(body)
        .fail_on_status(false)
        .send()
        .await?;
    ctx.check(assert_status(resp.status, expected));
    Ok(())
}

/// Build the reviews group
#[must_use]
pub fn group() -> Group {
    Group::new(NAME)
        .isolated()
        .before(|ctx| {
            Box::pin(async move {
                let credentials = ctx.config.credentials.clone();
                let session = ctx.fixtures.login(&credentials).await?;
                ctx.session = Some(session);
                Ok(())
            })
        })
        .scenario(Scenario::new("a five-star review is accepted", |ctx| {
            Box::pin(async move {
                post_review(
                    ctx,
                    json!({
                        "title": "Excellent produit !",
                        "comment": "Très satisfait de mon achat.",
                        "rating": 5,
                    }),
                    200,
                )
                .await
            })
        }))
        .scenario(Scenario::new("a middling review is accepted", |ctx| {
            Box::pin(async move {
                post_review(
                    ctx,
                    json!({"title": "Correct", "comment": "Moyen.", "rating": 3}),
                    200,
                )
                .await
            })
        }))
        .scenario(Scenario::new("a negative review is accepted", |ctx| {
            Box::pin(async move {
                post_review(
                    ctx,
                    json!({"title": "Déçu", "comment": "Bof.", "rating": 1}),
                    200,
                )
                .await
            })
        }))
        .scenario(Scenario::new(
            "posting a review requires authentication",
            |ctx| {
                Box::pin(async move {
                    let resp = ctx
                        .api
                        .post("/reviews")
                        .json(json!({"title": "Test", "comment": "Test", "rating": 4}))
                        .fail_on_status(false)
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, 401));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new("a rating above five is rejected", |ctx| {
            Box::pin(async move {
                post_review(
                    ctx,
                    json!({"title": "Test", "comment": "Test", "rating": 10}),
                    [400, 422],
                )
                .await
            })
        }))
        .scenario(Scenario::new("a rating below one is rejected", |ctx| {
            Box::pin(async move {
                post_review(
                    ctx,
                    json!({"title": "Test", "comment": "Test", "rating": 0}),
                    [400, 422],
                )
                .await
            })
        }))
        .scenario(Scenario::new("missing fields are rejected", |ctx| {
            Box::pin(async move { post_review(ctx, json!({"title": "Test"}), [400, 422]).await })
        }))
        .scenario(Scenario::new("an empty title is rejected", |ctx| {
            Box::pin(async move {
                post_review(
                    ctx,
                    json!({"title": "", "comment": "Commentaire", "rating": 4}),
                    [400, 422],
                )
                .await
            })
        }))
        .scenario(Scenario::new("an empty comment is rejected", |ctx| {
            Box::pin(async move {
                post_review(
                    ctx,
                    json!({"title": "Titre", "comment": "", "rating": 4}),
                    [400, 422],
                )
                .await
            })
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_shape() {
        let group = group();
        assert_eq!(group.name, NAME);
        assert_eq!(group.scenario_count(), 9);
        assert!(group.isolated);
    }
}
