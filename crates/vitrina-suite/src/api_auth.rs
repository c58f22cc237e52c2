//! Authentication scenarios against `POST /login` and the protected
//! `/orders` endpoint.

use serde_json::json;
use vitrina::{assert_shape, assert_status, assert_that, Group, Scenario};

/// Group name
pub const NAME: &str = "api: authentication";

/// Build the authentication group.
///
/// Stateless — every scenario logs in (or deliberately fails to) on its
/// own, so the group carries no session hooks.
#[must_use]
pub fn group() -> Group {
    Group::new(NAME)
        .isolated()
        .scenario(Scenario::new("unknown user is rejected", |ctx| {
            Box::pin(async move {
                let resp = ctx
                    .api
                    .post("/login")
                    .json(json!({
                        "username": "utilisateur.inexistant@test.com",
                        "password": "mauvaisMotDePasse123",
                    }))
                    .fail_on_status(false)
                    .send()
                    .await?;
                ctx.check(assert_status(resp.status, 401));
                Ok(())
            })
        }))
        .scenario(Scenario::new("known user receives a token", |ctx| {
            Box::pin(async move {
                let body = ctx.config.credentials.login_body();
                let resp = ctx
                    .api
                    .post("/login")
                    .json(body)
                    .fail_on_status(false)
                    .send()
                    .await?;
                ctx.check(assert_status(resp.status, 200));
                ctx.check(assert_shape(&resp.body, &["token"]));
                let token = resp.string_field("token").unwrap_or_default().to_string();
                ctx.check(assert_that(!token.is_empty(), "token is a non-empty string"));
                Ok(())
            })
        }))
        .scenario(Scenario::new("empty credentials are rejected", |ctx| {
            Box::pin(async move {
                let resp = ctx
                    .api
                    .post("/login")
                    .json(json!({"username": "", "password": ""}))
                    .fail_on_status(false)
                    .send()
                    .await?;
                ctx.check(assert_status(resp.status, [400, 401]));
                Ok(())
            })
        }))
        .scenario(Scenario::new(
            "username without a password is rejected",
            |ctx| {
                Box::pin(async move {
                    let username = ctx.config.credentials.username.clone();
                    let resp = ctx
                        .api
                        .post("/login")
                        .json(json!({"username": username}))
                        .fail_on_status(false)
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, [400, 401]));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "orders are confidential without authentication",
            |ctx| {
                Box::pin(async move {
                    let expected = ctx.config.unauthenticated_status;
                    let resp = ctx
                        .api
                        .get("/orders")
                        .fail_on_status(false)
                        .send()
                        .await?;
                    ctx.check(assert_status(resp.status, expected));
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
        assert_eq!(group.scenario_count(), 5);
        assert!(group.isolated);
        assert!(!group.requires_ui);
    }
}
