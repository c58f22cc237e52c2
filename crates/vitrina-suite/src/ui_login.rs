//! Login page scenarios driven through the browser.

use crate::selectors;
use vitrina::{
    assert_element, assert_that, ElementExpectation, Group, HarnessError, HarnessResult, Scenario,
    ScenarioCtx,
};

/// Group name
pub const NAME: &str = "ui: login page";

/// Log in through the UI form with the fixture account.
///
/// Shared by every UI group that needs an authenticated browser session.
///
/// # Errors
///
/// `Fixture` when the page does not leave `/login` after submitting —
/// dependent scenarios cannot run without the session.
pub(crate) async fn login_via_form(ctx: &mut ScenarioCtx) -> HarnessResult<()> {
    let url = ctx.config.ui_url("/login");
    let username = ctx.config.credentials.username.clone();
    let password = ctx.config.credentials.password.clone();

    let driver = ctx.driver()?;
    driver.navigate(&url).await?;
    let field = driver.find(selectors::LOGIN_USERNAME).await?;
    driver.type_text(&field, &username).await?;
    let field = driver.find(selectors::LOGIN_PASSWORD).await?;
    driver.type_text(&field, &password).await?;
    let submit = driver.find(selectors::LOGIN_SUBMIT).await?;
    driver.click(&submit).await?;

    let current = driver.current_url().await?;
    if current.contains("/login") {
        return Err(HarnessError::Fixture {
            message: format!("still on the login page after submitting credentials ({current})"),
        });
    }
    Ok(())
}

/// Build the login page group
#[must_use]
pub fn group() -> Group {
    Group::new(NAME)
        .requires_ui()
        .scenario(Scenario::new(
            "login form exposes its fields and actions",
            |ctx| {
                Box::pin(async move {
                    let url = ctx.config.ui_url("/login");
                    let driver = ctx.driver()?;
                    driver.navigate(&url).await?;

                    let form = driver.find(selectors::LOGIN_FORM).await?;
                    let username = driver.find(selectors::LOGIN_USERNAME).await?;
                    let password = driver.find(selectors::LOGIN_PASSWORD).await?;
                    let submit = driver.find(selectors::LOGIN_SUBMIT).await?;
                    let register = driver.find(selectors::NAV_REGISTER).await?;

                    ctx.check_all(assert_element(
                        &form,
                        &ElementExpectation::new().visible(true),
                    ));
                    ctx.check_all(assert_element(
                        &username,
                        &ElementExpectation::new().visible(true).attr("type", "text"),
                    ));
                    ctx.check(assert_that(
                        username.attr("disabled").is_none(),
                        "email field is editable",
                    ));
                    ctx.check_all(assert_element(
                        &password,
                        &ElementExpectation::new()
                            .visible(true)
                            .attr("type", "password"),
                    ));
                    ctx.check(assert_that(
                        password.attr("disabled").is_none(),
                        "password field is editable",
                    ));
                    ctx.check_all(assert_element(
                        &submit,
                        &ElementExpectation::new()
                            .visible(true)
                            .text_contains("Se connecter"),
                    ));
                    ctx.check_all(assert_element(
                        &register,
                        &ElementExpectation::new().visible(true),
                    ));
                    Ok(())
                })
            },
        ))
        .scenario(Scenario::new(
            "submitted credentials authenticate the session",
            |ctx| {
                Box::pin(async move {
                    login_via_form(ctx).await?;
                    let driver = ctx.driver()?;
                    let url = driver.current_url().await?;
                    let token = driver
                        .read_local_storage(selectors::LOCAL_STORAGE_USER_KEY)
                        .await?;
                    ctx.check(assert_that(
                        !url.contains("/login"),
                        "navigation left the login page",
                    ));
                    ctx.check(assert_that(
                        token.map_or(false, |t| !t.is_empty()),
                        "localStorage holds the session token",
                    ));
                    Ok(())
                })
            },
        ))
        .after(|ctx| {
            Box::pin(async move {
                // Leave no session behind for the next group
                let driver = ctx.driver()?;
                driver
                    .remove_local_storage(selectors::LOCAL_STORAGE_USER_KEY)
                    .await
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_shape() {
        let group = group();
        assert_eq!(group.name, NAME);
        assert_eq!(group.scenario_count(), 2);
        assert!(group.requires_ui);
    }
}
