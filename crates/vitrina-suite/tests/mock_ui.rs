//! Suite-level tests running UI groups against a scripted mock driver.
//!
//! These verify the wiring between the suite's scenarios and the harness —
//! element contracts, skip-on-missing-driver, hook failure semantics —
//! without a browser or a running storefront.

use vitrina::{
    DriverFactory, ElementHandle, HarnessConfig, MockUiDriver, Runner, ScenarioStatus, UiDriver,
};
use vitrina_suite::selectors;

/// A mock page scripted with the login form contract
fn scripted_login_page() -> MockUiDriver {
    let mut driver = MockUiDriver::new();
    driver.add_element(
        selectors::LOGIN_FORM,
        ElementHandle::new(selectors::LOGIN_FORM.selector(), "form"),
    );
    driver.add_element(
        selectors::LOGIN_USERNAME,
        ElementHandle::new(selectors::LOGIN_USERNAME.selector(), "input")
            .with_attr("type", "text"),
    );
    driver.add_element(
        selectors::LOGIN_PASSWORD,
        ElementHandle::new(selectors::LOGIN_PASSWORD.selector(), "input")
            .with_attr("type", "password"),
    );
    driver.add_element(
        selectors::LOGIN_SUBMIT,
        ElementHandle::new(selectors::LOGIN_SUBMIT.selector(), "button")
            .with_text("Se connecter"),
    );
    driver.add_element(
        selectors::NAV_REGISTER,
        ElementHandle::new(selectors::NAV_REGISTER.selector(), "a").with_text("S'inscrire"),
    );
    // Successful login: the SPA leaves /login and stores the token
    driver.redirect_on_click(selectors::LOGIN_SUBMIT, "http://localhost:4200/#/");
    driver.set_local_storage(selectors::LOCAL_STORAGE_USER_KEY, "scripted-token");
    driver
}

fn login_page_factory() -> DriverFactory {
    Box::new(|| {
        Box::pin(async { Ok(Box::new(scripted_login_page()) as Box<dyn UiDriver>) })
    })
}

#[tokio::test]
async fn login_group_passes_against_the_scripted_contract() {
    let group = vitrina_suite::find_group("ui: login page").unwrap();
    let runner =
        Runner::new(HarnessConfig::default()).with_driver_factory(login_page_factory());
    let report = runner.run(&[group]).await.unwrap();

    assert_eq!(report.passed_count(), 2, "{}", report.render_text());
    assert!(report.all_green());
    assert!(report.groups[0].teardown_error.is_none());
}

#[tokio::test]
async fn login_group_fails_when_the_submit_button_is_missing() {
    // A page missing the submit button breaks the contract for both
    // scenarios: the first cannot find it, the second cannot log in.
    let factory: DriverFactory = Box::new(|| {
        Box::pin(async {
            let mut driver = MockUiDriver::new();
            driver.add_element(
                selectors::LOGIN_FORM,
                ElementHandle::new(selectors::LOGIN_FORM.selector(), "form"),
            );
            driver.add_element(
                selectors::LOGIN_USERNAME,
                ElementHandle::new(selectors::LOGIN_USERNAME.selector(), "input")
                    .with_attr("type", "text"),
            );
            driver.add_element(
                selectors::LOGIN_PASSWORD,
                ElementHandle::new(selectors::LOGIN_PASSWORD.selector(), "input")
                    .with_attr("type", "password"),
            );
            Ok(Box::new(driver) as Box<dyn UiDriver>)
        })
    });
    let runner = Runner::new(HarnessConfig::default()).with_driver_factory(factory);
    let report = runner
        .run(&[vitrina_suite::find_group("ui: login page").unwrap()])
        .await
        .unwrap();

    assert_eq!(report.failed_count(), 2);
    let first = &report.groups[0].scenarios[0];
    assert!(first.error.as_ref().unwrap().contains("login-submit"));
}

#[tokio::test]
async fn ui_groups_skip_without_a_driver_factory() {
    let group = vitrina_suite::find_group("ui: catalog").unwrap();
    let expected = group.scenario_count();
    let report = Runner::new(HarnessConfig::default())
        .run(&[group])
        .await
        .unwrap();

    assert_eq!(report.skipped_count(), expected);
    assert!(report.all_green(), "skips must not gate the run red");
    for record in &report.groups[0].scenarios {
        assert_eq!(record.status, ScenarioStatus::Skipped);
        assert!(record.skip_reason.as_ref().unwrap().contains("driver"));
    }
}

#[tokio::test]
async fn cart_group_marks_scenarios_failed_not_run_when_login_fixture_breaks() {
    // An empty page: the before hook's UI login cannot find the form
    let factory: DriverFactory =
        Box::new(|| Box::pin(async { Ok(Box::new(MockUiDriver::new()) as Box<dyn UiDriver>) }));
    let group = vitrina_suite::find_group("ui: cart").unwrap();
    let expected = group.scenario_count();
    let runner = Runner::new(HarnessConfig::default()).with_driver_factory(factory);
    let report = runner.run(&[group]).await.unwrap();

    assert_eq!(report.failed_count(), expected);
    for record in &report.groups[0].scenarios {
        assert_eq!(record.status, ScenarioStatus::Failed);
        assert!(!record.attempted, "hook failures must mark scenarios not-run");
        assert!(record.error.as_ref().unwrap().contains("before"));
    }
}
