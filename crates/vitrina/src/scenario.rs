//! Scenarios, groups, and the execution context handed to test bodies.
//!
//! A scenario is one independently reportable case: a name plus an async
//! body run against a [`ScenarioCtx`]. Groups collect scenarios behind
//! shared `before`/`before_each`/`after_each`/`after` hooks and carry the
//! policies the runner needs (session scope, isolation flag for cross-group
//! scheduling, whether a UI driver is required).
//!
//! Session state is an explicit object on the context, not a shared mutable
//! closure variable: a group-scoped session is set once in `before` and
//! read by every scenario; a scenario-scoped session is replaced in
//! `before_each` and dropped after each scenario.

use crate::assertion::{AssertionResult, CheckSet};
use crate::config::HarnessConfig;
use crate::driver::UiDriver;
use crate::fixture::FixtureManager;
use crate::http::ApiClient;
use crate::result::{HarnessError, HarnessResult};
use crate::session::{Session, SessionScope};
use futures::future::BoxFuture;
use std::collections::HashMap;

/// Async body of a scenario or hook
pub type ScenarioBody =
    Box<dyn for<'a> Fn(&'a mut ScenarioCtx) -> BoxFuture<'a, HarnessResult<()>> + Send + Sync>;

/// One independently reportable test case.
///
/// Immutable once defined; executed exactly once per run.
pub struct Scenario {
    /// Scenario name
    pub name: String,
    pub(crate) body: ScenarioBody,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

impl Scenario {
    /// Define a scenario
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a mut ScenarioCtx) -> BoxFuture<'a, HarnessResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub(crate) async fn run(&self, ctx: &mut ScenarioCtx) -> HarnessResult<()> {
        (self.body)(ctx).await
    }
}

/// A named collection of scenarios sharing setup/teardown hooks
pub struct Group {
    /// Group name
    pub name: String,
    /// Whether the group shares no mutable fixture with other groups, so a
    /// scheduler may run it concurrently with them
    pub isolated: bool,
    /// Whether scenarios in this group drive the browser UI
    pub requires_ui: bool,
    /// Lifetime policy for sessions acquired by this group's hooks
    pub session_scope: SessionScope,
    pub(crate) before: Option<ScenarioBody>,
    pub(crate) before_each: Option<ScenarioBody>,
    pub(crate) after_each: Option<ScenarioBody>,
    pub(crate) after: Option<ScenarioBody>,
    pub(crate) scenarios: Vec<Scenario>,
    pub(crate) children: Vec<Group>,
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("scenarios", &self.scenarios.len())
            .field("children", &self.children.len())
            .field("isolated", &self.isolated)
            .field("requires_ui", &self.requires_ui)
            .finish()
    }
}

impl Group {
    /// Create an empty group
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isolated: false,
            requires_ui: false,
            session_scope: SessionScope::default(),
            before: None,
            before_each: None,
            after_each: None,
            after: None,
            scenarios: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a scenario
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Nest a child group.
    ///
    /// Children run after this group's own scenarios, inside the same
    /// context: this group's `before` has already run once, and its
    /// `before_each`/`after_each` wrap every descendant scenario
    /// (outer-first for setup, inner-first for teardown).
    #[must_use]
    pub fn child(mut self, group: Group) -> Self {
        self.children.push(group);
        self
    }

    /// Hook run once before the first scenario
    #[must_use]
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut ScenarioCtx) -> BoxFuture<'a, HarnessResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    /// Hook run before every scenario
    #[must_use]
    pub fn before_each<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut ScenarioCtx) -> BoxFuture<'a, HarnessResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.before_each = Some(Box::new(hook));
        self
    }

    /// Hook run after every scenario, even a failing one
    #[must_use]
    pub fn after_each<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut ScenarioCtx) -> BoxFuture<'a, HarnessResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.after_each = Some(Box::new(hook));
        self
    }

    /// Hook run once after the last scenario
    #[must_use]
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut ScenarioCtx) -> BoxFuture<'a, HarnessResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    /// Mark the group safe for cross-group parallel scheduling
    #[must_use]
    pub const fn isolated(mut self) -> Self {
        self.isolated = true;
        self
    }

    /// Mark the group as driving the browser UI
    #[must_use]
    pub const fn requires_ui(mut self) -> Self {
        self.requires_ui = true;
        self
    }

    /// Choose the session lifetime policy
    #[must_use]
    pub const fn session_scope(mut self, scope: SessionScope) -> Self {
        self.session_scope = scope;
        self
    }

    /// Number of scenarios directly in the group
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    /// Number of scenarios in the group and every nested child
    #[must_use]
    pub fn total_scenario_count(&self) -> usize {
        self.scenarios.len()
            + self
                .children
                .iter()
                .map(Group::total_scenario_count)
                .sum::<usize>()
    }

    /// Whether this group or any nested child drives the UI
    #[must_use]
    pub fn requires_ui_anywhere(&self) -> bool {
        self.requires_ui || self.children.iter().any(Group::requires_ui_anywhere)
    }

    /// Names of the direct scenarios, in execution order
    #[must_use]
    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Execution context handed to hooks and scenario bodies.
///
/// One context lives for the duration of a group; scenarios within the
/// group run strictly sequentially against it, so later scenarios may
/// assume state left by earlier ones (an accumulated cart, a stashed
/// product id).
pub struct ScenarioCtx {
    /// Harness configuration
    pub config: HarnessConfig,
    /// HTTP client adapter
    pub api: ApiClient,
    /// Fixture manager
    pub fixtures: FixtureManager,
    /// Session established by a hook, if any
    pub session: Option<Session>,
    driver: Option<Box<dyn UiDriver>>,
    checks: CheckSet,
    vars: HashMap<String, serde_json::Value>,
}

impl std::fmt::Debug for ScenarioCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioCtx")
            .field("api", &self.api.base_url())
            .field("has_session", &self.session.is_some())
            .field("has_driver", &self.driver.is_some())
            .finish()
    }
}

impl ScenarioCtx {
    /// Create a context for one group run
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        let api = ApiClient::new(config.api_base_url.clone());
        let fixtures = FixtureManager::new(api.clone());
        Self {
            config,
            api,
            fixtures,
            session: None,
            driver: None,
            checks: CheckSet::new(),
            vars: HashMap::new(),
        }
    }

    /// Record one check result
    pub fn check(&mut self, result: AssertionResult) {
        self.checks.record(result);
    }

    /// Record every result of a multi-part check
    pub fn check_all(&mut self, results: Vec<AssertionResult>) {
        self.checks.record_all(results);
    }

    /// The group session.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no hook established one — authenticated
    /// scenarios belong in groups whose setup logs in.
    pub fn session(&self) -> HarnessResult<&Session> {
        self.session.as_ref().ok_or_else(|| HarnessError::InvalidState {
            message: "no session established for this group".to_string(),
        })
    }

    /// The UI driver.
    ///
    /// # Errors
    ///
    /// `PreconditionAbsent` when no driver is configured; the runner
    /// converts this into a skip.
    pub fn driver(&mut self) -> HarnessResult<&mut dyn UiDriver> {
        match self.driver {
            Some(ref mut driver) => Ok(driver.as_mut()),
            None => Err(HarnessError::PreconditionAbsent {
                reason: "no UI driver configured for this run".to_string(),
            }),
        }
    }

    /// Whether a driver is attached
    #[must_use]
    pub const fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    /// Attach a driver for the group
    pub fn set_driver(&mut self, driver: Box<dyn UiDriver>) {
        self.driver = Some(driver);
    }

    /// Detach the driver (for teardown)
    pub fn take_driver(&mut self) -> Option<Box<dyn UiDriver>> {
        self.driver.take()
    }

    /// Build the skip error for an unmet precondition
    #[must_use]
    pub fn skip(&self, reason: impl Into<String>) -> HarnessError {
        HarnessError::PreconditionAbsent {
            reason: reason.into(),
        }
    }

    /// Stash a value for later scenarios in the group
    pub fn set_var(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.vars.insert(key.into(), value);
    }

    /// Read a stashed value
    #[must_use]
    pub fn var(&self, key: &str) -> Option<&serde_json::Value> {
        self.vars.get(key)
    }

    /// Read a stashed integer
    #[must_use]
    pub fn var_i64(&self, key: &str) -> Option<i64> {
        self.var(key).and_then(serde_json::Value::as_i64)
    }

    /// Read a stashed string
    #[must_use]
    pub fn var_str(&self, key: &str) -> Option<&str> {
        self.var(key).and_then(serde_json::Value::as_str)
    }

    /// Checks recorded so far in the current scenario
    #[must_use]
    pub fn checks(&self) -> &CheckSet {
        &self.checks
    }

    pub(crate) fn begin_scenario(&mut self) {
        let _ = self.checks.take();
    }

    pub(crate) fn take_checks(&mut self) -> Vec<AssertionResult> {
        self.checks.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::assert_status;

    fn ctx() -> ScenarioCtx {
        ScenarioCtx::new(HarnessConfig::default())
    }

    #[tokio::test]
    async fn scenario_body_runs_against_ctx() {
        let scenario = Scenario::new("stashes a var", |ctx| {
            Box::pin(async move {
                ctx.set_var("product_id", serde_json::json!(7));
                ctx.check(assert_status(200, 200));
                Ok(())
            })
        });
        let mut ctx = ctx();
        scenario.run(&mut ctx).await.unwrap();
        assert_eq!(ctx.var_i64("product_id"), Some(7));
        assert!(ctx.checks().all_passed());
        assert_eq!(ctx.checks().len(), 1);
    }

    #[tokio::test]
    async fn skip_builds_precondition_absent() {
        let ctx = ctx();
        let err = ctx.skip("no out-of-stock product in catalog");
        assert!(err.is_skip());
        assert!(err.to_string().contains("out-of-stock"));
    }

    #[test]
    fn missing_driver_is_a_skip() {
        let mut ctx = ctx();
        let err = ctx.driver().err().unwrap();
        assert!(err.is_skip());
    }

    #[test]
    fn missing_session_is_invalid_state() {
        let ctx = ctx();
        let err = ctx.session().err().unwrap();
        assert!(matches!(err, HarnessError::InvalidState { .. }));
    }

    #[test]
    fn begin_scenario_clears_previous_checks() {
        let mut ctx = ctx();
        ctx.check(assert_status(403, 401));
        assert!(!ctx.checks().all_passed());
        ctx.begin_scenario();
        assert!(ctx.checks().is_empty());
    }

    #[test]
    fn group_builder_collects_scenarios_in_order() {
        let group = Group::new("api: orders")
            .isolated()
            .scenario(Scenario::new("first", |_| Box::pin(async { Ok(()) })))
            .scenario(Scenario::new("second", |_| Box::pin(async { Ok(()) })));
        assert_eq!(group.scenario_count(), 2);
        assert_eq!(group.scenario_names(), vec!["first", "second"]);
        assert!(group.isolated);
        assert!(!group.requires_ui);
    }

    #[tokio::test]
    async fn driver_accessor_returns_attached_mock() {
        use crate::driver::MockUiDriver;
        let mut ctx = ctx();
        ctx.set_driver(Box::new(MockUiDriver::new()));
        assert!(ctx.has_driver());
        let driver = ctx.driver().unwrap();
        driver.navigate("http://localhost:4200/#/").await.unwrap();
        assert_eq!(
            driver.current_url().await.unwrap(),
            "http://localhost:4200/#/"
        );
        assert!(ctx.take_driver().is_some());
        assert!(!ctx.has_driver());
    }
}
