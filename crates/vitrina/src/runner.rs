//! Scenario runner.
//!
//! Scenarios within a group execute strictly sequentially — later scenarios
//! may assume state left by earlier ones — and each is isolated: one
//! scenario's failure never blocks its siblings. Hook order per group is
//! `before` → [`before_each` → scenario → `after_each`] × N → `after`.
//!
//! A hook failure aborts every scenario still pending in the group, marking
//! each Failed with the hook's error and `attempted = false` — they were
//! never attempted, which stays distinguishable from a failed attempt. An
//! absent precondition (in a hook or a body) skips instead of failing. A
//! transport error aborts the whole run.

use crate::config::HarnessConfig;
use crate::driver::DriverFactory;
use crate::report::{GroupRecord, RunReport, ScenarioRecord};
use crate::result::{HarnessError, HarnessResult};
use crate::scenario::{Group, ScenarioBody, ScenarioCtx};
use crate::session::SessionScope;
use futures::future::BoxFuture;
use std::time::Instant;

/// Callback invoked as each scenario reaches a terminal state
pub type ProgressFn = Box<dyn Fn(&str, &ScenarioRecord) + Send + Sync>;

/// How a failed hook disposes of the scenarios still pending in its group
#[derive(Clone)]
enum Abort {
    /// Hook failed: pending scenarios are Failed-not-run
    Fail(String),
    /// Hook hit an absent precondition: pending scenarios are Skipped
    Skip(String),
}

impl Abort {
    fn from_error(hook: &str, err: &HarnessError) -> Self {
        match err {
            HarnessError::PreconditionAbsent { reason } => Self::Skip(reason.clone()),
            other => Self::Fail(
                HarnessError::HookFailure {
                    hook: hook.to_string(),
                    message: other.to_string(),
                }
                .to_string(),
            ),
        }
    }

    fn record_for(&self, name: &str) -> ScenarioRecord {
        match self {
            Self::Fail(message) => ScenarioRecord::failed_not_run(name, message),
            Self::Skip(reason) => ScenarioRecord::skipped(name, reason),
        }
    }
}

/// Executes groups of scenarios and aggregates a run report
pub struct Runner {
    config: HarnessConfig,
    driver_factory: Option<DriverFactory>,
    on_scenario: Option<ProgressFn>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("api", &self.config.api_base_url)
            .field("has_driver_factory", &self.driver_factory.is_some())
            .finish()
    }
}

impl Runner {
    /// Create a runner
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            driver_factory: None,
            on_scenario: None,
        }
    }

    /// Provide a factory producing a fresh UI driver per UI group.
    ///
    /// Without one, UI groups skip all their scenarios.
    #[must_use]
    pub fn with_driver_factory(mut self, factory: DriverFactory) -> Self {
        self.driver_factory = Some(factory);
        self
    }

    /// Observe scenarios as they reach terminal states
    #[must_use]
    pub fn on_scenario<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &ScenarioRecord) + Send + Sync + 'static,
    {
        self.on_scenario = Some(Box::new(callback));
        self
    }

    fn emit(&self, group: &str, record: &ScenarioRecord) {
        if let Some(ref callback) = self.on_scenario {
            callback(group, record);
        }
    }

    /// Run every group sequentially.
    ///
    /// # Errors
    ///
    /// `Transport` when the system under test is unreachable — fatal,
    /// reported once for the whole run.
    pub async fn run(&self, groups: &[Group]) -> HarnessResult<RunReport> {
        let start = Instant::now();
        let mut report = RunReport::new();
        for group in groups {
            tracing::info!(group = %group.name, scenarios = group.scenario_count(), "group start");
            let record = self.run_group(group).await?;
            report.groups.push(record);
        }
        report.duration = start.elapsed();
        Ok(report)
    }

    async fn run_group(&self, group: &Group) -> HarnessResult<GroupRecord> {
        let mut ctx = ScenarioCtx::new(self.config.clone());

        let mut abort: Option<Abort> = None;
        if group.requires_ui_anywhere() {
            abort = self.attach_driver(&mut ctx).await?;
        }

        let record = self
            .run_tree(group, &mut ctx, Vec::new(), Vec::new(), abort)
            .await?;

        if let Some(mut driver) = ctx.take_driver() {
            if let Err(err) = driver.close().await {
                tracing::warn!(group = %group.name, error = %err, "driver close failed");
            }
        }
        // The group session dies with the group
        ctx.session = None;

        Ok(record)
    }

    /// Run one group and its nested children against a shared context.
    ///
    /// `each_before`/`each_after` carry the per-scenario hooks inherited
    /// from enclosing groups: setup runs outer-first, teardown inner-first.
    /// An inherited `abort` disposes of every scenario without attempting
    /// it; an abort raised here propagates to this group's children but not
    /// back to the parent.
    fn run_tree<'s>(
        &'s self,
        group: &'s Group,
        ctx: &'s mut ScenarioCtx,
        each_before: Vec<&'s ScenarioBody>,
        each_after: Vec<&'s ScenarioBody>,
        mut abort: Option<Abort>,
    ) -> BoxFuture<'s, HarnessResult<GroupRecord>> {
        Box::pin(async move {
            let start = Instant::now();
            let mut record = GroupRecord::new(&group.name);
            let entered_cleanly = abort.is_none();

            if abort.is_none() {
                if let Some(ref hook) = group.before {
                    if let Err(err) = hook(ctx).await {
                        if err.is_fatal() {
                            return Err(err);
                        }
                        tracing::warn!(group = %group.name, error = %err, "before hook failed");
                        abort = Some(Abort::from_error("before", &err));
                    }
                }
            }

            let mut each_before = each_before;
            if let Some(ref hook) = group.before_each {
                each_before.push(hook);
            }
            let mut each_after = each_after;
            if let Some(ref hook) = group.after_each {
                each_after.insert(0, hook);
            }

            'scenarios: for scenario in &group.scenarios {
                if let Some(ref reason) = abort {
                    let rec = reason.record_for(&scenario.name);
                    self.emit(&group.name, &rec);
                    record.scenarios.push(rec);
                    continue;
                }

                // Per-scenario setup, outer group first
                for hook in &each_before {
                    if let Err(err) = hook(ctx).await {
                        if err.is_fatal() {
                            return Err(err);
                        }
                        tracing::warn!(group = %group.name, error = %err, "before_each hook failed");
                        let reason = Abort::from_error("before_each", &err);
                        let rec = reason.record_for(&scenario.name);
                        self.emit(&group.name, &rec);
                        record.scenarios.push(rec);
                        abort = Some(reason);
                        continue 'scenarios;
                    }
                }

                ctx.begin_scenario();
                tracing::info!(scenario = %scenario.name, "running");
                let scenario_start = Instant::now();
                let outcome = scenario.run(ctx).await;
                let duration = scenario_start.elapsed();
                let checks = ctx.take_checks();

                let rec = match outcome {
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(HarnessError::PreconditionAbsent { reason }) => {
                        ScenarioRecord::skipped(&scenario.name, reason)
                    }
                    Err(err) => {
                        ScenarioRecord::failed(&scenario.name, duration, err.to_string(), checks)
                    }
                    Ok(()) => {
                        let first_failure = checks
                            .iter()
                            .find(|c| !c.passed)
                            .map(|c| c.message.clone());
                        match first_failure {
                            Some(message) => {
                                ScenarioRecord::failed(&scenario.name, duration, message, checks)
                            }
                            None => ScenarioRecord::passed(&scenario.name, duration, checks),
                        }
                    }
                };
                tracing::info!(scenario = %scenario.name, status = ?rec.status, "terminal");
                self.emit(&group.name, &rec);
                record.scenarios.push(rec);

                // Per-scenario teardown, inner group first
                for hook in &each_after {
                    if let Err(err) = hook(ctx).await {
                        if err.is_fatal() {
                            return Err(err);
                        }
                        tracing::warn!(group = %group.name, error = %err, "after_each hook failed");
                        abort = Some(Abort::from_error("after_each", &err));
                        break;
                    }
                }

                // A scenario-scoped session is exclusive to the scenario
                // that acquired it; its token is never reused.
                if group.session_scope == SessionScope::Scenario {
                    ctx.session = None;
                }
            }

            for child in &group.children {
                let child_record = self
                    .run_tree(
                        child,
                        ctx,
                        each_before.clone(),
                        each_after.clone(),
                        abort.clone(),
                    )
                    .await?;
                record.children.push(child_record);
            }

            // Teardown runs only for a group that actually started
            if entered_cleanly {
                if let Some(ref hook) = group.after {
                    if let Err(err) = hook(ctx).await {
                        if err.is_fatal() {
                            return Err(err);
                        }
                        tracing::warn!(group = %group.name, error = %err, "after hook failed");
                        record.teardown_error = Some(err.to_string());
                    }
                }
            }

            record.duration = start.elapsed();
            Ok(record)
        })
    }

    /// Attach a UI driver to the context, or decide how the group's
    /// scenarios are disposed of without one.
    async fn attach_driver(&self, ctx: &mut ScenarioCtx) -> HarnessResult<Option<Abort>> {
        match self.driver_factory {
            Some(ref factory) => match factory().await {
                Ok(driver) => {
                    ctx.set_driver(driver);
                    Ok(None)
                }
                Err(err) if err.is_fatal() => Err(err),
                Err(err) => Ok(Some(Abort::from_error("driver", &err))),
            },
            None => Ok(Some(Abort::Skip(
                "no UI driver configured for this run".to_string(),
            ))),
        }
    }
}
