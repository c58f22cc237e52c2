//! Run reports — per-scenario records aggregated per group and per run.
//!
//! `Skipped` is surfaced separately from `Failed` and never counts against
//! the pass/fail ratio used for CI gating: the exit code is 0 iff zero
//! scenarios Failed.

use crate::assertion::AssertionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scenario lifecycle state.
///
/// `Pending → Running → {Passed, Failed, Skipped}`; terminal states are
/// final and no retries are performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Not yet attempted
    Pending,
    /// Body currently executing
    Running,
    /// Every check passed
    Passed,
    /// A check failed, the body errored, or a hook failure prevented the
    /// attempt
    Failed,
    /// A required precondition was absent
    Skipped,
}

impl ScenarioStatus {
    /// Whether this state is terminal
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed | Self::Skipped)
    }

    /// Whether the scenario passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Whether the scenario failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Whether the scenario was skipped
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Record of one scenario's terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Scenario name
    pub name: String,
    /// Terminal status
    pub status: ScenarioStatus,
    /// Error message for a failure
    pub error: Option<String>,
    /// Why the scenario was skipped
    pub skip_reason: Option<String>,
    /// Whether the body actually ran.
    ///
    /// `false` distinguishes "failed because a hook aborted the group" from
    /// a failure observed during an attempt.
    pub attempted: bool,
    /// Wall-clock duration of the attempt
    pub duration: Duration,
    /// Check results recorded during the attempt
    pub checks: Vec<AssertionResult>,
}

impl ScenarioRecord {
    /// A scenario whose every check passed
    #[must_use]
    pub fn passed(
        name: impl Into<String>,
        duration: Duration,
        checks: Vec<AssertionResult>,
    ) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Passed,
            error: None,
            skip_reason: None,
            attempted: true,
            duration,
            checks,
        }
    }

    /// A scenario that was attempted and failed
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
        checks: Vec<AssertionResult>,
    ) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Failed,
            error: Some(error.into()),
            skip_reason: None,
            attempted: true,
            duration,
            checks,
        }
    }

    /// A scenario never attempted because a hook in its group failed
    #[must_use]
    pub fn failed_not_run(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Failed,
            error: Some(error.into()),
            skip_reason: None,
            attempted: false,
            duration: Duration::ZERO,
            checks: Vec::new(),
        }
    }

    /// A scenario skipped over an absent precondition
    #[must_use]
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Skipped,
            error: None,
            skip_reason: Some(reason.into()),
            attempted: false,
            duration: Duration::ZERO,
            checks: Vec::new(),
        }
    }
}

/// Record of one group's run, including nested child groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group name
    pub name: String,
    /// Scenario records, in execution order
    pub scenarios: Vec<ScenarioRecord>,
    /// Records of nested child groups, in execution order
    pub children: Vec<GroupRecord>,
    /// Error from the group's `after` hook, if it failed.
    ///
    /// Surfaced on the group because no scenarios are pending when `after`
    /// runs; scenario outcomes are unaffected.
    pub teardown_error: Option<String>,
    /// Wall-clock duration of the group
    pub duration: Duration,
}

impl GroupRecord {
    /// Create an empty group record
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenarios: Vec::new(),
            children: Vec::new(),
            teardown_error: None,
            duration: Duration::ZERO,
        }
    }

    /// Count scenarios in a given status, descendants included
    #[must_use]
    pub fn count(&self, status: ScenarioStatus) -> usize {
        self.scenarios.iter().filter(|s| s.status == status).count()
            + self
                .children
                .iter()
                .map(|c| c.count(status))
                .sum::<usize>()
    }

    /// Total scenario count, descendants included
    #[must_use]
    pub fn total(&self) -> usize {
        self.scenarios.len()
            + self
                .children
                .iter()
                .map(GroupRecord::total)
                .sum::<usize>()
    }

    fn collect_failures<'a>(&'a self, out: &mut Vec<(&'a str, &'a ScenarioRecord)>) {
        for scenario in &self.scenarios {
            if scenario.status.is_failed() {
                out.push((self.name.as_str(), scenario));
            }
        }
        for child in &self.children {
            child.collect_failures(out);
        }
    }

    fn render_into(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        out.push_str(&format!("{pad}{}\n", self.name));
        for scenario in &self.scenarios {
            let mark = match scenario.status {
                ScenarioStatus::Passed => "✓",
                ScenarioStatus::Failed => "✗",
                ScenarioStatus::Skipped => "-",
                ScenarioStatus::Pending | ScenarioStatus::Running => "?",
            };
            out.push_str(&format!("{pad}  {mark} {}\n", scenario.name));
            if let Some(ref error) = scenario.error {
                let note = if scenario.attempted { "" } else { " (not run)" };
                out.push_str(&format!("{pad}      {error}{note}\n"));
            }
            if let Some(ref reason) = scenario.skip_reason {
                out.push_str(&format!("{pad}      skipped: {reason}\n"));
            }
        }
        for child in &self.children {
            child.render_into(out, indent + 1);
        }
        if let Some(ref error) = self.teardown_error {
            out.push_str(&format!("{pad}  ! teardown failed: {error}\n"));
        }
    }
}

/// Results of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Total wall-clock duration
    pub duration: Duration,
    /// Group records, in execution order
    pub groups: Vec<GroupRecord>,
}

impl RunReport {
    /// Create an empty report stamped now
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::ZERO,
            groups: Vec::new(),
        }
    }

    /// Total scenario count, nested groups included
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.iter().map(GroupRecord::total).sum()
    }

    /// Scenarios that passed
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Scenarios that failed (attempted or not)
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Scenarios skipped over absent preconditions
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.groups.iter().map(|g| g.count(status)).sum()
    }

    /// Whether the run gates green: zero failed scenarios.
    ///
    /// Skips do not count against the gate.
    #[must_use]
    pub fn all_green(&self) -> bool {
        self.failed_count() == 0
    }

    /// Process exit code for the run
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_green())
    }

    /// Every failed scenario, with the name of the group that owns it
    #[must_use]
    pub fn failures(&self) -> Vec<(&str, &ScenarioRecord)> {
        let mut out = Vec::new();
        for group in &self.groups {
            group.collect_failures(&mut out);
        }
        out
    }

    /// Plain-text summary of the run
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            group.render_into(&mut out, 0);
        }
        out.push_str(&format!(
            "\n{} passed, {} failed, {} skipped ({} total) in {:.2}s\n",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total(),
            self.duration.as_secs_f64(),
        ));
        out
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(records: Vec<ScenarioRecord>) -> RunReport {
        let mut group = GroupRecord::new("api: orders");
        group.scenarios = records;
        let mut report = RunReport::new();
        report.groups.push(group);
        report
    }

    #[test]
    fn terminal_states() {
        assert!(ScenarioStatus::Passed.is_terminal());
        assert!(ScenarioStatus::Failed.is_terminal());
        assert!(ScenarioStatus::Skipped.is_terminal());
        assert!(!ScenarioStatus::Pending.is_terminal());
        assert!(!ScenarioStatus::Running.is_terminal());
    }

    #[test]
    fn skips_do_not_break_the_gate() {
        let report = report_with(vec![
            ScenarioRecord::passed("a", Duration::ZERO, Vec::new()),
            ScenarioRecord::skipped("b", "no out-of-stock product"),
        ]);
        assert!(report.all_green());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
    }

    #[test]
    fn failures_flip_the_exit_code() {
        let report = report_with(vec![ScenarioRecord::failed(
            "a",
            Duration::ZERO,
            "expected status in {401}, got 403",
            Vec::new(),
        )]);
        assert!(!report.all_green());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].0, "api: orders");
    }

    #[test]
    fn failed_not_run_is_distinguishable() {
        let record = ScenarioRecord::failed_not_run("a", "Hook 'before' failed: login 500");
        assert!(record.status.is_failed());
        assert!(!record.attempted);
        let attempted = ScenarioRecord::failed("b", Duration::ZERO, "boom", Vec::new());
        assert!(attempted.attempted);
    }

    #[test]
    fn render_text_marks_not_run_failures() {
        let report = report_with(vec![
            ScenarioRecord::failed_not_run("a", "Hook 'before' failed"),
            ScenarioRecord::skipped("b", "absent fixture"),
        ]);
        let text = report.render_text();
        assert!(text.contains("(not run)"));
        assert!(text.contains("skipped: absent fixture"));
        assert!(text.contains("0 passed, 1 failed, 1 skipped (2 total)"));
    }

    #[test]
    fn nested_groups_roll_up_into_the_counts() {
        let mut child = GroupRecord::new("inner");
        child.scenarios.push(ScenarioRecord::failed(
            "broken",
            Duration::ZERO,
            "boom",
            Vec::new(),
        ));
        let mut parent = GroupRecord::new("outer");
        parent
            .scenarios
            .push(ScenarioRecord::passed("fine", Duration::ZERO, Vec::new()));
        parent.children.push(child);
        let mut report = RunReport::new();
        report.groups.push(parent);

        assert_eq!(report.total(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failures()[0].0, "inner");
        let text = report.render_text();
        assert!(text.contains("outer"));
        assert!(text.contains("  inner"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = report_with(vec![ScenarioRecord::passed(
            "a",
            Duration::from_millis(12),
            Vec::new(),
        )]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["groups"][0]["scenarios"][0]["status"], "Passed");
        assert_eq!(json["groups"][0]["scenarios"][0]["attempted"], true);
    }
}
