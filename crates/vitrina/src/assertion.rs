//! Declarative assertions over captured results.
//!
//! Assertions are side-effect-free on the system under test: they inspect
//! captured responses and element snapshots and produce an
//! [`AssertionResult`] naming expected and actual, readable enough to
//! diagnose a failure without re-running.

use crate::driver::ElementHandle;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    /// Whether the check passed
    pub passed: bool,
    /// What was expected
    pub expected: String,
    /// What was observed
    pub actual: String,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing result
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            expected: String::new(),
            actual: String::new(),
            message: message.into(),
        }
    }

    /// Create a failing result naming expected and actual
    #[must_use]
    pub fn fail(
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            passed: false,
            expected: expected.into(),
            actual: actual.into(),
            message: message.into(),
        }
    }
}

/// A set of allowed HTTP status codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSet(Vec<u16>);

impl StatusSet {
    /// Whether `status` is allowed
    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.0.contains(&status)
    }
}

impl From<u16> for StatusSet {
    fn from(status: u16) -> Self {
        Self(vec![status])
    }
}

impl<const N: usize> From<[u16; N]> for StatusSet {
    fn from(statuses: [u16; N]) -> Self {
        Self(statuses.to_vec())
    }
}

impl From<&[u16]> for StatusSet {
    fn from(statuses: &[u16]) -> Self {
        Self(statuses.to_vec())
    }
}

impl std::fmt::Display for StatusSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{{{}}}", codes.join(", "))
    }
}

/// Assert an HTTP status is one of the allowed set.
///
/// A failure names both the actual status and the allowed set.
#[must_use]
pub fn assert_status(actual: u16, expected: impl Into<StatusSet>) -> AssertionResult {
    let expected = expected.into();
    if expected.contains(actual) {
        AssertionResult::pass(format!("status {actual} in {expected}"))
    } else {
        AssertionResult::fail(
            expected.to_string(),
            actual.to_string(),
            format!("expected status in {expected}, got {actual}"),
        )
    }
}

/// Assert a JSON body carries every required top-level field.
///
/// A failure names the first missing field.
#[must_use]
pub fn assert_shape(actual: &serde_json::Value, required: &[&str]) -> AssertionResult {
    for field in required {
        if actual.get(field).is_none() {
            return AssertionResult::fail(
                format!("field '{field}' present"),
                "missing".to_string(),
                format!("missing field '{field}' in response body"),
            );
        }
    }
    AssertionResult::pass(format!("body has fields {required:?}"))
}

/// Assert a value satisfies a named condition
#[must_use]
pub fn assert_that(condition: bool, description: impl Into<String>) -> AssertionResult {
    let description = description.into();
    if condition {
        AssertionResult::pass(description)
    } else {
        AssertionResult::fail("true", "false", description)
    }
}

/// Assert two values are equal
#[must_use]
pub fn assert_eq_values<T: PartialEq + Debug>(
    expected: &T,
    actual: &T,
    description: impl Into<String>,
) -> AssertionResult {
    let description = description.into();
    if expected == actual {
        AssertionResult::pass(description)
    } else {
        AssertionResult::fail(
            format!("{expected:?}"),
            format!("{actual:?}"),
            format!("{description}: expected {expected:?}, got {actual:?}"),
        )
    }
}

/// Expected state of a located element.
///
/// Each requested sub-check yields its own [`AssertionResult`], so a
/// multi-condition check pinpoints the failing clause.
#[derive(Debug, Clone, Default)]
pub struct ElementExpectation {
    visible: Option<bool>,
    text_contains: Option<String>,
    attr: Option<(String, String)>,
}

impl ElementExpectation {
    /// Start an empty expectation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect the element visible (or hidden)
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Expect the element text to contain `needle`
    #[must_use]
    pub fn text_contains(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self
    }

    /// Expect an attribute to carry an exact value
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr = Some((name.into(), value.into()));
        self
    }
}

/// Check an element snapshot against an expectation, one result per
/// requested sub-check.
#[must_use]
pub fn assert_element(
    handle: &ElementHandle,
    expectation: &ElementExpectation,
) -> Vec<AssertionResult> {
    let mut results = Vec::new();
    let selector = &handle.selector;

    if let Some(visible) = expectation.visible {
        if handle.is_visible() == visible {
            results.push(AssertionResult::pass(format!(
                "{selector}: visible == {visible}"
            )));
        } else {
            results.push(AssertionResult::fail(
                format!("visible == {visible}"),
                format!("visible == {}", handle.is_visible()),
                format!("{selector}: expected visible == {visible}"),
            ));
        }
    }

    if let Some(ref needle) = expectation.text_contains {
        if handle.text().contains(needle.as_str()) {
            results.push(AssertionResult::pass(format!(
                "{selector}: text contains '{needle}'"
            )));
        } else {
            results.push(AssertionResult::fail(
                format!("text contains '{needle}'"),
                format!("text '{}'", handle.text()),
                format!(
                    "{selector}: expected text to contain '{needle}', got '{}'",
                    handle.text()
                ),
            ));
        }
    }

    if let Some((ref name, ref value)) = expectation.attr {
        match handle.attr(name) {
            Some(actual) if actual == value => {
                results.push(AssertionResult::pass(format!(
                    "{selector}: [{name}] == '{value}'"
                )));
            }
            Some(actual) => {
                results.push(AssertionResult::fail(
                    format!("[{name}] == '{value}'"),
                    format!("[{name}] == '{actual}'"),
                    format!("{selector}: expected [{name}] == '{value}', got '{actual}'"),
                ));
            }
            None => {
                results.push(AssertionResult::fail(
                    format!("[{name}] == '{value}'"),
                    format!("[{name}] absent"),
                    format!("{selector}: expected attribute [{name}], which is absent"),
                ));
            }
        }
    }

    results
}

/// Per-scenario aggregation of check results.
///
/// A scenario fails if any recorded check failed.
#[derive(Debug, Clone, Default)]
pub struct CheckSet {
    results: Vec<AssertionResult>,
}

impl CheckSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one result
    pub fn record(&mut self, result: AssertionResult) {
        if !result.passed {
            tracing::warn!(message = %result.message, "check failed");
        }
        self.results.push(result);
    }

    /// Record every result of a multi-part element check
    pub fn record_all(&mut self, results: Vec<AssertionResult>) {
        for result in results {
            self.record(result);
        }
    }

    /// Whether every recorded check passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// First failing result, if any
    #[must_use]
    pub fn first_failure(&self) -> Option<&AssertionResult> {
        self.results.iter().find(|r| !r.passed)
    }

    /// All failing results
    #[must_use]
    pub fn failures(&self) -> Vec<&AssertionResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// Number of recorded checks
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Drain the recorded results
    pub fn take(&mut self) -> Vec<AssertionResult> {
        std::mem::take(&mut self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_in_set_passes() {
        assert!(assert_status(200, 200).passed);
        assert!(assert_status(409, [400, 409, 422]).passed);
    }

    #[test]
    fn status_failure_names_actual_and_allowed_set() {
        let result = assert_status(403, 401);
        assert!(!result.passed);
        assert!(result.message.contains("403"));
        assert!(result.message.contains("401"));

        let result = assert_status(200, [400, 409, 422]);
        assert!(result.message.contains("200"));
        assert!(result.message.contains("{400, 409, 422}"));
    }

    #[test]
    fn shape_failure_names_first_missing_field() {
        let body = serde_json::json!({"id": 1, "name": "x"});
        let result = assert_shape(&body, &["id", "name", "price", "availableStock"]);
        assert!(!result.passed);
        assert!(result.message.contains("'price'"));
        assert!(!result.message.contains("availableStock"));
    }

    #[test]
    fn shape_passes_when_all_fields_present() {
        let body = serde_json::json!({"token": "abc"});
        assert!(assert_shape(&body, &["token"]).passed);
        assert!(assert_shape(&body, &[]).passed);
    }

    #[test]
    fn element_sub_checks_are_independently_named() {
        let handle = ElementHandle::new("[data-cy=login-submit]", "button")
            .with_text("Se connecter")
            .with_attr("type", "submit");
        let expectation = ElementExpectation::new()
            .visible(true)
            .text_contains("S'inscrire")
            .attr("type", "submit");

        let results = assert_element(&handle, &expectation);
        assert_eq!(results.len(), 3);
        assert!(results[0].passed, "visibility clause should pass");
        assert!(!results[1].passed, "text clause should fail");
        assert!(results[1].message.contains("S'inscrire"));
        assert!(results[2].passed, "attr clause should pass");
    }

    #[test]
    fn element_missing_attr_is_named_absent() {
        let handle = ElementHandle::new("[data-cy=x]", "input");
        let results = assert_element(&handle, &ElementExpectation::new().attr("type", "number"));
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert!(results[0].actual.contains("absent"));
    }

    #[test]
    fn empty_expectation_yields_no_results() {
        let handle = ElementHandle::new("[data-cy=x]", "div");
        assert!(assert_element(&handle, &ElementExpectation::new()).is_empty());
    }

    #[test]
    fn check_set_fails_if_any_check_failed() {
        let mut checks = CheckSet::new();
        checks.record(assert_status(200, 200));
        assert!(checks.all_passed());
        checks.record(assert_status(403, 401));
        assert!(!checks.all_passed());
        assert_eq!(checks.len(), 2);
        assert!(checks.first_failure().unwrap().message.contains("403"));
        assert_eq!(checks.failures().len(), 1);
    }

    #[test]
    fn check_set_take_drains() {
        let mut checks = CheckSet::new();
        checks.record(assert_that(true, "fine"));
        let drained = checks.take();
        assert_eq!(drained.len(), 1);
        assert!(checks.is_empty());
    }
}
