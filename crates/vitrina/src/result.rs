//! Result and error types for the harness.
//!
//! The taxonomy separates outcomes the runner treats differently: an
//! assertion mismatch fails one scenario, an absent precondition skips it,
//! a hook failure fails every scenario still pending in the group, and a
//! transport failure aborts the whole run.

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while driving the system under test
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An assertion mismatch surfaced as an error (expected vs actual)
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Expected-vs-actual detail
        message: String,
    },

    /// A required fixture precondition could not be satisfied.
    ///
    /// The runner converts this into `Skipped`, never `Failed`.
    #[error("Precondition absent: {reason}")]
    PreconditionAbsent {
        /// Why the scenario cannot run
        reason: String,
    },

    /// A group hook (`before`, `before_each`, `after_each`) failed
    #[error("Hook '{hook}' failed: {message}")]
    HookFailure {
        /// Which hook failed
        hook: String,
        /// Underlying error message
        message: String,
    },

    /// The system under test is unreachable.
    ///
    /// Fatal for the whole run: acceptance tests assume a reachable,
    /// already-running system.
    #[error("Transport error: {message}")]
    Transport {
        /// Underlying transport message
        message: String,
    },

    /// Response carried an unexpected HTTP status while `fail_on_status`
    /// was enabled
    #[error("Unexpected status {status} from {method} {path}")]
    HttpStatus {
        /// Actual status code
        status: u16,
        /// Request method
        method: String,
        /// Request path
        path: String,
    },

    /// An element did not become visible within the bounded wait
    #[error("Element '{selector}' not found within {timeout_ms}ms")]
    ElementNotFound {
        /// CSS selector that was polled
        selector: String,
        /// Bound on the wait
        timeout_ms: u64,
    },

    /// A bounded wait elapsed without its condition settling
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Fixture setup failed (e.g. login response without a token)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// A required field was missing from a response body
    #[error("Missing field '{field}' in response body")]
    MissingField {
        /// Field name
        field: String,
    },

    /// Harness configuration error
    #[error("Config error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid state error (operation called in wrong state)
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Classify a `reqwest` failure.
    ///
    /// Connection-level problems become `Transport` (fatal for the run);
    /// anything else is reported against the request that produced it.
    pub fn from_reqwest(err: &reqwest::Error, method: &str, path: &str) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Transport {
                message: format!("{method} {path}: {err}"),
            }
        } else {
            Self::InvalidState {
                message: format!("{method} {path}: {err}"),
            }
        }
    }

    /// Whether this error must abort the whole run
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Whether this error converts the scenario to `Skipped`
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::PreconditionAbsent { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_is_fatal() {
        let err = HarnessError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(err.is_fatal());
        assert!(!err.is_skip());
    }

    #[test]
    fn precondition_absent_is_skip() {
        let err = HarnessError::PreconditionAbsent {
            reason: "no out-of-stock product in catalog".to_string(),
        };
        assert!(err.is_skip());
        assert!(!err.is_fatal());
    }

    #[test]
    fn element_not_found_names_selector_and_bound() {
        let err = HarnessError::ElementNotFound {
            selector: "[data-cy=login-submit]".to_string(),
            timeout_ms: 4000,
        };
        let msg = err.to_string();
        assert!(msg.contains("[data-cy=login-submit]"));
        assert!(msg.contains("4000"));
    }

    #[test]
    fn hook_failure_names_hook() {
        let err = HarnessError::HookFailure {
            hook: "before".to_string(),
            message: "login returned 500".to_string(),
        };
        assert!(err.to_string().contains("before"));
        assert!(err.to_string().contains("login returned 500"));
    }
}
