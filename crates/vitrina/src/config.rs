//! Harness configuration.
//!
//! One documented fixture account per environment; every value can be
//! overridden from the environment so the same suite runs against local,
//! staging, or CI deployments of the system under test.

use crate::session::Credentials;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default REST API base URL of the system under test
pub const DEFAULT_API_URL: &str = "http://localhost:8081";

/// Default UI base URL of the system under test
pub const DEFAULT_UI_URL: &str = "http://localhost:4200";

/// Environment variable prefix used by [`HarnessConfig::from_env`]
pub const ENV_PREFIX: &str = "VITRINA";

/// Configuration for a harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URL of the REST API
    pub api_base_url: String,
    /// Base URL of the browser UI
    pub ui_base_url: String,
    /// Fixture account used by authenticated scenarios
    pub credentials: Credentials,
    /// Status expected from `GET /orders` without authentication.
    ///
    /// The deployed systems disagree on 401 vs 403, so this is a
    /// configuration value confirmed per environment rather than a
    /// hard-coded expectation.
    pub unauthenticated_status: u16,
    /// Bound on the implicit element wait, in milliseconds
    pub find_timeout_ms: u64,
    /// Bound on page navigation, in milliseconds
    pub navigation_timeout_ms: u64,
    /// Run the browser headless
    pub headless: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            ui_base_url: DEFAULT_UI_URL.to_string(),
            credentials: Credentials::default(),
            unauthenticated_status: 401,
            find_timeout_ms: 4_000,
            navigation_timeout_ms: 30_000,
            headless: true,
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from `VITRINA_*` environment variables, falling back
    /// to defaults for anything unset.
    ///
    /// Recognized: `VITRINA_API_URL`, `VITRINA_UI_URL`, `VITRINA_USERNAME`,
    /// `VITRINA_PASSWORD`, `VITRINA_UNAUTH_STATUS`, `VITRINA_FIND_TIMEOUT_MS`,
    /// `VITRINA_HEADLESS`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(format!("{ENV_PREFIX}_API_URL")) {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var(format!("{ENV_PREFIX}_UI_URL")) {
            config.ui_base_url = url;
        }
        if let Ok(username) = std::env::var(format!("{ENV_PREFIX}_USERNAME")) {
            config.credentials.username = username;
        }
        if let Ok(password) = std::env::var(format!("{ENV_PREFIX}_PASSWORD")) {
            config.credentials.password = password;
        }
        if let Ok(status) = std::env::var(format!("{ENV_PREFIX}_UNAUTH_STATUS")) {
            if let Ok(status) = status.parse() {
                config.unauthenticated_status = status;
            }
        }
        if let Ok(ms) = std::env::var(format!("{ENV_PREFIX}_FIND_TIMEOUT_MS")) {
            if let Ok(ms) = ms.parse() {
                config.find_timeout_ms = ms;
            }
        }
        if let Ok(headless) = std::env::var(format!("{ENV_PREFIX}_HEADLESS")) {
            config.headless = headless != "0" && headless != "false";
        }
        config
    }

    /// Set the API base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the UI base URL
    #[must_use]
    pub fn with_ui_url(mut self, url: impl Into<String>) -> Self {
        self.ui_base_url = url.into();
        self
    }

    /// Set the fixture account
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the expected unauthenticated-access status
    #[must_use]
    pub const fn with_unauthenticated_status(mut self, status: u16) -> Self {
        self.unauthenticated_status = status;
        self
    }

    /// Set the implicit element wait bound
    #[must_use]
    pub const fn with_find_timeout_ms(mut self, ms: u64) -> Self {
        self.find_timeout_ms = ms;
        self
    }

    /// Run the browser with a visible window
    #[must_use]
    pub const fn headed(mut self) -> Self {
        self.headless = false;
        self
    }

    /// Implicit element wait as a `Duration`
    #[must_use]
    pub const fn find_timeout(&self) -> Duration {
        Duration::from_millis(self.find_timeout_ms)
    }

    /// Navigation bound as a `Duration`
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Build a UI URL from a fragment route (the storefront routes with
    /// `/#/`), e.g. `ui_url("/login")` → `http://localhost:4200/#/login`.
    #[must_use]
    pub fn ui_url(&self, route: &str) -> String {
        let base = self.ui_base_url.trim_end_matches('/');
        let route = route.trim_start_matches('/');
        format!("{base}/#/{route}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_sut() {
        let config = HarnessConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8081");
        assert_eq!(config.ui_base_url, "http://localhost:4200");
        assert_eq!(config.unauthenticated_status, 401);
        assert!(config.headless);
    }

    #[test]
    fn ui_url_builds_fragment_routes() {
        let config = HarnessConfig::default();
        assert_eq!(config.ui_url("/login"), "http://localhost:4200/#/login");
        assert_eq!(config.ui_url("products"), "http://localhost:4200/#/products");
        assert_eq!(config.ui_url(""), "http://localhost:4200/#/");
    }

    #[test]
    fn builders_override_defaults() {
        let config = HarnessConfig::new()
            .with_api_url("http://sut:9000")
            .with_unauthenticated_status(403)
            .with_find_timeout_ms(250)
            .headed();
        assert_eq!(config.api_base_url, "http://sut:9000");
        assert_eq!(config.unauthenticated_status, 403);
        assert_eq!(config.find_timeout(), Duration::from_millis(250));
        assert!(!config.headless);
    }
}
