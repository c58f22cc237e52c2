//! Vitrina: acceptance-test harness for a storefront demo application.
//!
//! Vitrina drives an already-running system under test two ways — direct
//! HTTP calls against its REST API and browser interactions located by
//! stable `data-cy` test identifiers — and replaces the ad hoc patterns of
//! hand-written e2e suites (shared mutable token variables, runner-specific
//! skips, hand-rolled polling) with explicit building blocks:
//!
//! - [`ApiClient`] — HTTP client adapter capturing status/headers/body
//! - [`UiDriver`] — abstract browser driver with an implicit bounded wait
//! - [`FixtureManager`] — sessions and catalog-derived preconditions
//! - [`Runner`] — sequential scenario execution with hook semantics
//! - assertions — declarative status / shape / element checks
//!
//! # Example
//!
//! ```no_run
//! use vitrina::{assert_status, Group, HarnessConfig, Runner, Scenario};
//!
//! # async fn demo() -> vitrina::HarnessResult<()> {
//! let group = Group::new("api: catalog").scenario(Scenario::new(
//!     "product list responds",
//!     |ctx| {
//!         Box::pin(async move {
//!             let resp = ctx.api.get("/products").send().await?;
//!             ctx.check(assert_status(resp.status, 200));
//!             Ok(())
//!         })
//!     },
//! ));
//!
//! let report = Runner::new(HarnessConfig::from_env()).run(&[group]).await?;
//! if !report.all_green() {
//!     std::process::exit(report.exit_code());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod config;
mod driver;
mod fixture;
mod http;
mod report;
mod result;
mod runner;
mod scenario;
mod session;

/// Bounded wait/poll primitives
pub mod wait;

/// Chromium-backed UI driver (feature `browser`)
#[cfg(feature = "browser")]
pub mod chromium;

pub use assertion::{
    assert_element, assert_eq_values, assert_shape, assert_status, assert_that, AssertionResult,
    CheckSet, ElementExpectation, StatusSet,
};
pub use config::{HarnessConfig, DEFAULT_API_URL, DEFAULT_UI_URL, ENV_PREFIX};
pub use driver::{
    DriverConfig, DriverFactory, ElementHandle, MockUiDriver, TestId, UiDriver,
};
pub use fixture::{
    parse_login_response, select_by_stock, FixtureManager, Product, ProductFixture, StockPredicate,
    StockState,
};
pub use http::{ApiClient, ApiRequest, ApiResponse, Method};
pub use report::{GroupRecord, RunReport, ScenarioRecord, ScenarioStatus};
pub use result::{HarnessError, HarnessResult};
pub use runner::{ProgressFn, Runner};
pub use scenario::{Group, Scenario, ScenarioBody, ScenarioCtx};
pub use session::{Credentials, Session, SessionScope};

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
