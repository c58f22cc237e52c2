//! UI driver adapter — abstract browser automation trait.
//!
//! Scenarios drive the storefront UI through [`UiDriver`], which locates
//! elements by stable `data-cy` test identifiers with an implicit bounded
//! wait. Implementations:
//!
//! - `ChromiumDriver` — default, CDP via chromiumoxide (feature `browser`)
//! - [`MockUiDriver`] — scripted elements for unit testing, always available
//!
//! All actions are synchronous from the scenario's point of view: each call
//! suspends the scenario until the action and its visible effect settle, so
//! responses are always processed before the next statement runs.

use crate::result::{HarnessError, HarnessResult};
use crate::wait::WaitOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A stable test identifier (`data-cy` attribute value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestId(&'static str);

impl TestId {
    /// Wrap a raw identifier
    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// The raw identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// CSS selector for this identifier
    #[must_use]
    pub fn selector(&self) -> String {
        format!("[data-cy={}]", self.0)
    }

    /// CSS selector for this identifier nested under `parent`
    #[must_use]
    pub fn within(&self, parent: &Self) -> String {
        format!("{} {}", parent.selector(), self.selector())
    }
}

impl std::fmt::Display for TestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a located DOM element.
///
/// A snapshot taken at lookup time: assertions inspect the captured state
/// and never touch the live page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Selector the element was located with
    pub selector: String,
    /// Element tag name
    pub tag_name: String,
    /// Text content at lookup time
    pub text: Option<String>,
    /// Attributes at lookup time
    pub attributes: HashMap<String, String>,
    /// Whether the element was visible at lookup time
    pub visible: bool,
}

impl ElementHandle {
    /// Create a handle for a visible element
    #[must_use]
    pub fn new(selector: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag_name: tag_name.into(),
            text: None,
            attributes: HashMap::new(),
            visible: true,
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark the element hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Text content, empty when none was captured
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Attribute value, if present
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the element was visible at lookup time
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Configuration for UI drivers
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Bound and interval for the implicit element wait
    pub find_wait: WaitOptions,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            find_wait: WaitOptions::default(),
            navigation_timeout: Duration::from_secs(30),
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl DriverConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the implicit element wait
    #[must_use]
    pub const fn find_wait(mut self, wait: WaitOptions) -> Self {
        self.find_wait = wait;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Abstract driver trait for UI automation.
///
/// `find` implements the implicit wait: poll until the element is present
/// and visible, or fail with `ElementNotFound` after the configured bound.
#[async_trait]
pub trait UiDriver: Send {
    /// Navigate to a URL and wait for the page to settle
    async fn navigate(&mut self, url: &str) -> HarnessResult<()>;

    /// Locate an element, waiting until it is present and visible
    async fn find(&mut self, id: TestId) -> HarnessResult<ElementHandle>;

    /// Locate all current matches, waiting until at least one appears.
    ///
    /// An exhausted wait yields an empty vec rather than an error so
    /// callers can branch on absence.
    async fn find_all(&mut self, id: TestId) -> HarnessResult<Vec<ElementHandle>>;

    /// Locate all matches of `child` nested under `parent` items
    async fn find_all_within(
        &mut self,
        parent: TestId,
        child: TestId,
    ) -> HarnessResult<Vec<ElementHandle>>;

    /// Click an element and wait for its effect to settle
    async fn click(&mut self, element: &ElementHandle) -> HarnessResult<()>;

    /// Type text into an element
    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> HarnessResult<()>;

    /// Clear an input element
    async fn clear(&mut self, element: &ElementHandle) -> HarnessResult<()>;

    /// The page's current URL
    async fn current_url(&mut self) -> HarnessResult<String>;

    /// Read a `localStorage` key
    async fn read_local_storage(&mut self, key: &str) -> HarnessResult<Option<String>>;

    /// Remove a `localStorage` key
    async fn remove_local_storage(&mut self, key: &str) -> HarnessResult<()>;

    /// Tear the driver down
    async fn close(&mut self) -> HarnessResult<()>;
}

/// Factory producing a fresh driver per UI group
pub type DriverFactory = Box<
    dyn Fn() -> futures::future::BoxFuture<'static, HarnessResult<Box<dyn UiDriver>>>
        + Send
        + Sync,
>;

/// Mock driver for unit testing.
///
/// Elements are scripted per selector; every action is recorded in a call
/// history for verification. Clicks can be wired to change the current URL
/// to emulate SPA navigation.
#[derive(Debug, Default)]
pub struct MockUiDriver {
    /// Current URL
    pub current_url: String,
    /// Scripted elements keyed by selector
    elements: HashMap<String, Vec<ElementHandle>>,
    /// Scripted `localStorage`
    local_storage: HashMap<String, String>,
    /// URL changes wired to clicks, keyed by selector
    redirects: HashMap<String, String>,
    /// Text typed per selector
    typed: HashMap<String, String>,
    /// Call history for verification
    pub call_history: Vec<String>,
}

impl MockUiDriver {
    /// Create a new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an element behind its test id
    pub fn add_element(&mut self, id: TestId, element: ElementHandle) {
        self.elements.entry(id.selector()).or_default().push(element);
    }

    /// Script an element behind an arbitrary selector
    pub fn add_element_at(&mut self, selector: impl Into<String>, element: ElementHandle) {
        self.elements.entry(selector.into()).or_default().push(element);
    }

    /// Script a `localStorage` entry
    pub fn set_local_storage(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.local_storage.insert(key.into(), value.into());
    }

    /// Wire a click on `id` to change the current URL
    pub fn redirect_on_click(&mut self, id: TestId, url: impl Into<String>) {
        self.redirects.insert(id.selector(), url.into());
    }

    /// Text typed into the element behind `id`, if any
    #[must_use]
    pub fn typed_into(&self, id: TestId) -> Option<&str> {
        self.typed.get(&id.selector()).map(String::as_str)
    }

    /// Check if a method was called (prefix match on the history)
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(prefix))
    }

    fn lookup(&self, selector: &str) -> Vec<ElementHandle> {
        self.elements.get(selector).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl UiDriver for MockUiDriver {
    async fn navigate(&mut self, url: &str) -> HarnessResult<()> {
        self.call_history.push(format!("navigate:{url}"));
        self.current_url = url.to_string();
        Ok(())
    }

    async fn find(&mut self, id: TestId) -> HarnessResult<ElementHandle> {
        let selector = id.selector();
        self.call_history.push(format!("find:{selector}"));
        self.lookup(&selector)
            .into_iter()
            .find(ElementHandle::is_visible)
            .ok_or(HarnessError::ElementNotFound {
                selector,
                timeout_ms: 0,
            })
    }

    async fn find_all(&mut self, id: TestId) -> HarnessResult<Vec<ElementHandle>> {
        let selector = id.selector();
        self.call_history.push(format!("find_all:{selector}"));
        Ok(self.lookup(&selector))
    }

    async fn find_all_within(
        &mut self,
        parent: TestId,
        child: TestId,
    ) -> HarnessResult<Vec<ElementHandle>> {
        let selector = child.within(&parent);
        self.call_history.push(format!("find_all:{selector}"));
        Ok(self.lookup(&selector))
    }

    async fn click(&mut self, element: &ElementHandle) -> HarnessResult<()> {
        self.call_history.push(format!("click:{}", element.selector));
        if let Some(url) = self.redirects.get(&element.selector) {
            self.current_url = url.clone();
        }
        Ok(())
    }

    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> HarnessResult<()> {
        self.call_history
            .push(format!("type:{}:{text}", element.selector));
        self.typed.insert(element.selector.clone(), text.to_string());
        Ok(())
    }

    async fn clear(&mut self, element: &ElementHandle) -> HarnessResult<()> {
        self.call_history.push(format!("clear:{}", element.selector));
        self.typed.remove(&element.selector);
        Ok(())
    }

    async fn current_url(&mut self) -> HarnessResult<String> {
        Ok(self.current_url.clone())
    }

    async fn read_local_storage(&mut self, key: &str) -> HarnessResult<Option<String>> {
        Ok(self.local_storage.get(key).cloned())
    }

    async fn remove_local_storage(&mut self, key: &str) -> HarnessResult<()> {
        self.call_history.push(format!("remove_local_storage:{key}"));
        self.local_storage.remove(key);
        Ok(())
    }

    async fn close(&mut self) -> HarnessResult<()> {
        self.call_history.push("close".to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMIT: TestId = TestId::new("login-submit");
    const USERNAME: TestId = TestId::new("login-input-username");

    #[test]
    fn test_id_selector() {
        assert_eq!(SUBMIT.selector(), "[data-cy=login-submit]");
        assert_eq!(
            USERNAME.within(&SUBMIT),
            "[data-cy=login-submit] [data-cy=login-input-username]"
        );
    }

    #[test]
    fn element_handle_accessors() {
        let el = ElementHandle::new("[data-cy=x]", "input")
            .with_text("Se connecter")
            .with_attr("type", "password");
        assert_eq!(el.text(), "Se connecter");
        assert_eq!(el.attr("type"), Some("password"));
        assert!(el.attr("href").is_none());
        assert!(el.is_visible());
        assert!(!el.clone().hidden().is_visible());
    }

    #[tokio::test]
    async fn mock_find_returns_scripted_visible_element() {
        let mut driver = MockUiDriver::new();
        driver.add_element(SUBMIT, ElementHandle::new(SUBMIT.selector(), "button"));
        let el = driver.find(SUBMIT).await.unwrap();
        assert_eq!(el.tag_name, "button");
        assert!(driver.was_called("find:[data-cy=login-submit]"));
    }

    #[tokio::test]
    async fn mock_find_skips_hidden_elements() {
        let mut driver = MockUiDriver::new();
        driver.add_element(SUBMIT, ElementHandle::new(SUBMIT.selector(), "button").hidden());
        let err = driver.find(SUBMIT).await.unwrap_err();
        assert!(matches!(err, HarnessError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn mock_click_follows_wired_redirect() {
        let mut driver = MockUiDriver::new();
        driver.add_element(SUBMIT, ElementHandle::new(SUBMIT.selector(), "button"));
        driver.redirect_on_click(SUBMIT, "http://localhost:4200/#/");
        driver.navigate("http://localhost:4200/#/login").await.unwrap();
        let el = driver.find(SUBMIT).await.unwrap();
        driver.click(&el).await.unwrap();
        assert_eq!(
            driver.current_url().await.unwrap(),
            "http://localhost:4200/#/"
        );
    }

    #[tokio::test]
    async fn mock_records_typed_text_and_clear() {
        let mut driver = MockUiDriver::new();
        driver.add_element(USERNAME, ElementHandle::new(USERNAME.selector(), "input"));
        let el = driver.find(USERNAME).await.unwrap();
        driver.type_text(&el, "test2@test.fr").await.unwrap();
        assert_eq!(driver.typed_into(USERNAME), Some("test2@test.fr"));
        driver.clear(&el).await.unwrap();
        assert!(driver.typed_into(USERNAME).is_none());
    }

    #[tokio::test]
    async fn mock_local_storage_roundtrip() {
        let mut driver = MockUiDriver::new();
        driver.set_local_storage("user", "tok");
        assert_eq!(
            driver.read_local_storage("user").await.unwrap().as_deref(),
            Some("tok")
        );
        driver.remove_local_storage("user").await.unwrap();
        assert_eq!(driver.read_local_storage("user").await.unwrap(), None);
    }
}
