//! Chromium-backed UI driver via the Chrome DevTools Protocol.
//!
//! Enabled with the `browser` feature. Element lookups and interactions run
//! as JavaScript snapshots in the page so assertions see a consistent state,
//! and the implicit wait in `find` goes through [`crate::wait::poll_until`].

use crate::driver::{DriverConfig, ElementHandle, TestId, UiDriver};
use crate::result::{HarnessError, HarnessResult};
use crate::wait::poll_until;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use futures::StreamExt;
use std::collections::HashMap;
use std::time::Duration;

/// Pause after a click or navigation so the SPA router settles before the
/// next lookup polls the DOM
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// UI driver backed by a real Chromium instance
pub struct ChromiumDriver {
    config: DriverConfig,
    browser: CdpBrowser,
    page: chromiumoxide::page::Page,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("headless", &self.config.headless)
            .finish()
    }
}

impl ChromiumDriver {
    /// Launch a browser and open a blank page.
    ///
    /// # Errors
    ///
    /// Returns `BrowserLaunch` if the browser cannot be started.
    pub async fn launch(config: DriverConfig) -> HarnessResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| HarnessError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| HarnessError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP event loop until the connection drops
        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page =
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| HarnessError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        Ok(Self {
            config,
            browser,
            page,
            handle,
        })
    }

    async fn eval(&self, script: String) -> HarnessResult<serde_json::Value> {
        let result =
            self.page
                .evaluate(script)
                .await
                .map_err(|e| HarnessError::InvalidState {
                    message: format!("evaluate failed: {e}"),
                })?;
        result.into_value().map_err(|e| HarnessError::InvalidState {
            message: format!("evaluate result: {e}"),
        })
    }

    /// JS expression capturing a snapshot of the first visible match, or
    /// `null` when nothing matches yet
    fn snapshot_script(selector: &str) -> String {
        let quoted = serde_json::to_string(selector).unwrap_or_default();
        format!(
            "(() => {{ \
               const snap = (el) => {{ \
                 const r = el.getBoundingClientRect(); \
                 const visible = r.width > 0 && r.height > 0 && \
                   getComputedStyle(el).visibility !== 'hidden'; \
                 const attrs = {{}}; \
                 for (const a of el.attributes) attrs[a.name] = a.value; \
                 return {{ tag: el.tagName.toLowerCase(), \
                           text: el.textContent, attrs, visible }}; \
               }}; \
               for (const el of document.querySelectorAll({quoted})) {{ \
                 const s = snap(el); if (s.visible) return s; \
               }} \
               return null; \
             }})()"
        )
    }

    /// JS expression capturing snapshots of every match
    fn snapshot_all_script(selector: &str) -> String {
        let quoted = serde_json::to_string(selector).unwrap_or_default();
        format!(
            "(() => {{ \
               const out = []; \
               for (const el of document.querySelectorAll({quoted})) {{ \
                 const r = el.getBoundingClientRect(); \
                 const visible = r.width > 0 && r.height > 0 && \
                   getComputedStyle(el).visibility !== 'hidden'; \
                 const attrs = {{}}; \
                 for (const a of el.attributes) attrs[a.name] = a.value; \
                 out.push({{ tag: el.tagName.toLowerCase(), \
                             text: el.textContent, attrs, visible }}); \
               }} \
               return out; \
             }})()"
        )
    }

    fn handle_from_snapshot(selector: &str, snap: &serde_json::Value) -> ElementHandle {
        let attributes: HashMap<String, String> = snap
            .get("attrs")
            .and_then(serde_json::Value::as_object)
            .map(|m| {
                m.iter()
                    .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
                    .collect()
            })
            .unwrap_or_default();
        ElementHandle {
            selector: selector.to_string(),
            tag_name: snap
                .get("tag")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string(),
            text: snap
                .get("text")
                .and_then(serde_json::Value::as_str)
                .map(|t| t.trim().to_string()),
            attributes,
            visible: snap
                .get("visible")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
        }
    }

    async fn find_by_selector(&mut self, selector: String) -> HarnessResult<ElementHandle> {
        let wait = self.config.find_wait;
        let script = Self::snapshot_script(&selector);
        let this: &Self = self;
        let result = poll_until(wait, move || {
            let script = script.clone();
            async move {
                let value = this.eval(script).await?;
                if value.is_null() {
                    Ok(None)
                } else {
                    Ok(Some(value))
                }
            }
        })
        .await;

        match result {
            Ok(snap) => Ok(Self::handle_from_snapshot(&selector, &snap)),
            Err(HarnessError::Timeout { ms }) => Err(HarnessError::ElementNotFound {
                selector,
                timeout_ms: ms,
            }),
            Err(e) => Err(e),
        }
    }

    async fn find_all_by_selector(
        &mut self,
        selector: String,
    ) -> HarnessResult<Vec<ElementHandle>> {
        let wait = self.config.find_wait;
        let script = Self::snapshot_all_script(&selector);
        let this: &Self = self;
        let result = poll_until(wait, move || {
            let script = script.clone();
            async move {
                let value = this.eval(script).await?;
                let items = value.as_array().cloned().unwrap_or_default();
                if items.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(items))
                }
            }
        })
        .await;

        match result {
            Ok(items) => Ok(items
                .iter()
                .map(|snap| Self::handle_from_snapshot(&selector, snap))
                .collect()),
            // Absence is a state the caller branches on, not an error
            Err(HarnessError::Timeout { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn act_on(&self, selector: &str, action: &str) -> HarnessResult<()> {
        let quoted = serde_json::to_string(selector).unwrap_or_default();
        let value = self
            .eval(format!(
                "(() => {{ const el = document.querySelector({quoted}); \
                   if (!el) return false; {action} return true; }})()"
            ))
            .await?;
        if value == serde_json::Value::Bool(true) {
            Ok(())
        } else {
            Err(HarnessError::ElementNotFound {
                selector: selector.to_string(),
                timeout_ms: 0,
            })
        }
    }
}

#[async_trait]
impl UiDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> HarnessResult<()> {
        tracing::debug!(url, "navigate");
        self.page
            .goto(url)
            .await
            .map_err(|e| HarnessError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        tokio::time::sleep(SETTLE_DELAY).await;
        Ok(())
    }

    async fn find(&mut self, id: TestId) -> HarnessResult<ElementHandle> {
        self.find_by_selector(id.selector()).await
    }

    async fn find_all(&mut self, id: TestId) -> HarnessResult<Vec<ElementHandle>> {
        self.find_all_by_selector(id.selector()).await
    }

    async fn find_all_within(
        &mut self,
        parent: TestId,
        child: TestId,
    ) -> HarnessResult<Vec<ElementHandle>> {
        self.find_all_by_selector(child.within(&parent)).await
    }

    async fn click(&mut self, element: &ElementHandle) -> HarnessResult<()> {
        tracing::debug!(selector = %element.selector, "click");
        self.act_on(&element.selector, "el.click();").await?;
        tokio::time::sleep(SETTLE_DELAY).await;
        Ok(())
    }

    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> HarnessResult<()> {
        let quoted = serde_json::to_string(text).unwrap_or_default();
        self.act_on(
            &element.selector,
            &format!(
                "el.value = {quoted}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
            ),
        )
        .await
    }

    async fn clear(&mut self, element: &ElementHandle) -> HarnessResult<()> {
        self.act_on(
            &element.selector,
            "el.value = ''; \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true }));",
        )
        .await
    }

    async fn current_url(&mut self) -> HarnessResult<String> {
        let value = self.eval("window.location.href".to_string()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn read_local_storage(&mut self, key: &str) -> HarnessResult<Option<String>> {
        let quoted = serde_json::to_string(key).unwrap_or_default();
        let value = self
            .eval(format!("window.localStorage.getItem({quoted})"))
            .await?;
        Ok(value.as_str().map(String::from))
    }

    async fn remove_local_storage(&mut self, key: &str) -> HarnessResult<()> {
        let quoted = serde_json::to_string(key).unwrap_or_default();
        self.eval(format!("window.localStorage.removeItem({quoted})"))
            .await?;
        Ok(())
    }

    async fn close(&mut self) -> HarnessResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| HarnessError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_script_quotes_the_selector() {
        let script = ChromiumDriver::snapshot_script("[data-cy=login-submit]");
        assert!(script.contains("\"[data-cy=login-submit]\""));
        assert!(script.contains("querySelectorAll"));
    }

    #[test]
    fn handle_from_snapshot_captures_attrs() {
        let snap = serde_json::json!({
            "tag": "input",
            "text": "  Se connecter  ",
            "attrs": {"type": "password", "id": "password"},
            "visible": true,
        });
        let handle = ChromiumDriver::handle_from_snapshot("[data-cy=x]", &snap);
        assert_eq!(handle.tag_name, "input");
        assert_eq!(handle.text(), "Se connecter");
        assert_eq!(handle.attr("type"), Some("password"));
        assert!(handle.is_visible());
    }

    #[test]
    fn handle_from_snapshot_tolerates_missing_fields() {
        let handle = ChromiumDriver::handle_from_snapshot("[data-cy=x]", &serde_json::json!({}));
        assert_eq!(handle.tag_name, "");
        assert!(!handle.is_visible());
    }
}
