//! HTTP client adapter for the REST API of the system under test.
//!
//! Requests capture status, headers, and body without throwing on non-2xx
//! responses unless `fail_on_status` is left at its default — negative-path
//! scenarios disable it and inspect the captured response instead. There
//! are no retries and no timeout policy beyond the transport default: the
//! harness assumes a reachable, already-running system, and a
//! connection-level failure is fatal for the whole run.

use crate::result::{HarnessError, HarnessResult};
use crate::session::Session;
use std::collections::HashMap;

pub use reqwest::Method;

/// HTTP client bound to the API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client pointing at the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API server (e.g., `http://localhost:8081`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with a custom reqwest client (for custom timeouts, etc.)
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Returns the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start building a request against `path` (leading `/` optional)
    #[must_use]
    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            client: self,
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            fail_on_status: true,
        }
    }

    /// Shorthand for a GET request
    #[must_use]
    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    /// Shorthand for a POST request
    #[must_use]
    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    /// Shorthand for a PUT request
    #[must_use]
    pub fn put(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PUT, path)
    }

    fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url)
    }
}

/// A request under construction
#[derive(Debug)]
pub struct ApiRequest<'a> {
    client: &'a ApiClient,
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    fail_on_status: bool,
}

impl ApiRequest<'_> {
    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Inject the session's bearer token
    #[must_use]
    pub fn bearer(self, session: &Session) -> Self {
        self.header("Authorization", session.bearer())
    }

    /// Inject an arbitrary bearer token (e.g. one read from `localStorage`)
    #[must_use]
    pub fn bearer_token(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Set a JSON body
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether a status ≥ 400 aborts with [`HarnessError::HttpStatus`].
    ///
    /// Defaults to `true`; negative-path scenarios set `false` to inspect
    /// the response themselves.
    #[must_use]
    pub const fn fail_on_status(mut self, fail: bool) -> Self {
        self.fail_on_status = fail;
        self
    }

    /// Send the request and capture the response.
    ///
    /// # Errors
    ///
    /// `Transport` when the system under test is unreachable; `HttpStatus`
    /// when `fail_on_status` is enabled and the status is ≥ 400.
    pub async fn send(self) -> HarnessResult<ApiResponse> {
        let url = self.client.url_for(&self.path);
        let method_name = self.method.to_string();
        tracing::debug!(method = %method_name, url = %url, "request");

        let mut builder = self.client.client.request(self.method, &url);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = self.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| HarnessError::from_reqwest(&e, &method_name, &self.path))?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let text = resp
            .text()
            .await
            .map_err(|e| HarnessError::from_reqwest(&e, &method_name, &self.path))?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);

        tracing::debug!(status, "response");

        if self.fail_on_status && status >= 400 {
            return Err(HarnessError::HttpStatus {
                status,
                method: method_name,
                path: self.path,
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
            text,
        })
    }
}

/// A captured HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (last value wins for repeated names)
    pub headers: HashMap<String, String>,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: serde_json::Value,
    /// Raw body text
    pub text: String,
}

impl ApiResponse {
    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Look up a top-level body field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.body.get(name)
    }

    /// A top-level field as a string slice, if present and a string
    #[must_use]
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(serde_json::Value::as_str)
    }

    /// The body as an array, if it is one
    #[must_use]
    pub fn array(&self) -> Option<&Vec<serde_json::Value>> {
        self.body.as_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: serde_json::Value) -> ApiResponse {
        ApiResponse {
            status,
            headers: HashMap::new(),
            text: body.to_string(),
            body,
        }
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = ApiClient::new("http://localhost:8081/");
        assert_eq!(client.base_url(), "http://localhost:8081");
    }

    #[test]
    fn url_joining_tolerates_leading_slash() {
        let client = ApiClient::new("http://localhost:8081");
        assert_eq!(client.url_for("/orders"), "http://localhost:8081/orders");
        assert_eq!(client.url_for("orders"), "http://localhost:8081/orders");
    }

    #[test]
    fn request_defaults_to_fail_on_status() {
        let client = ApiClient::new("http://localhost:8081");
        let req = client.get("/products");
        assert!(req.fail_on_status);
        let req = client.get("/products").fail_on_status(false);
        assert!(!req.fail_on_status);
    }

    #[test]
    fn bearer_builds_authorization_header() {
        let client = ApiClient::new("http://localhost:8081");
        let session = Session::new("tok", "a@b.c");
        let req = client.get("/orders").bearer(&session);
        assert_eq!(
            req.headers,
            vec![("Authorization".to_string(), "Bearer tok".to_string())]
        );
    }

    #[test]
    fn response_field_helpers() {
        let resp = response(200, json!({"token": "abc", "orderLines": []}));
        assert!(resp.is_success());
        assert_eq!(resp.string_field("token"), Some("abc"));
        assert!(resp.field("orderLines").unwrap().is_array());
        assert!(resp.field("missing").is_none());
        assert!(resp.array().is_none());
    }

    #[test]
    fn response_array_helper() {
        let resp = response(200, json!([{"id": 1}, {"id": 2}]));
        assert_eq!(resp.array().unwrap().len(), 2);
    }

    #[test]
    fn non_json_body_is_null() {
        let resp = ApiResponse {
            status: 500,
            headers: HashMap::new(),
            body: serde_json::from_str("not json").unwrap_or(serde_json::Value::Null),
            text: "not json".to_string(),
        };
        assert!(resp.body.is_null());
        assert!(!resp.is_success());
    }
}
