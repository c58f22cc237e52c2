//! Authenticated sessions and the fixture account.

use serde::{Deserialize, Serialize};

/// Credentials for the fixture account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login identifier (the storefront uses an email address)
    pub username: String,
    /// Password
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "test2@test.fr".to_string(),
            password: "testtest".to_string(),
        }
    }
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The login request body expected by `POST /login`
    #[must_use]
    pub fn login_body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password,
        })
    }
}

/// An authenticated context usable for subsequent API calls.
///
/// Obtained from a successful login; held for the duration of a group or a
/// single scenario depending on [`SessionScope`], then discarded. A dropped
/// or invalidated session's token is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    /// Owner of the session
    pub username: String,
}

impl Session {
    /// Wrap a freshly issued token
    #[must_use]
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }

    /// The opaque bearer token
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for an `Authorization` header
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Consume the session, making its token unreachable
    pub fn invalidate(self) {}
}

/// How long a session obtained by a group's setup lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionScope {
    /// One session acquired in the group's `before` hook, shared read-only
    /// by every scenario in the group
    #[default]
    Group,
    /// A fresh session per scenario (acquired in `before_each`), exclusive
    /// to that scenario and dropped after it
    Scenario,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials_are_the_fixture_account() {
        let creds = Credentials::default();
        assert_eq!(creds.username, "test2@test.fr");
        assert_eq!(creds.password, "testtest");
    }

    #[test]
    fn login_body_shape() {
        let body = Credentials::new("a@b.c", "pw").login_body();
        assert_eq!(body["username"], "a@b.c");
        assert_eq!(body["password"], "pw");
    }

    #[test]
    fn bearer_header_value() {
        let session = Session::new("abc123", "a@b.c");
        assert_eq!(session.token(), "abc123");
        assert_eq!(session.bearer(), "Bearer abc123");
    }

    #[test]
    fn group_scope_is_default() {
        assert_eq!(SessionScope::default(), SessionScope::Group);
    }
}
