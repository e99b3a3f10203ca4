//! Request context attached to handled errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Headers never copied into a context.
pub const SENSITIVE_HEADERS: [&str; 4] =
    ["authorization", "cookie", "set-cookie", "proxy-authorization"];

/// Header that supplies [`RequestContext::request_id`].
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The request an error was raised in, as far as the host framework exposes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Lower-cased header names; sensitive headers are never present.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl RequestContext {
    /// Context stamped with the current time.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            ..Self::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Record a header. Sensitive headers are dropped; `x-request-id` also
    /// sets the request id.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        if is_sensitive_header(&name) {
            return self;
        }
        let value = value.into();
        if name == REQUEST_ID_HEADER {
            self.request_id = Some(value.clone());
        }
        self.headers.insert(name, value);
        self
    }

    /// Record every header from `headers`, with the same filtering as
    /// [`header`](Self::header).
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |ctx, (name, value)| ctx.header(name.as_ref(), value))
    }

    pub fn user(mut self, id: impl Into<String>, role: Option<String>) -> Self {
        self.user_id = Some(id.into());
        self.user_role = role;
        self
    }

    pub fn timestamp(mut self, epoch_millis: i64) -> Self {
        self.timestamp = epoch_millis;
        self
    }
}

pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitive_headers_are_dropped() {
        let ctx = RequestContext::new("POST", "/api/test").headers([
            ("Authorization", "Bearer secret"),
            ("Cookie", "sid=1"),
            ("content-type", "application/json"),
            ("Proxy-Authorization", "Basic x"),
        ]);
        assert_eq!(ctx.headers.len(), 1);
        assert_eq!(ctx.headers["content-type"], "application/json");
        assert!(!serde_json::to_string(&ctx).unwrap().contains("secret"));
    }

    #[test]
    fn request_id_comes_from_header() {
        let ctx = RequestContext::new("GET", "/").header("X-Request-Id", "test-request-id");
        assert_eq!(ctx.request_id.as_deref(), Some("test-request-id"));
    }

    #[test]
    fn timestamp_is_recent_epoch_millis() {
        let before = chrono::Utc::now().timestamp_millis();
        let ctx = RequestContext::new("GET", "/");
        assert!(ctx.timestamp >= before);
        assert!(ctx.timestamp > 1_600_000_000_000);
    }

    #[test]
    fn camel_case_serialization() {
        let ctx = RequestContext::new("POST", "/api/test")
            .param("id", "123")
            .query("param1", "value1")
            .user("user-123", Some("admin".into()))
            .timestamp(42);
        let v = serde_json::to_value(&ctx).unwrap();
        assert_eq!(v["userId"], "user-123");
        assert_eq!(v["userRole"], "admin");
        assert_eq!(v["params"]["id"], "123");
        assert_eq!(v["timestamp"], 42);
        assert!(v.get("requestId").is_none());
    }
}
