//! Server environment the default request is built from.

use std::collections::BTreeMap;

use http::header::{HeaderName, HeaderValue};

/// Snapshot of CGI-style server variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Mock defaults with the given variables layered on top.
    pub fn mock<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars = mock_defaults();
        vars.extend(
            overrides
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        Self { vars }
    }

    /// Mock defaults overridden by the process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        Self::mock(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn method(&self) -> &str {
        self.get("REQUEST_METHOD").unwrap_or("GET")
    }

    pub fn protocol(&self) -> &str {
        self.get("SERVER_PROTOCOL").unwrap_or("HTTP/1.1")
    }

    pub fn is_https(&self) -> bool {
        matches!(self.get("HTTPS"), Some(value) if !value.is_empty() && value != "off")
            || self.get("SERVER_PORT") == Some("443")
    }

    /// Absolute URI assembled from host, request URI and query string.
    pub fn uri(&self) -> String {
        let scheme = if self.is_https() { "https" } else { "http" };
        let host = self
            .get("HTTP_HOST")
            .or_else(|| self.get("SERVER_NAME"))
            .unwrap_or("localhost");

        let mut path = self.get("REQUEST_URI").unwrap_or("/").to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        match self.get("QUERY_STRING") {
            Some(query) if !query.is_empty() && !path.contains('?') => {
                path.push('?');
                path.push_str(query);
            }
            _ => {}
        }

        format!("{scheme}://{host}{path}")
    }

    /// Request headers from `HTTP_*`, `CONTENT_TYPE` and `CONTENT_LENGTH`.
    ///
    /// Variables that do not form a valid header are skipped.
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        self.vars
            .iter()
            .filter_map(|(key, value)| {
                let name = match key.as_str() {
                    "CONTENT_TYPE" | "CONTENT_LENGTH" => key.as_str(),
                    _ => key.strip_prefix("HTTP_")?,
                };
                let name = HeaderName::from_bytes(name.replace('_', "-").to_lowercase().as_bytes())
                    .ok()?;
                let value = HeaderValue::from_str(value).ok()?;
                Some((name, value))
            })
            .collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            vars: mock_defaults(),
        }
    }
}

fn mock_defaults() -> BTreeMap<String, String> {
    let now = chrono::Utc::now();
    [
        ("SERVER_PROTOCOL", "HTTP/1.1".to_string()),
        ("REQUEST_METHOD", "GET".to_string()),
        ("SCRIPT_NAME", String::new()),
        ("REQUEST_URI", "/".to_string()),
        ("QUERY_STRING", String::new()),
        ("SERVER_NAME", "localhost".to_string()),
        ("SERVER_PORT", "80".to_string()),
        ("HTTP_HOST", "localhost".to_string()),
        (
            "HTTP_ACCEPT",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        ),
        ("HTTP_ACCEPT_LANGUAGE", "en-US,en;q=0.8".to_string()),
        ("HTTP_ACCEPT_CHARSET", "ISO-8859-1,utf-8;q=0.7,*;q=0.3".to_string()),
        ("HTTP_USER_AGENT", "Tether".to_string()),
        ("REMOTE_ADDR", "127.0.0.1".to_string()),
        ("REQUEST_TIME", now.timestamp().to_string()),
        (
            "REQUEST_TIME_FLOAT",
            format!("{:.6}", now.timestamp_micros() as f64 / 1_000_000.0),
        ),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}
