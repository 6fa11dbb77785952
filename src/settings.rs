//! Framework settings: built-in defaults merged with user values.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ConfigError;

pub const HTTP_VERSION: &str = "httpVersion";
pub const RESPONSE_CHUNK_SIZE: &str = "responseChunkSize";
pub const OUTPUT_BUFFERING: &str = "outputBuffering";
pub const DETERMINE_ROUTE_BEFORE_APP_MIDDLEWARE: &str = "determineRouteBeforeAppMiddleware";
pub const DISPLAY_ERROR_DETAILS: &str = "displayErrorDetails";
pub const ADD_CONTENT_LENGTH_HEADER: &str = "addContentLengthHeader";
pub const ROUTER_CACHE_FILE: &str = "routerCacheFile";

static DEFAULTS: Lazy<Map<String, Value>> = Lazy::new(|| {
    [
        (HTTP_VERSION, json!("1.1")),
        (RESPONSE_CHUNK_SIZE, json!(4096)),
        (OUTPUT_BUFFERING, json!("append")),
        (DETERMINE_ROUTE_BEFORE_APP_MIDDLEWARE, json!(false)),
        (DISPLAY_ERROR_DETAILS, json!(false)),
        (ADD_CONTENT_LENGTH_HEADER, json!(true)),
        (ROUTER_CACHE_FILE, json!(false)),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
});

/// The `settings` service.
///
/// Known keys are type-checked when merging; any other key is carried
/// through untouched for the application to read with [`Settings::get`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Settings {
    pub fn defaults() -> Self {
        Self(DEFAULTS.clone())
    }

    /// Layers `user` over the defaults; user values win on key collision.
    pub fn merged(user: Map<String, Value>) -> Result<Self, ConfigError> {
        let mut map = DEFAULTS.clone();
        map.extend(user);
        // Env and TOML sources hand over `2` or `1.0` as numbers.
        if let Some(Value::Number(version)) = map.get(HTTP_VERSION) {
            let version = version.to_string();
            map.insert(HTTP_VERSION.to_string(), Value::String(version));
        }
        let settings = Self(map);
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, expected| ConfigError::InvalidSetting {
            key: key.to_string(),
            expected,
        };

        for key in [
            DETERMINE_ROUTE_BEFORE_APP_MIDDLEWARE,
            DISPLAY_ERROR_DETAILS,
            ADD_CONTENT_LENGTH_HEADER,
        ] {
            if !matches!(self.0.get(key), Some(Value::Bool(_))) {
                return Err(invalid(key, "a boolean"));
            }
        }
        if !matches!(self.0.get(HTTP_VERSION), Some(Value::String(_))) {
            return Err(invalid(HTTP_VERSION, "a string"));
        }
        match self.0.get(RESPONSE_CHUNK_SIZE).and_then(Value::as_u64) {
            Some(size) if size > 0 => {}
            _ => return Err(invalid(RESPONSE_CHUNK_SIZE, "a positive integer")),
        }
        match self.0.get(OUTPUT_BUFFERING) {
            Some(Value::Bool(false)) => {}
            Some(Value::String(mode)) if mode == "append" || mode == "prepend" => {}
            _ => {
                return Err(invalid(
                    OUTPUT_BUFFERING,
                    "false, \"append\" or \"prepend\"",
                ))
            }
        }
        match self.0.get(ROUTER_CACHE_FILE) {
            Some(Value::Bool(false)) | Some(Value::String(_)) => {}
            _ => return Err(invalid(ROUTER_CACHE_FILE, "false or a file path")),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn http_version(&self) -> &str {
        self.0
            .get(HTTP_VERSION)
            .and_then(Value::as_str)
            .unwrap_or("1.1")
    }

    pub fn response_chunk_size(&self) -> u64 {
        self.0
            .get(RESPONSE_CHUNK_SIZE)
            .and_then(Value::as_u64)
            .unwrap_or(4096)
    }

    /// `None` when output buffering is disabled.
    pub fn output_buffering(&self) -> Option<&str> {
        self.0.get(OUTPUT_BUFFERING).and_then(Value::as_str)
    }

    pub fn determine_route_before_app_middleware(&self) -> bool {
        self.flag(DETERMINE_ROUTE_BEFORE_APP_MIDDLEWARE, false)
    }

    pub fn display_error_details(&self) -> bool {
        self.flag(DISPLAY_ERROR_DETAILS, false)
    }

    pub fn add_content_length_header(&self) -> bool {
        self.flag(ADD_CONTENT_LENGTH_HEADER, true)
    }

    pub fn router_cache_file(&self) -> Option<PathBuf> {
        self.0
            .get(ROUTER_CACHE_FILE)
            .and_then(Value::as_str)
            .map(PathBuf::from)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::defaults();
        assert_eq!(settings.http_version(), "1.1");
        assert_eq!(settings.response_chunk_size(), 4096);
        assert_eq!(settings.output_buffering(), Some("append"));
        assert!(!settings.determine_route_before_app_middleware());
        assert!(!settings.display_error_details());
        assert!(settings.add_content_length_header());
        assert_eq!(settings.router_cache_file(), None);
    }

    #[test]
    fn test_user_values_win() {
        let settings = Settings::merged(object(json!({
            "displayErrorDetails": true,
            "httpVersion": "2",
            "db": {"host": "localhost"},
        })))
        .unwrap();

        assert!(settings.display_error_details());
        assert_eq!(settings.http_version(), "2");
        assert_eq!(settings.get("db"), Some(&json!({"host": "localhost"})));
        // untouched defaults survive
        assert_eq!(settings.response_chunk_size(), 4096);
    }

    #[test]
    fn test_router_cache_file_and_buffering() {
        let settings = Settings::merged(object(json!({
            "routerCacheFile": "/tmp/routes.cache",
            "outputBuffering": false,
        })))
        .unwrap();

        assert_eq!(
            settings.router_cache_file(),
            Some(PathBuf::from("/tmp/routes.cache"))
        );
        assert_eq!(settings.output_buffering(), None);
    }

    #[test]
    fn test_known_keys_are_type_checked() {
        let err = Settings::merged(object(json!({"displayErrorDetails": "yes"}))).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting { ref key, .. } if key == "displayErrorDetails"
        ));

        assert!(Settings::merged(object(json!({"responseChunkSize": 0}))).is_err());
        assert!(Settings::merged(object(json!({"outputBuffering": "sideways"}))).is_err());
        assert!(Settings::merged(object(json!({"routerCacheFile": true}))).is_err());
    }

    #[test]
    fn test_numeric_http_version_is_accepted() {
        let settings = Settings::merged(object(json!({"httpVersion": 2}))).unwrap();
        assert_eq!(settings.http_version(), "2");

        let settings = Settings::merged(object(json!({"httpVersion": 1.0}))).unwrap();
        assert_eq!(settings.http_version(), "1.0");
    }
}
