//! Default request and response values.

use http::header::CONTENT_TYPE;
use http::{StatusCode, Version};

use super::Environment;
use crate::settings::Settings;

pub type Request = http::Request<Vec<u8>>;
pub type Response = http::Response<Vec<u8>>;

pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Builds the incoming request described by `environment`.
pub fn request_from_environment(environment: &Environment) -> Result<Request, http::Error> {
    let mut builder = http::Request::builder()
        .method(environment.method())
        .uri(environment.uri())
        .version(parse_version(environment.protocol()));
    for (name, value) in environment.headers() {
        builder = builder.header(name, value);
    }
    builder.body(Vec::new())
}

/// Empty 200 response using the configured protocol version.
pub fn default_response(settings: &Settings) -> Result<Response, http::Error> {
    http::Response::builder()
        .status(StatusCode::OK)
        .version(parse_version(settings.http_version()))
        .header(CONTENT_TYPE, DEFAULT_CONTENT_TYPE)
        .body(Vec::new())
}

/// Accepts `1.0`, `1.1`, `2`, `3` with or without an `HTTP/` prefix; anything else is HTTP/1.1.
pub fn parse_version(version: &str) -> Version {
    match version.trim().trim_start_matches("HTTP/") {
        "0.9" => Version::HTTP_09,
        "1.0" => Version::HTTP_10,
        "2" | "2.0" => Version::HTTP_2,
        "3" | "3.0" => Version::HTTP_3,
        _ => Version::HTTP_11,
    }
}
