//! Default error, not-found and not-allowed handlers.

use http::header::{ALLOW, CONTENT_TYPE};
use http::{Method, StatusCode};

use super::message::{Request, Response, DEFAULT_CONTENT_TYPE};

/// Renders uncaught application errors as a 500 page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorHandler {
    display_error_details: bool,
}

impl ErrorHandler {
    pub fn new(display_error_details: bool) -> Self {
        Self {
            display_error_details,
        }
    }

    pub fn display_error_details(&self) -> bool {
        self.display_error_details
    }

    pub fn handle(
        &self,
        _request: &Request,
        error: &(dyn std::error::Error + 'static),
    ) -> Result<Response, http::Error> {
        let mut body = String::from("<html><head><title>Application Error</title></head><body>");
        body.push_str("<h1>Application Error</h1>");
        if self.display_error_details {
            body.push_str(
                "<p>The application could not run because of the following error:</p>",
            );
            let mut current = Some(error);
            while let Some(err) = current {
                let message = escape(&err.to_string());
                body.push_str(&format!("<div><strong>Message:</strong> {message}</div>"));
                current = err.source();
            }
        } else {
            body.push_str(
                "<p>A website error has occurred. Sorry for the temporary inconvenience.</p>",
            );
        }
        body.push_str("</body></html>");

        html(StatusCode::INTERNAL_SERVER_ERROR, body)
    }
}

/// 404 page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotFoundHandler;

impl NotFoundHandler {
    pub fn handle(&self, request: &Request) -> Result<Response, http::Error> {
        let body = format!(
            "<html><head><title>Page Not Found</title></head><body>\
             <h1>Page Not Found</h1>\
             <p>The page you are looking for could not be found.</p>\
             <a href=\"{}\">Visit the Home Page</a></body></html>",
            escape(&home_url(request))
        );
        html(StatusCode::NOT_FOUND, body)
    }
}

/// 405 page, or the allowed-methods list for `OPTIONS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotAllowedHandler;

impl NotAllowedHandler {
    pub fn handle(&self, request: &Request, allowed: &[Method]) -> Result<Response, http::Error> {
        let allow = allowed
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        if request.method() == Method::OPTIONS {
            return http::Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "text/plain")
                .header(ALLOW, allow.as_str())
                .body(format!("Allowed methods: {allow}").into_bytes());
        }

        let body = format!(
            "<html><head><title>Method not allowed</title></head><body>\
             <h1>Method not allowed</h1>\
             <p>Method not allowed. Must be one of: <strong>{allow}</strong></p></body></html>"
        );
        http::Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(CONTENT_TYPE, DEFAULT_CONTENT_TYPE)
            .header(ALLOW, allow.as_str())
            .body(body.into_bytes())
    }
}

fn html(status: StatusCode, body: String) -> Result<Response, http::Error> {
    http::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, DEFAULT_CONTENT_TYPE)
        .body(body.into_bytes())
}

fn home_url(request: &Request) -> String {
    match (request.uri().scheme_str(), request.uri().authority()) {
        (Some(scheme), Some(authority)) => format!("{scheme}://{authority}/"),
        _ => "/".to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
