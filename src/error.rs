//! Error taxonomy for the relay.
//!
//! Every [`ProxyError`] is terminal for its request and renders as a JSON
//! body with a fixed status code. They are produced before the first body
//! byte is sent; a failure after that point aborts the connection instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::http::response::json_response;

/// Usage hint returned alongside a missing `url` parameter.
pub const USAGE: &str = "GET /proxy?url=<encoded_audio_url>";

/// Request-scoped failures, each mapped to one HTTP status.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing url parameter")]
    MissingParameter,

    #[error("invalid percent-encoding in url parameter")]
    MalformedEncoding,

    #[error("url parameter is not an absolute URL: {0}")]
    MalformedUrl(#[source] url::ParseError),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("domain not allowed: {0}")]
    DomainNotAllowed(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream responded with {status} {status_text}")]
    UpstreamFailure { status: u16, status_text: String },

    #[error("proxy request failed: {0}")]
    ProxyFailure(String),
}

impl ProxyError {
    /// HTTP status returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingParameter
            | ProxyError::MalformedEncoding
            | ProxyError::MalformedUrl(_)
            | ProxyError::UnsupportedScheme(_) => StatusCode::BAD_REQUEST,
            ProxyError::DomainNotAllowed(_) => StatusCode::FORBIDDEN,
            ProxyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::UpstreamFailure { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::ProxyFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::MissingParameter => "missing_parameter",
            ProxyError::MalformedEncoding => "malformed_encoding",
            ProxyError::MalformedUrl(_) => "malformed_url",
            ProxyError::UnsupportedScheme(_) => "unsupported_scheme",
            ProxyError::DomainNotAllowed(_) => "domain_not_allowed",
            ProxyError::Timeout => "timeout",
            ProxyError::UpstreamFailure { .. } => "upstream_failure",
            ProxyError::ProxyFailure(_) => "proxy_failure",
        }
    }

    /// JSON body sent to the caller.
    pub fn body(&self) -> Value {
        match self {
            ProxyError::MissingParameter => json!({
                "error": "Missing url parameter",
                "usage": USAGE,
            }),
            ProxyError::MalformedEncoding => json!({ "error": "Invalid URL encoding" }),
            ProxyError::MalformedUrl(_) => json!({ "error": "Invalid URL format" }),
            ProxyError::UnsupportedScheme(_) => json!({ "error": "Only HTTP/HTTPS URLs are allowed" }),
            ProxyError::DomainNotAllowed(domain) => json!({
                "error": "Domain not allowed",
                "domain": domain,
                "hint": "Contact admin to add this domain to whitelist",
            }),
            ProxyError::Timeout => json!({ "error": "Request timeout" }),
            ProxyError::UpstreamFailure { status, status_text } => json!({
                "error": "Upstream request failed",
                "status": status,
                "statusText": status_text,
            }),
            ProxyError::ProxyFailure(message) => json!({
                "error": "Proxy request failed",
                "message": message,
            }),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        json_response(self.status_code(), &self.body())
    }
}

/// Failures that stop the process before it serves traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::MissingParameter.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ProxyError::MalformedEncoding.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProxyError::UnsupportedScheme("ftp".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::DomainNotAllowed("evil.example".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ProxyError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ProxyError::UpstreamFailure { status: 404, status_text: "Not Found".into() }.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ProxyError::ProxyFailure("dns error".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bodies_carry_diagnostics() {
        let body = ProxyError::DomainNotAllowed("evil.example".into()).body();
        assert_eq!(body["error"], "Domain not allowed");
        assert_eq!(body["domain"], "evil.example");

        let body = ProxyError::UpstreamFailure { status: 404, status_text: "Not Found".into() }.body();
        assert_eq!(body["status"], 404);
        assert_eq!(body["statusText"], "Not Found");

        let body = ProxyError::MissingParameter.body();
        assert_eq!(body["usage"], USAGE);

        assert_eq!(ProxyError::Timeout.body(), json!({ "error": "Request timeout" }));
    }

    #[test]
    fn test_into_response_is_json() {
        let response = ProxyError::Timeout.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
