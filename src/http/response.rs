//! Response construction and relay.
//!
//! # Responsibilities
//! - Map an accepted upstream outcome onto the client response
//! - Attach CORS and cache-control headers
//! - Render JSON error bodies, preflight and 404 responses
//!
//! # Design Decisions
//! - The upstream body is moved into the response as a stream; nothing is
//!   buffered, and a mid-stream failure aborts the connection
//! - Only Content-Type, Content-Length and Content-Range cross over;
//!   length and range are never synthesized
//! - Cache-Control is always overridden so edges cache audio for a day

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
            CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::upstream::UpstreamOutcome;

/// Content-Type used when the upstream sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

/// Cache directive attached to every relayed body.
pub const RELAY_CACHE_CONTROL: &str = "public, max-age=86400";

/// Preflight cache lifetime in seconds.
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Add the permissive CORS headers carried by every response.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, HEAD, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Range, Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Length, Content-Range, Content-Type"),
    );
}

/// Turn an accepted upstream outcome into the client response.
pub fn relay(outcome: UpstreamOutcome) -> Response {
    let UpstreamOutcome { status, headers: upstream, body } = outcome;

    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        upstream
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );
    for name in [CONTENT_LENGTH, CONTENT_RANGE] {
        if let Some(value) = upstream.get(&name) {
            headers.insert(name, value.clone());
        }
    }
    apply_cors(headers);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(RELAY_CACHE_CONTROL));

    response
}

/// Pretty-printed JSON body with CORS headers.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let mut response = match serde_json::to_string_pretty(body) {
        Ok(text) => (status, text).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    apply_cors(headers);
    response
}

/// Answer to a CORS preflight: 204, no body.
pub fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    apply_cors(headers);
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(PREFLIGHT_MAX_AGE));
    response
}

/// Plain-text 404.
pub fn not_found() -> Response {
    let mut response = (StatusCode::NOT_FOUND, "Not Found").into_response();
    apply_cors(response.headers_mut());
    response
}
