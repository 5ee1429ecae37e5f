//! Inbound request validation.
//!
//! # Responsibilities
//! - Extract and decode the `url` query parameter
//! - Reject malformed, non-HTTP(S) targets before any network I/O
//! - Carry the caller's `Range` header into the target descriptor
//! - Read the request ID assigned by the request-id layer
//!
//! # Design Decisions
//! - Query parsing is lenient (form-urlencoded); the second decode of the
//!   parameter value is strict, so a stray `%` is a client error
//! - Query strings, fragments and userinfo of the target are not touched

use axum::http::{header::RANGE, HeaderMap, HeaderValue};
use percent_encoding::percent_decode_str;
use url::{form_urlencoded, ParseError, Url};

use crate::error::ProxyError;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Name of the query parameter holding the target URL.
pub const TARGET_PARAM: &str = "url";

/// Returns the request ID, or `"unknown"` if none was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Scheme of a validated target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetScheme {
    Http,
    Https,
}

impl TargetScheme {
    fn parse(scheme: &str) -> Option<Self> {
        if scheme.eq_ignore_ascii_case("http") {
            Some(TargetScheme::Http)
        } else if scheme.eq_ignore_ascii_case("https") {
            Some(TargetScheme::Https)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetScheme::Http => "http",
            TargetScheme::Https => "https",
        }
    }
}

/// A validated outbound target. Consumed once by the fetcher.
#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    pub scheme: TargetScheme,
    pub hostname: String,
    pub url: Url,
    pub range: Option<HeaderValue>,
}

/// Validate the raw query string and inbound headers into a target.
///
/// Domain authorization is a separate step; this only checks shape.
pub fn parse_target(query: Option<&str>, headers: &HeaderMap) -> Result<TargetDescriptor, ProxyError> {
    let raw = query
        .and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == TARGET_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|value| !value.is_empty())
        .ok_or(ProxyError::MissingParameter)?;

    let decoded = decode_component(&raw)?;
    let url = Url::parse(&decoded).map_err(ProxyError::MalformedUrl)?;

    let scheme = TargetScheme::parse(url.scheme())
        .ok_or_else(|| ProxyError::UnsupportedScheme(url.scheme().to_string()))?;

    let hostname = url
        .host_str()
        .ok_or(ProxyError::MalformedUrl(ParseError::EmptyHost))?
        .to_string();

    Ok(TargetDescriptor {
        scheme,
        hostname,
        url,
        range: headers.get(RANGE).cloned(),
    })
}

/// Strict percent-decoding: every `%` must start a two-digit hex escape and
/// the decoded bytes must be UTF-8.
pub fn decode_component(raw: &str) -> Result<String, ProxyError> {
    let bytes = raw.as_bytes();
    let well_formed = raw.match_indices('%').all(|(i, _)| {
        bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if !well_formed {
        return Err(ProxyError::MalformedEncoding);
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| ProxyError::MalformedEncoding)
}
