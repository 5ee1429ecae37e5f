//! Outbound GET to the validated target.

use std::error::Error as _;
use std::time::Duration;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
};
use futures_util::TryStreamExt;
use reqwest::{redirect::Policy, Client};

use crate::config::UpstreamConfig;
use crate::error::ProxyError;
use crate::http::request::TargetDescriptor;

/// Upstream headers relayed to the caller.
const RELAYED_HEADERS: [axum::http::HeaderName; 3] = [CONTENT_TYPE, CONTENT_LENGTH, CONTENT_RANGE];

/// Accepted upstream response, ready to be relayed.
///
/// `body` owns the upstream connection; dropping it closes the socket.
#[derive(Debug)]
pub struct UpstreamOutcome {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

/// Issues upstream requests with a fixed deadline.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    client: Client,
    timeout: Duration,
}

impl UpstreamFetcher {
    /// Build the shared client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(Policy::limited(config.max_redirects))
            // Keep the impersonated Referer across redirect hops.
            .referer(false)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// GET `target` with `headers`, regardless of the inbound method.
    ///
    /// Redirects are followed by the client. If no response head arrives
    /// within the deadline, the in-flight request is dropped.
    pub async fn fetch(
        &self,
        target: &TargetDescriptor,
        headers: HeaderMap,
    ) -> Result<UpstreamOutcome, ProxyError> {
        tracing::debug!(
            host = %target.hostname,
            scheme = target.scheme.as_str(),
            range = ?target.range,
            "Dispatching upstream request"
        );

        let request = self.client.get(target.url.clone()).headers(headers).send();

        let response = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(ProxyError::Timeout),
            Ok(Err(e)) => return Err(ProxyError::ProxyFailure(describe(&e))),
            Err(_) => return Err(ProxyError::Timeout),
        };

        let status = response.status();
        check_status(status)?;

        if response.url() != &target.url {
            tracing::debug!(final_url = %response.url(), "Followed upstream redirect");
        }

        let mut relayed = HeaderMap::new();
        for name in RELAYED_HEADERS {
            if let Some(value) = response.headers().get(&name) {
                relayed.insert(name, value.clone());
            }
        }

        let host = target.hostname.clone();
        let stream = response.bytes_stream().inspect_err(move |e| {
            tracing::warn!(host = %host, error = %e, "Upstream body stream interrupted");
        });

        Ok(UpstreamOutcome {
            status,
            headers: relayed,
            body: Body::from_stream(stream),
        })
    }
}

/// Any 2xx (including 206 Partial Content) is relayed; the rest is a failure.
pub fn check_status(status: StatusCode) -> Result<(), ProxyError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ProxyError::UpstreamFailure {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

/// Error message including the innermost cause (DNS, refused, TLS...).
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses_accepted() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::PARTIAL_CONTENT).is_ok());
        assert!(check_status(StatusCode::NO_CONTENT).is_ok());
    }

    #[test]
    fn test_failure_statuses_rejected() {
        match check_status(StatusCode::NOT_FOUND) {
            Err(ProxyError::UpstreamFailure { status, status_text }) => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(check_status(StatusCode::FORBIDDEN).is_err());
        assert!(check_status(StatusCode::FOUND).is_err());
        assert!(check_status(StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }

    #[test]
    fn test_builds_from_defaults() {
        let fetcher = UpstreamFetcher::new(&UpstreamConfig::default()).unwrap();
        assert_eq!(fetcher.timeout, Duration::from_secs(30));
    }
}
