//! Outbound header impersonation.
//!
//! Upstream music CDNs gate on User-Agent and Referer. Outbound requests
//! always carry a fixed mobile Safari User-Agent, a Referer chosen from the
//! target hostname, and the caller's `Range` header when one was sent.

use axum::http::{
    header::{RANGE, REFERER, USER_AGENT},
    HeaderMap, HeaderValue,
};

/// User-Agent sent on every upstream request.
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

/// Hostname fragments and the Referer they map to. First match wins.
const REFERER_TABLE: &[(&[&str], &str)] = &[
    (&["qq.com", "qqmusic"], "https://y.qq.com/"),
    (&["163.com", "126.net"], "https://music.163.com/"),
    (&["kugou"], "https://www.kugou.com/"),
    (&["kuwo"], "https://www.kuwo.cn/"),
    (&["migu"], "https://music.migu.cn/"),
];

/// Referer expected by the CDN serving `hostname`, if any.
pub fn referer_for(hostname: &str) -> Option<&'static str> {
    let host = hostname.to_lowercase();
    REFERER_TABLE
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| host.contains(f)))
        .map(|(_, referer)| *referer)
}

/// Build the header set for an upstream request to `hostname`.
pub fn build_outbound_headers(hostname: &str, range: Option<&HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(MOBILE_USER_AGENT));

    if let Some(referer) = referer_for(hostname) {
        headers.insert(REFERER, HeaderValue::from_static(referer));
    }

    if let Some(range) = range {
        headers.insert(RANGE, range.clone());
    }

    headers
}
