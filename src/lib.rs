//! Audio relay: a stateless HTTP forwarding gateway for music CDNs.
//!
//! Callers hand the relay a percent-encoded target URL; the relay checks the
//! host against an allow-list, impersonates a mobile browser (User-Agent
//! plus the Referer each CDN expects), fetches the target with a deadline,
//! and streams the response back with permissive CORS headers. Range
//! requests pass straight through, so players can seek.
//!
//! ```text
//! Router → request (validate) → security (allow-list, headers)
//!        → upstream (fetch) → response (relay) → caller
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, StartupError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
