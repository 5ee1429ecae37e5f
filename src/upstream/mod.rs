//! Upstream fetch subsystem.
//!
//! # Data Flow
//! ```text
//! TargetDescriptor + impersonated headers
//!     → fetcher.rs (GET with deadline, redirects followed)
//!     → UpstreamOutcome (status, header subset, body stream)
//!     → http::response::relay
//! ```
//!
//! # Design Decisions
//! - One shared client; connection pooling is per upstream host
//! - The deadline covers the status line and headers only; body streaming
//!   is bounded by the caller's connection instead
//! - Dropping the request future or the body stream closes the socket

pub mod fetcher;

pub use fetcher::{UpstreamFetcher, UpstreamOutcome};
