//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Validated target:
//!     → access_control.rs (hostname against the domain allow-list)
//!     → headers.rs (impersonated User-Agent / Referer, Range passthrough)
//!     → Pass to upstream fetcher
//! ```
//!
//! # Design Decisions
//! - Fail closed: a host not on the list never reaches the network
//! - Caller identity is never forwarded upstream

pub mod access_control;
pub mod headers;

pub use access_control::DomainAllowList;
pub use headers::build_outbound_headers;
