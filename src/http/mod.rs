//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, method/path dispatch)
//!     → request.rs (decode `url`, validate scheme, capture Range)
//!     → [security: allow-list, impersonated headers]
//!     → [upstream: GET with deadline]
//!     → response.rs (relay status/headers, stream body, CORS)
//!     → Send to client
//! ```

pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use request::{parse_target, TargetDescriptor, X_REQUEST_ID};
pub use server::HttpServer;
