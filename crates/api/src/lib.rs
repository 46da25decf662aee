//! HTTP API layer for feed-rs.
//!
//! - **Endpoints**: the feed actions, notifications and profiles as JSON routes
//! - **Extractors**: caller identity, required sign-in
//! - **Middleware**: bearer token authentication
//! - **Streaming**: Server-Sent Events carrying view invalidations
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
