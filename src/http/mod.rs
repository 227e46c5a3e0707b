//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware pipeline)
//!     → cors.rs (preflight answered, CORS headers added)
//!     → auth filter (see crate::auth)
//!     → server.rs gateway handler (route lookup)
//!     → forward.rs (rewrite, header policy, upstream call, relay)
//!     → response.rs (error body shapes)
//!     → Send to client
//! ```

pub mod cors;
pub mod forward;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
