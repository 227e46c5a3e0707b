//! Authentication and authorization subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (post-CORS):
//!     → filter.rs (reject forged trusted headers, validate bearer token)
//!     → token.rs (signature + expiry, claim extraction)
//!     → identity.rs (bind {username, role} to the request)
//!     → trusted headers injected for the upstream hop
//!
//! Locally handled routes:
//!     → guard.rs (declarative role requirement reads the bound identity)
//! ```
//!
//! # Design Decisions
//! - Identity rides request extensions, never a thread-keyed store
//! - Trusted headers are gateway-owned: stripped on entry, set from claims
//! - All auth failures are 401 JSON bodies produced here, not downstream

pub mod filter;
pub mod guard;
pub mod identity;
pub mod token;

pub use guard::RequireRole;
pub use identity::Identity;
pub use token::{Claims, TokenValidator};

/// Trusted identity headers, set by the auth filter and consumed by the
/// upstream services. Forbidden from external clients.
pub const X_USER: &str = "x-user";
pub const X_ROLE: &str = "x-role";
pub const X_USERNAME: &str = "x-username";
pub const X_INTERNAL_AUTH: &str = "x-internal-auth";
