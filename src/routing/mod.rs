//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate segment patterns)
//!     → Return: matched Route or NoMatch
//!
//! Route Compilation (at startup):
//!     UpstreamConfig
//!     → fixed pattern table bound to upstream base URLs
//!     → sort by specificity
//!     → freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path (segment matching only)
//! - Deterministic: same path always matches the same route
//! - Most specific pattern wins, never registration order

pub mod matcher;
pub mod router;

pub use matcher::PathPattern;
pub use router::{ErrorKey, Route, RouteTable};
