//! HTTP API gateway for the ticketing microservices.
//!
//! Authenticates bearer tokens at the edge, injects trusted identity
//! headers, and reverse-proxies requests to the auth, user, ticket, and
//! comment services by path pattern.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
