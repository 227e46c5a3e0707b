//! CORS policy for the browser frontend.
//!
//! Applied outermost, before the auth filter, so preflight `OPTIONS`
//! requests are answered here and never reach authentication or routing.
//!
//! Policy:
//! - Exact-match origin allow-list (localhost dev/prod ports by default)
//! - All gateway methods allowed
//! - Any request header allowed; credentials permitted
//! - Only `Authorization` and `Content-Type` exposed to scripts — the
//!   trusted identity headers stay between the gateway and its upstreams

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer from config.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        // a wildcard cannot be combined with credentials; mirroring the
        // requested headers is the compatible "any"
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_secs))
}
