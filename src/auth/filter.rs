//! Authentication filter.
//!
//! Runs after CORS and before routing for everything under `/api`. Validates
//! the bearer token, binds the request identity, and replaces any trusted
//! headers with values derived from the token. Unauthorized requests are
//! rejected here; downstream components never see them.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::identity::Identity;
use crate::auth::{X_INTERNAL_AUTH, X_ROLE, X_USER, X_USERNAME};
use crate::http::response::unauthorized;
use crate::http::server::AppState;

/// Trusted header names, lowercased. `HeaderMap` normalizes incoming names,
/// so lookups here cover every capitalization a client might send.
pub const TRUSTED_HEADERS: [&str; 4] = [X_USER, X_ROLE, X_USERNAME, X_INTERNAL_AUTH];

pub async fn auth_filter(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // CORS preflight never depends on authentication
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    if !path.starts_with("/api") {
        return next.run(request).await;
    }

    // Trusted headers are set by this filter only. A client supplying one is
    // a forgery attempt, on public paths too: the forwarder relays them
    // verbatim, so they must never enter from outside.
    if let Some(name) = TRUSTED_HEADERS
        .iter()
        .find(|h| request.headers().contains_key(**h))
    {
        tracing::warn!(header = %name, path = %path, "Rejected request carrying trusted header");
        return unauthorized("X-Internal-Auth header is not allowed from external requests");
    }

    // Auth service endpoints are public (login, register)
    if path.starts_with("/api/auth/") {
        return next.run(request).await;
    }

    let token = match bearer_token(request.headers()) {
        Some(t) => t.to_string(),
        None => return unauthorized("Missing or invalid Authorization header"),
    };

    let claims = match state.validator.validate(&token) {
        Some(c) => c,
        None => return unauthorized("Invalid or expired token"),
    };

    let (user_id, username, role) = match (claims.user_id(), claims.username(), claims.role()) {
        (Some(id), Some(username), Some(role)) => (id, username.to_string(), role.to_string()),
        _ => return unauthorized("Invalid token claims"),
    };

    let header_values = (
        HeaderValue::from_str(&user_id),
        HeaderValue::from_str(&username),
        HeaderValue::from_str(&role),
    );
    let (user_id_value, username_value, role_value) = match header_values {
        (Ok(a), Ok(b), Ok(c)) => (a, b, c),
        _ => return unauthorized("Invalid token claims"),
    };

    request
        .extensions_mut()
        .insert(Identity::new(username, role));

    let headers = request.headers_mut();
    headers.insert(X_USER, user_id_value);
    headers.insert(X_ROLE, role_value);
    headers.insert(X_USERNAME, username_value);
    headers.insert(X_INTERNAL_AUTH, HeaderValue::from_static("true"));

    next.run(request).await
}

/// Extract the token from `Authorization: Bearer <token>`. The prefix check
/// is case-sensitive, matching what the upstream services expect.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_case_sensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn missing_authorization_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
