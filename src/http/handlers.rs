//! Locally handled endpoints.
//!
//! Smoke-test routes that never touch an upstream: `/api/test/auth` echoes
//! the identity the filter injected, `/api/test/admin` sits behind the
//! admin role guard.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{http::HeaderMap, Extension, Json};

use crate::auth::{Identity, X_ROLE, X_USER};

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Echo the injected identity headers.
pub async fn test_auth(headers: HeaderMap) -> Json<serde_json::Value> {
    let user = headers.get(X_USER).and_then(|v| v.to_str().ok());
    let role = headers.get(X_ROLE).and_then(|v| v.to_str().ok());

    Json(serde_json::json!({
        "message": "Authentication successful",
        "user": user,
        "role": role,
        "timestamp": unix_millis() as u64,
    }))
}

/// Reachable only with the `admin` role; the guard rejects everyone else.
pub async fn test_admin(Extension(identity): Extension<Identity>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Admin access granted",
        "username": identity.username,
        "role": identity.role,
    }))
}
