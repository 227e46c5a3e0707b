//! Per-request identity.
//!
//! The auth filter inserts an [`Identity`] into the request extensions after
//! validating the bearer token; the role guard reads it back. Extensions are
//! owned by the request, so the value is dropped on every exit path and can
//! never leak across concurrent requests.

/// Authenticated principal bound to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub role: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
        }
    }
}
