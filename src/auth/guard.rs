//! Declarative role requirements for locally handled routes.
//!
//! Attach with `route_layer`:
//!
//! ```ignore
//! .route("/api/test/admin", get(handler).route_layer(RequireRole::new("admin")))
//! ```
//!
//! Routes without the layer are unguarded. `admin` satisfies a `moderator`
//! requirement; every other role name is an exact match.

use std::task::{Context, Poll};

use axum::{body::Body, http::Request, http::StatusCode, response::Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::auth::identity::Identity;
use crate::http::response::json_message;

/// Role required to reach the wrapped route.
#[derive(Clone, Copy, Debug)]
pub struct RequireRole {
    role: &'static str,
}

impl RequireRole {
    pub fn new(role: &'static str) -> Self {
        Self { role }
    }
}

/// `admin` is a superset of `moderator`; all other roles are peers.
pub(crate) fn role_allows(required: &str, actual: &str) -> bool {
    match required {
        "admin" => actual == "admin",
        "moderator" => actual == "moderator" || actual == "admin",
        other => actual == other,
    }
}

impl<S> Layer<S> for RequireRole {
    type Service = RequireRoleService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireRoleService {
            inner,
            role: self.role,
        }
    }
}

#[derive(Clone)]
pub struct RequireRoleService<S> {
    inner: S,
    role: &'static str,
}

impl<S> Service<Request<Body>> for RequireRoleService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let allowed = request
            .extensions()
            .get::<Identity>()
            .map(|identity| role_allows(self.role, &identity.role))
            .unwrap_or(false);

        if allowed {
            Box::pin(self.inner.call(request))
        } else {
            let response =
                json_message(StatusCode::FORBIDDEN, "Forbidden: insufficient privileges");
            Box::pin(std::future::ready(Ok(response)))
        }
    }
}
