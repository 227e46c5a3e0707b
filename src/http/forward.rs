//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the client URL onto the matched upstream base
//! - Apply the header allow/deny policy for the upstream hop
//! - Execute the call on the shared pooled client under a deadline
//! - Relay the upstream response; map transport failures to gateway errors
//!
//! # Design Decisions
//! - Bodies are buffered, not streamed: payloads are small JSON documents
//!   and buffering keeps the relay logic byte-exact
//! - Upstream 4xx/5xx are relayed verbatim; 4xx is re-typed as JSON to
//!   preserve the contract the frontend already depends on
//! - Hop-by-hop headers never cross the proxy

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, request::Parts, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::auth::{X_INTERNAL_AUTH, X_ROLE, X_USER};
use crate::http::response::json_body;
use crate::http::server::AppState;
use crate::routing::Route;

/// Connection-scoped headers that must not cross the proxy. `host` is
/// regenerated from the upstream authority, `content-length` from the
/// buffered body.
const HOP_BY_HOP: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.contains(&name)
}

/// Target URL: upstream base + original path with the `/api` prefix
/// stripped + the query string verbatim.
pub fn rewrite_uri(route: &Route, path: &str, query: Option<&str>) -> Option<Uri> {
    let suffix = path.strip_prefix("/api").unwrap_or(path);
    let base = route.upstream.as_str().trim_end_matches('/');
    let mut target = format!("{}{}", base, suffix);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target.parse().ok()
}

/// Header policy for the upstream hop.
///
/// - JSON content type by default; the client's own `Content-Type` (copied
///   below) overrides it
/// - trusted identity headers travel only as injected by the auth filter
/// - `Authorization` is forwarded only where the upstream consumes the raw
///   token (auth and comment routes)
/// - everything else is copied by name, minus hop-by-hop headers
pub fn upstream_headers(route: &Route, incoming: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    for name in [X_USER, X_ROLE, X_INTERNAL_AUTH] {
        if let Some(value) = incoming.get(name) {
            headers.insert(name, value.clone());
        }
    }

    if route.forward_authorization {
        if let Some(value) = incoming.get(header::AUTHORIZATION) {
            headers.insert(header::AUTHORIZATION, value.clone());
        }
    }

    for (name, value) in incoming.iter() {
        let name_str = name.as_str();
        if name_str == "authorization"
            || name_str == X_USER
            || name_str == X_ROLE
            || name_str == X_INTERNAL_AUTH
        {
            continue; // handled above
        }
        if is_hop_by_hop(name_str) || name_str == "content-length" {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }

    headers
}

/// Transport-failure body: `{"error":"Gateway error: <detail>"}`, keyed
/// with `message` on the auth route.
pub fn gateway_error(route: &Route, detail: &str) -> Response {
    json_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        route.error_key.as_str(),
        &format!("Gateway error: {}", detail),
    )
}

/// Forward the request to the matched route's upstream and relay the
/// response.
pub async fn forward(state: &AppState, route: &Route, parts: Parts, body: Body) -> Response {
    // Non-preflight OPTIONS is answered here; CORS already covered the
    // preflight case and the upstreams have nothing to add.
    if parts.method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let body = match to_bytes(body, state.limits.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(route = route.name, error = %e, "Failed to buffer request body");
            return gateway_error(route, "request body too large");
        }
    };

    let uri = match rewrite_uri(route, parts.uri.path(), parts.uri.query()) {
        Some(uri) => uri,
        None => {
            tracing::error!(route = route.name, path = %parts.uri.path(), "URL rewrite failed");
            return gateway_error(route, "invalid upstream URL");
        }
    };

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        *headers = upstream_headers(route, &parts.headers);
    }
    let request = match builder.body(Body::from(body)) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(route = route.name, error = %e, "Failed to build upstream request");
            return gateway_error(route, "failed to build upstream request");
        }
    };

    let deadline = Duration::from_secs(state.timeouts.upstream_secs);
    match tokio::time::timeout(deadline, state.client.request(request)).await {
        Ok(Ok(response)) => relay(state, route, response).await,
        Ok(Err(e)) => {
            tracing::error!(route = route.name, error = %e, "Upstream request failed");
            gateway_error(route, &e.to_string())
        }
        Err(_) => {
            tracing::error!(route = route.name, deadline_secs = deadline.as_secs(), "Upstream call timed out");
            gateway_error(route, "upstream request timed out")
        }
    }
}

/// Relay status, headers, and body bytes back to the client. Upstream 4xx
/// keeps its status and body but always goes out as JSON.
async fn relay(
    state: &AppState,
    route: &Route,
    response: axum::http::Response<hyper::body::Incoming>,
) -> Response {
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(Body::new(body), state.limits.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(route = route.name, error = %e, "Failed to read upstream response");
            return gateway_error(route, "failed to read upstream response");
        }
    };

    let hop_headers: Vec<_> = parts
        .headers
        .keys()
        .filter(|name| is_hop_by_hop(name.as_str()))
        .cloned()
        .collect();
    for name in hop_headers {
        parts.headers.remove(name);
    }
    // recomputed for the buffered body
    parts.headers.remove(header::CONTENT_LENGTH);

    if parts.status.is_client_error() {
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    Response::from_parts(parts, Body::from(bytes)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::routing::RouteTable;

    fn table() -> RouteTable {
        let mut upstreams = UpstreamConfig::default();
        upstreams.auth_service_url = "http://127.0.0.1:3001".to_string();
        upstreams.user_service_url = "http://127.0.0.1:3002".to_string();
        upstreams.comment_service_url = "http://127.0.0.1:5003".to_string();
        RouteTable::from_config(&upstreams).unwrap()
    }

    #[test]
    fn auth_route_rewrites_under_auth_prefix() {
        let table = table();
        let route = table.match_path("/api/auth/login").unwrap();
        let uri = rewrite_uri(route, "/api/auth/login", None).unwrap();
        assert_eq!(uri.to_string(), "http://127.0.0.1:3001/auth/login");
    }

    #[test]
    fn query_string_is_forwarded_verbatim() {
        let table = table();
        let route = table.match_path("/api/users").unwrap();
        let uri = rewrite_uri(route, "/api/users", Some("page=2&status=open")).unwrap();
        assert_eq!(
            uri.to_string(),
            "http://127.0.0.1:3002/users?page=2&status=open"
        );
    }

    #[test]
    fn nested_comments_rewrite_keeps_ticket_segment() {
        let table = table();
        let route = table.match_path("/api/tickets/42/comments").unwrap();
        let uri = rewrite_uri(route, "/api/tickets/42/comments", None).unwrap();
        assert_eq!(uri.to_string(), "http://127.0.0.1:5003/tickets/42/comments");
    }

    #[test]
    fn authorization_forwarded_only_where_consumed() {
        let table = table();
        let mut incoming = HeaderMap::new();
        incoming.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        incoming.insert(X_USER, HeaderValue::from_static("7"));
        incoming.insert(X_ROLE, HeaderValue::from_static("admin"));
        incoming.insert(X_INTERNAL_AUTH, HeaderValue::from_static("true"));

        let users = table.match_path("/api/users/me").unwrap();
        let headers = upstream_headers(users, &incoming);
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(headers.get(X_USER).unwrap(), "7");
        assert_eq!(headers.get(X_INTERNAL_AUTH).unwrap(), "true");

        let comments = table.match_path("/api/comments").unwrap();
        let headers = upstream_headers(comments, &incoming);
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer t");
    }

    #[test]
    fn hop_by_hop_headers_are_stripped() {
        let table = table();
        let route = table.match_path("/api/tickets/1").unwrap();
        let mut incoming = HeaderMap::new();
        incoming.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        incoming.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        incoming.insert(header::HOST, HeaderValue::from_static("gateway:8080"));
        incoming.insert("x-custom", HeaderValue::from_static("kept"));

        let headers = upstream_headers(route, &incoming);
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        assert!(headers.get(header::HOST).is_none());
        assert_eq!(headers.get("x-custom").unwrap(), "kept");
    }

    #[test]
    fn client_content_type_overrides_default() {
        let table = table();
        let route = table.match_path("/api/tickets/1").unwrap();

        let headers = upstream_headers(route, &HeaderMap::new());
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");

        let mut incoming = HeaderMap::new();
        incoming.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        let headers = upstream_headers(route, &incoming);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
