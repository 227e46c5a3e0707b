//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the gateway pipeline
//! - Wire up middleware: CORS → trace → request ID → timeout → auth filter
//! - Build the shared upstream client (pooled, connect timeout)
//! - Dispatch matched requests to the forwarder
//! - Run with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::Response,
    routing::{any, get},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::filter::auth_filter;
use crate::auth::{RequireRole, TokenValidator};
use crate::config::{ConfigError, GatewayConfig, LimitsConfig, TimeoutConfig};
use crate::http::cors::cors_layer;
use crate::http::forward;
use crate::http::handlers;
use crate::http::request::RequestIdLayer;
use crate::http::response::json_message;
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub validator: Arc<TokenValidator>,
    pub client: Client<HttpConnector, Body>,
    pub timeouts: TimeoutConfig,
    pub limits: LimitsConfig,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the server from a validated configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let table = Arc::new(RouteTable::from_config(&config.upstreams)?);
        let validator = Arc::new(TokenValidator::new(&config.auth.jwt_secret));

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.timeouts.idle_secs))
            .pool_max_idle_per_host(config.client.pool_max_idle_per_host)
            .build(connector);

        let state = AppState {
            table,
            validator,
            client,
            timeouts: config.timeouts.clone(),
            limits: config.limits.clone(),
        };

        Ok(Self {
            router: Self::build_router(&config, state),
        })
    }

    /// Build the Axum router. Layer order is bottom-up: CORS is outermost
    /// so preflight short-circuits before authentication; the auth filter
    /// is innermost so every other layer still applies to rejected
    /// requests.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/test/auth", get(handlers::test_auth))
            .route(
                "/api/test/admin",
                get(handlers::test_admin).route_layer(RequireRole::new("admin")),
            )
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .layer(middleware::from_fn_with_state(state.clone(), auth_filter))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors))
            .with_state(state)
    }

    /// Run the server until the shutdown signal fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all gateway handler: match a route, forward, relay.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let route = match state.table.match_path(&path) {
        Some(route) => route,
        None => {
            tracing::warn!(method = %method, path = %path, "No route matched");
            metrics::record_request(&method, 404, "none", start);
            return json_message(StatusCode::NOT_FOUND, "Not found");
        }
    };

    tracing::debug!(route = route.name, method = %method, path = %path, "Forwarding request");

    let (parts, body) = request.into_parts();
    let response = forward::forward(&state, route, parts, body).await;

    metrics::record_request(&method, response.status().as_u16(), route.name, start);
    response
}
