//! API gateway entry point.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 API GATEWAY                   │
//!                    │                                               │
//!   Client Request   │  ┌──────┐   ┌─────────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│ CORS │──▶│ auth filter │──▶│  routing  │  │
//!                    │  └──────┘   └─────────────┘   └─────┬─────┘  │
//!                    │   preflight    401 on bad           │        │
//!                    │   answered     or forged            ▼        │
//!                    │   here         credentials   ┌───────────┐   │     auth-service
//!   Client Response  │                              │ forwarder │◀──┼──▶  user-service
//!   ◀────────────────┼──────────────────────────────┤           │   │     ticket-service
//!                    │   relay status/headers/body  └───────────┘   │     comment-api
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::Path;

use tokio::net::TcpListener;

use api_gateway::config::loader::load_config;
use api_gateway::observability::{logging, metrics};
use api_gateway::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("GATEWAY_CONFIG").ok();
    let config = load_config(config_path.as_deref().map(Path::new))?;

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        auth_service = %config.upstreams.auth_service_url,
        user_service = %config.upstreams.user_service_url,
        ticket_service = %config.upstreams.ticket_service_url,
        comment_service = %config.upstreams.comment_service_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
