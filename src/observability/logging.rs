//! Structured logging.
//!
//! Uses the tracing crate; `RUST_LOG` wins over the configured level so an
//! operator can turn on debug output without touching config.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize the tracing subscriber. Call once at startup.
pub fn init_logging(config: &ObservabilityConfig) {
    let default_filter = format!("api_gateway={},tower_http=info", config.log_level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
