//! PostgreSQL parameter advisor - HTTP service
//!
//! Serves recommendations, the hardware catalog and CSV exports, and
//! records every successful recommendation to the configured audit sink.

use advisor_lib::{
    health::{components, HealthRegistry},
    observability::{AdvisorMetrics, StructuredLogger},
    Advisor,
};
use advisor_server::{api, config::AdvisorConfig};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const ADVISOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting advisor-server");

    let config = AdvisorConfig::load()?;
    info!(
        instance = %config.instance_name,
        port = config.api_port,
        allow_custom_sizes = config.allow_custom_sizes,
        "Advisor configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::AUDIT_SINK).await;

    let metrics = AdvisorMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    let sink = config.audit_sink()?;
    logger.log_startup(ADVISOR_VERSION, sink.name());

    let mut advisor = Advisor::new(logger.clone()).with_audit_sink(sink);
    if config.allow_custom_sizes {
        advisor = advisor.allow_custom_sizes();
    }

    let app_state = Arc::new(api::AppState::new(health_registry.clone(), metrics, advisor));

    health_registry.set_ready(true).await;

    tokio::select! {
        result = api::serve(config.api_port, app_state) => {
            if let Err(e) = &result {
                error!(error = %e, "API server stopped");
            }
            logger.log_shutdown("server exited");
            result
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
            info!("Shutting down");
            Ok(())
        }
    }
}
