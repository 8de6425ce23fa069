use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use edurapor::edurapor_config::{DatabaseConfig, ServerConfig};
use edurapor::edurapor_db::{init_db_pool, run_migrations};
use edurapor::logging::{init_basic_console_logging, init_tracing, shutdown_tracer};
use edurapor::metrics::{init_metrics, is_observability_enabled, metrics_app};
use edurapor::router::init_router;
use edurapor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    if is_observability_enabled() {
        init_tracing()?;
    } else {
        init_basic_console_logging();
    }

    let server_config = ServerConfig::from_env();
    let db_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;

    let db = init_db_pool(&db_config)
        .await
        .context("Failed to connect to database")?;

    if server_config.run_migrations {
        run_migrations(&db).await?;
    }

    let state = AppState::from_env(db);
    if state.rate_limiter.is_none() {
        warn!("Rate limiting is disabled");
    }

    if let Some(handle) = init_metrics()? {
        let metrics_addr = format!("{}:{}", server_config.host, server_config.metrics_port);
        let listener = tokio::net::TcpListener::bind(&metrics_addr).await?;
        info!(address = %metrics_addr, "Metrics server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                warn!(error = %e, "Metrics server stopped");
            }
        });
    }

    let app = init_router(state);
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(address = %address, "Server running");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
