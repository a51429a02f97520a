use anyhow::{Context, Result};
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{error, info};

use ticket_stats_core::app_state::build_app_state;
use ticket_stats_core::config::AppConfig;
use ticket_stats_core::debug::run_debug;
use ticket_stats_core::logging::init_logging;
use ticket_stats_core::routes::app_router;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _log_guard = init_logging(config.log_dir.as_deref());

    let state = build_app_state(&config);

    if config.debug_mode {
        if let Err(e) = run_debug(&state, Utc::now()).await {
            error!("Debug seeding failed: {:?}", e);
        }
    }

    let app = app_router().with_state(state);
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("🚀 Ticket stats server listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
