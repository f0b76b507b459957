use anyhow::Context;
use tracing_subscriber::EnvFilter;

use jobboard_web::config::{AppConfig, BACKEND_ANON_KEY_VAR, BACKEND_URL_VAR};
use jobboard_web::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, SUPABASE_ANON_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("Starting job board web in {:?} mode", config.environment);

    if config.backend.url.is_none() || config.backend.anon_key.is_none() {
        tracing::warn!(
            "{} or {} is not set; /api/test-connection will report the missing value",
            BACKEND_URL_VAR,
            BACKEND_ANON_KEY_VAR
        );
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let app = build_router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
