use anyhow::Context;

use revalidate_api::{app::app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up REVALIDATION_SECRET etc.
    let _ = dotenvy::dotenv();

    revalidate_api::init_tracing("info,tower_http=debug");

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Revalidate API in {:?} mode", config.environment);
    tracing::info!(
        locales = ?config.revalidate.locales,
        "Serving {} locale(s)",
        config.revalidate.locales.as_slice().len()
    );

    let state = AppState::from_config(&config).context("failed to build invalidation backend")?;
    let app = app(state, &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Revalidate API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
