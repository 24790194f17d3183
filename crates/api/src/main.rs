//! Chatline API server entrypoint

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatline_api::{auth::SessionStore, routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Failure to reach either store at startup is the one fatal condition
    let pool =
        chatline_shared::db::create_pool(&config.database_url, config.database_max_connections)
            .await?;
    chatline_shared::db::run_migrations(&pool).await?;
    tracing::info!("database ready");

    let sessions = SessionStore::connect(&config.redis_url).await?;
    tracing::info!("session backend ready");

    let state = AppState::new(config, pool, sessions)?;
    let app = routes::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&state.config.bind_address).await?;
    tracing::info!(addr = %state.config.bind_address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.pool.close().await;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
