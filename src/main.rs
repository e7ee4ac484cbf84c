use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::info;

use item_service::api::{RequestSafetyConfig, create_router_with_safety};
use item_service::app::AppState;
use item_service::infra::{PostgresItemStore, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    init_tracing();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let port = env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());
    let safety_config = RequestSafetyConfig::from_env();

    // Connect and bring the schema up to date before serving traffic
    let store = PostgresItemStore::with_defaults(&database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    store
        .run_migrations()
        .await
        .context("Failed to run migrations")?;

    let app_state = Arc::new(AppState::new(Arc::new(store)));
    let router = create_router_with_safety(app_state, safety_config);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server starting on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
