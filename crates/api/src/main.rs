use anyhow::Result;
use chrono::Utc;
use std::time::Duration;
use tracing::info;

mod app;
mod config;
mod error;
mod extractors;
mod middleware;
mod routes;
mod services;

/// How often expired refresh sessions are purged.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics();

    info!("Starting Lab Portal API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    spawn_session_sweeper(pool.clone());

    let addr = config.socket_addr();
    let app = app::create_app(config, pool)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically deletes expired refresh sessions so the table does not
/// grow without bound. Revoked-but-unexpired rows are kept until expiry
/// for audit.
fn spawn_session_sweeper(pool: sqlx::PgPool) {
    tokio::spawn(async move {
        let sessions = persistence::repositories::SessionRepository::new(pool);
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.delete_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(deleted = n, "Purged expired sessions"),
                Err(e) => tracing::warn!("Session sweep failed: {}", e),
            }
        }
    });
}
