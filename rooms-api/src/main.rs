use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use rooms_api::{app, AppState};
use rooms_store::{app_config::Config, scraper, DbClient, SqliteReservationRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rooms_api=debug,rooms_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting room reservation API on port {}", config.server.port);

    let db = DbClient::from_config(&config.database)
        .await
        .context("Failed to open database")?;

    // Keep serving even without a schema; queries will report a database error.
    if let Err(e) = db.migrate().await {
        tracing::error!("Error creating reservations table: {}", e);
    }

    let app_state = AppState {
        reservations: Arc::new(SqliteReservationRepository::new(db.pool.clone())),
        ingestion: scraper::build_trigger(&config.ingestion),
        assets_dir: PathBuf::from(&config.assets.dir),
    };

    let app = app(app_state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
