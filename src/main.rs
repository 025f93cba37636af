use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use leak_watch_service::{
    api::{self, AppState},
    config::Config,
    db,
    ingest::{IngestService, ListLimits},
    server,
    store::PgReadingStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; variables may come from the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!(error = ?e, "Fatal startup error");
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    info!(app_env = ?config.app_env, "Configuration loaded");

    // No traffic is accepted without a working database.
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;
    info!("Database ready");

    let service = IngestService::new(
        Arc::new(PgReadingStore::new(pool)),
        ListLimits {
            max: config.max_list_limit,
            ..ListLimits::default()
        },
    );
    let state = AppState {
        service: Arc::new(service),
        expose_error_details: config.app_env.exposes_error_details(),
    };

    let listener =
        server::bind_with_retry(&config.server_host, config.server_port, config.bind_attempts)
            .await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
