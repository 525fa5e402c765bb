use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pongstats::{app_router, AppState, Config, InMemoryStore, PostgresStore};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pongstats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    info!("Starting beer pong stats server");

    // Same services either way; only the store behind them changes
    let app_state = match &config.database_url {
        Some(url) => {
            let store = Arc::new(PostgresStore::connect(url).await?);
            if config.run_migrations {
                store.migrate().await?;
            }
            AppState::from_store(store)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store");
            AppState::from_store(Arc::new(InMemoryStore::new()))
        }
    };

    // Pick up a game left active by a previous run
    app_state.tracker.lock().await.rehydrate().await?;

    let app = app_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
