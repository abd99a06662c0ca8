use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charity_portal::config::Config;
use charity_portal::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charity_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting charity-portal...");

    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    let state = AppState::new(config).await?;
    tracing::info!("Database initialized");

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
