use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use edge_enrich::{app, config::Config, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edge_enrich=info".parse()?),
        )
        .init();

    info!("Starting edge enrichment service");

    // Load configuration from environment
    let config = Config::from_env()?;

    let state = Arc::new(AppState::default());
    let router = app(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
