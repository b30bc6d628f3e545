use std::sync::Arc;

use anyhow::Result;
use bainian_config::AppConfig;
use bainian_server::{app, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let port = config.port;
    let default_model = config.default_model.clone();

    let state = Arc::new(AppState::from_config(config)?);
    let app = app(state);

    let addr = format!("0.0.0.0:{}", port);
    info!("🐍 拜年助手 starting on {} (default model: {})", addr, default_model);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
