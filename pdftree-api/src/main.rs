use anyhow::Result;
use pdftree_api::{app_with_config, ApiConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdftree=info,pdftree_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let app = app_with_config(&config);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;

    info!(max_depth = config.max_depth, "pdftree API listening on http://{}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
