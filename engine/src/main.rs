// Engine main entry point
use std::sync::Arc;

use anyhow::Context;
use engine::config::EngineSettings;
use engine::services::{self, MarketService};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting chart engine...");

    let settings = EngineSettings::load()?;
    let addr = settings.bind_addr();
    info!(
        upstream = %settings.upstream.base_url,
        timeout_secs = settings.upstream.timeout_secs,
        "Engine will listen on {}",
        addr
    );

    let service = Arc::new(MarketService::new(&settings)?);
    let app = services::router(service);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
