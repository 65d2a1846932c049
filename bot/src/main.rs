// Bot main entry point
use std::sync::Arc;

use anyhow::Context;
use bot::commands::CommandRouter;
use bot::config::BotSettings;
use bot::services::{webhook, EngineClient};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting chart bot...");

    let settings = BotSettings::load()?;
    let addr = settings.bind_addr();
    info!(engine = %settings.engine_url, "Bot will listen on {}", addr);

    let client = EngineClient::new(&settings)?;
    let app = webhook::router(Arc::new(CommandRouter::new(client)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
