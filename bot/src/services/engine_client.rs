// HTTP client for the chart engine
use reqwest::{Client, Response};
use serde::Deserialize;
use shared::models::PriceQuote;
use shared::symbol::Symbol;

use crate::commands::EngineBackend;
use crate::config::BotSettings;
use crate::error::ClientError;

const PRICE_PATH: &str = "/api/v1/binance/price";
const CHART_PATH: &str = "/api/v1/binance/chart";

/// Error body the engine sends with every failed response.
#[derive(Debug, Deserialize)]
struct EngineErrorBody {
    error: String,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EngineClient {
    http: Client,
    base_url: String,
}

impl EngineClient {
    pub fn new(settings: &BotSettings) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: settings.engine_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Request to engine failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<EngineErrorBody>(&raw) {
            Ok(EngineErrorBody { error, detail: Some(detail) }) => format!("{} ({})", error, detail),
            Ok(EngineErrorBody { error, detail: None }) => error,
            Err(_) if !raw.trim().is_empty() => raw.trim().to_string(),
            Err(_) => status.canonical_reason().unwrap_or("Engine error").to_string(),
        };
        tracing::warn!(url = %url, status = status.as_u16(), message = %message, "Engine returned an error");
        Err(ClientError::Engine { status: status.as_u16(), message })
    }
}

impl EngineBackend for EngineClient {
    async fn price(&self, symbol: &Symbol) -> Result<PriceQuote, ClientError> {
        let response = self.get(PRICE_PATH, &[("symbol", symbol.canonical())]).await?;
        Ok(response.json::<PriceQuote>().await?)
    }

    async fn chart(&self, symbol: &Symbol, interval: &str, limit: u32) -> Result<Vec<u8>, ClientError> {
        let limit = limit.to_string();
        let query = [
            ("symbol", symbol.canonical()),
            ("interval", interval),
            ("limit", limit.as_str()),
        ];
        let response = self.get(CHART_PATH, &query).await?;
        let png = response.bytes().await?;
        tracing::debug!(symbol = %symbol.canonical(), bytes = png.len(), "Received chart");
        Ok(png.to_vec())
    }
}
