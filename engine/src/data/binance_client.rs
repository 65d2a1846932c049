// HTTP client for the upstream candle source (Binance public REST API)
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{CandleSeries, PriceQuote, TimeFrame};
use shared::symbol::Symbol;

use super::klines::{parse_rows, TickerPrice};
use crate::config::UpstreamSettings;
use crate::error::EngineError;

const KLINES_PATH: &str = "/api/v3/klines";
const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";

/// One client per process; every call is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    http: Client,
    base_url: String,
}

impl MarketDataClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, EngineError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches up to `limit` candles. An empty answer is `NoData`, any failure
    /// of the call itself is `Upstream`. No retries.
    pub async fn fetch_candles(&self, symbol: &Symbol, timeframe: TimeFrame, limit: u32) -> Result<CandleSeries, EngineError> {
        if symbol.is_empty() {
            return Err(EngineError::missing_symbol());
        }

        let limit = limit.to_string();
        let query = [
            ("symbol", symbol.canonical()),
            ("interval", timeframe.as_str()),
            ("limit", limit.as_str()),
        ];
        let rows: Vec<Vec<Value>> = self.get_json(KLINES_PATH, &query).await?;

        if rows.is_empty() {
            tracing::warn!(symbol = %symbol.canonical(), interval = %timeframe, "Upstream returned no candles");
            return Err(EngineError::NoData {
                symbol: symbol.display().to_string(),
                interval: timeframe.to_string(),
            });
        }

        let candles = parse_rows(&rows)?;
        tracing::debug!(symbol = %symbol.canonical(), interval = %timeframe, count = candles.len(), "Fetched candles");
        Ok(CandleSeries::new(symbol.clone(), timeframe, candles))
    }

    pub async fn fetch_price(&self, symbol: &Symbol) -> Result<PriceQuote, EngineError> {
        if symbol.is_empty() {
            return Err(EngineError::missing_symbol());
        }

        let ticker: TickerPrice = self.get_json(TICKER_PRICE_PATH, &[("symbol", symbol.canonical())]).await?;
        let price = ticker.price()?;
        Ok(PriceQuote { symbol: ticker.symbol, price })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, EngineError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, timeout = e.is_timeout(), "Request to upstream failed");
            EngineError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown upstream error".to_string());
            tracing::error!(url = %url, status = status.as_u16(), detail = %detail, "Upstream returned an error status");
            return Err(EngineError::Upstream {
                status: Some(status.as_u16()),
                detail,
                timeout: false,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
