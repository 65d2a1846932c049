// engine/src/services/market_service/mod.rs
// The pull-compute-render pipeline behind the HTTP endpoints. Each call owns
// its candles from fetch to response; nothing is cached between requests.
use serde::Serialize;
use shared::models::{CandleSeries, IndicatorSeries, PriceQuote};
use shared::symbol::Symbol;

use crate::chart::{self, ChartArtifact, ChartStyle};
use crate::config::{EngineSettings, RequestDefaults};
use crate::data::MarketDataClient;
use crate::error::EngineError;
use crate::indicators;

pub mod get_chart;
pub mod get_indicators;
pub mod get_price;
pub mod helpers;

pub use helpers::{PriceQuery, SeriesQuery, SeriesRequest};

pub struct MarketService {
    client: MarketDataClient,
    defaults: RequestDefaults,
    style: ChartStyle,
}

/// Indicator values aligned with the candles they were computed from.
#[derive(Debug, Serialize)]
pub struct IndicatorReport {
    pub symbol: String,
    pub interval: String,
    pub open_times: Vec<i64>,
    pub close: Vec<f64>,
    pub rsi: IndicatorSeries,
    pub ema20: IndicatorSeries,
    pub ema50: IndicatorSeries,
}

impl MarketService {
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        Ok(MarketService {
            client: MarketDataClient::new(&settings.upstream)?,
            defaults: settings.defaults.clone(),
            style: ChartStyle::from(&settings.chart),
        })
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    pub async fn price(&self, symbol: &Symbol) -> Result<PriceQuote, EngineError> {
        self.client.fetch_price(symbol).await
    }

    pub async fn candles(&self, request: &SeriesRequest) -> Result<CandleSeries, EngineError> {
        self.client
            .fetch_candles(&request.symbol, request.timeframe, request.limit)
            .await
    }

    pub async fn indicators(&self, request: &SeriesRequest) -> Result<IndicatorReport, EngineError> {
        let series = self.candles(request).await?;
        let set = indicators::compute(series.candles());
        Ok(IndicatorReport {
            symbol: series.symbol.canonical().to_string(),
            interval: series.timeframe.to_string(),
            open_times: series.candles().iter().map(|c| c.open_time.timestamp_millis()).collect(),
            close: series.closes(),
            rsi: set.rsi,
            ema20: set.ema20,
            ema50: set.ema50,
        })
    }

    /// Fetches candles, then computes and renders on the blocking pool.
    /// If the caller goes away the render still runs to completion and its
    /// buffers are dropped with the task.
    pub async fn chart(&self, request: &SeriesRequest) -> Result<ChartArtifact, EngineError> {
        let series = self.candles(request).await?;
        let style = self.style;

        let artifact = tokio::task::spawn_blocking(move || {
            let set = indicators::compute(series.candles());
            chart::render(&series, &set, &style)
        })
        .await
        .map_err(|e| EngineError::Internal(format!("Chart task failed: {}", e)))??;

        tracing::info!(
            symbol = %request.symbol.canonical(),
            interval = %request.timeframe,
            bytes = artifact.len(),
            "Chart ready"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamSettings;
    use crate::test_support::{fake_upstream, spawn_server};
    use shared::models::TimeFrame;

    async fn service() -> MarketService {
        let settings = EngineSettings {
            upstream: UpstreamSettings { base_url: spawn_server(fake_upstream()).await, timeout_secs: 5 },
            ..EngineSettings::default()
        };
        MarketService::new(&settings).unwrap()
    }

    fn request(symbol: &str, limit: u32) -> SeriesRequest {
        SeriesRequest { symbol: Symbol::parse(symbol), timeframe: TimeFrame::Hour1, limit }
    }

    #[tokio::test]
    async fn test_rising_market_pipeline() {
        // The fake source serves 100 hourly candles with strictly rising closes.
        let report = service().await.indicators(&request("BTCUSDT", 100)).await.unwrap();
        assert_eq!(report.open_times.len(), 100);
        assert_eq!(report.rsi.len(), 100);
        assert!(report.rsi.values[..14].iter().all(|v| v.is_none()));
        assert!(report.rsi.values[14..].iter().all(|v| *v == Some(100.0)));
        assert_eq!(report.ema20.get(0), Some(report.close[0]));
        assert_eq!(report.ema50.get(0), Some(report.close[0]));
    }

    #[tokio::test]
    async fn test_chart_pipeline_produces_png() {
        let artifact = service().await.chart(&request("ETH/USDT", 100)).await.unwrap();
        assert!(artifact.as_bytes().starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn test_single_candle_chart() {
        let artifact = service().await.chart(&request("BTCUSDT", 1)).await.unwrap();
        assert!(!artifact.is_empty());
    }

    #[tokio::test]
    async fn test_no_data_is_reported() {
        let err = service().await.chart(&request("EMPTYUSDT", 100)).await.unwrap_err();
        assert!(matches!(err, EngineError::NoData { .. }));
    }

    #[tokio::test]
    async fn test_malformed_rows_are_upstream_failures() {
        let err = service().await.chart(&request("BROKENUSDT", 100)).await.unwrap_err();
        assert!(matches!(err, EngineError::Upstream { status: None, .. }));
    }
}
