// Handler for the chart endpoint
use std::sync::Arc;

use axum::http::header;
use axum::response::{IntoResponse, Response};

use super::helpers::{resolve_series_request, SeriesQuery};
use super::MarketService;
use crate::chart::ChartArtifact;
use crate::error::EngineError;

pub async fn handle_get_chart(query: SeriesQuery, service: Arc<MarketService>) -> Result<Response, EngineError> {
    let request = resolve_series_request(&query, service.defaults())?;
    tracing::debug!(
        symbol = %request.symbol.canonical(),
        interval = %request.timeframe,
        limit = request.limit,
        "Handling chart request"
    );

    let artifact = service.chart(&request).await?;
    Ok(([(header::CONTENT_TYPE, ChartArtifact::CONTENT_TYPE)], artifact.into_bytes()).into_response())
}
