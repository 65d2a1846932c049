// Handler for the indicators endpoint: the chart's numbers as JSON
use std::sync::Arc;

use axum::Json;

use super::helpers::{resolve_series_request, SeriesQuery};
use super::{IndicatorReport, MarketService};
use crate::error::EngineError;

pub async fn handle_get_indicators(query: SeriesQuery, service: Arc<MarketService>) -> Result<Json<IndicatorReport>, EngineError> {
    let request = resolve_series_request(&query, service.defaults())?;
    tracing::debug!(
        symbol = %request.symbol.canonical(),
        interval = %request.timeframe,
        limit = request.limit,
        "Handling indicators request"
    );

    let report = service.indicators(&request).await?;
    Ok(Json(report))
}
