// HTTP surface of the engine
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use shared::models::PriceQuote;

use crate::error::EngineError;

pub mod market_service;

pub use market_service::{IndicatorReport, MarketService, PriceQuery, SeriesQuery};

pub fn router(service: Arc<MarketService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/favicon.ico", get(favicon))
        .route("/api/v1/binance/price", get(get_price))
        .route("/api/v1/binance/chart", get(get_chart))
        .route("/api/v1/binance/indicators", get(get_indicators))
        .with_state(service)
}

async fn root() -> &'static str {
    "Chart engine online"
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// No icon is served; answer without a 404.
async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn get_price(
    State(service): State<Arc<MarketService>>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceQuote>, EngineError> {
    tracing::info!(symbol = ?query.symbol, "Received price request, dispatching to handler.");
    market_service::get_price::handle_get_price(query, service).await
}

async fn get_chart(
    State(service): State<Arc<MarketService>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Response, EngineError> {
    tracing::info!(
        symbol = ?query.symbol,
        interval = ?query.interval,
        limit = ?query.limit,
        "Received chart request, dispatching to handler."
    );
    market_service::get_chart::handle_get_chart(query, service).await
}

async fn get_indicators(
    State(service): State<Arc<MarketService>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<IndicatorReport>, EngineError> {
    tracing::info!(
        symbol = ?query.symbol,
        interval = ?query.interval,
        limit = ?query.limit,
        "Received indicators request, dispatching to handler."
    );
    market_service::get_indicators::handle_get_indicators(query, service).await
}
