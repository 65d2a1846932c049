// Handler for the price endpoint
use std::sync::Arc;

use axum::Json;
use shared::models::PriceQuote;

use super::helpers::{resolve_price_symbol, PriceQuery};
use super::MarketService;
use crate::error::EngineError;

pub async fn handle_get_price(query: PriceQuery, service: Arc<MarketService>) -> Result<Json<PriceQuote>, EngineError> {
    let symbol = resolve_price_symbol(&query)?;
    tracing::debug!(symbol = %symbol.canonical(), "Handling price request");
    let quote = service.price(&symbol).await?;
    Ok(Json(quote))
}
