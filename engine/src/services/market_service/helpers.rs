// Request parsing helpers for the market service handlers
use serde::Deserialize;
use shared::models::TimeFrame;
use shared::symbol::Symbol;

use crate::config::RequestDefaults;
use crate::error::EngineError;

/// Raw query parameters for series endpoints. Kept as strings so bad values
/// surface as structured input errors instead of extractor rejections.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SeriesQuery {
    pub symbol: Option<String>,
    pub interval: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PriceQuery {
    pub symbol: Option<String>,
}

/// A validated request for one window of candles.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    pub symbol: Symbol,
    pub timeframe: TimeFrame,
    pub limit: u32,
}

/// Applies defaults for absent parameters. A present but blank symbol is a
/// missing symbol, not a request for the default pair.
pub fn resolve_series_request(query: &SeriesQuery, defaults: &RequestDefaults) -> Result<SeriesRequest, EngineError> {
    let symbol = Symbol::parse(query.symbol.as_deref().unwrap_or(&defaults.symbol));
    if symbol.is_empty() {
        return Err(EngineError::missing_symbol());
    }

    let interval = query.interval.as_deref().unwrap_or(&defaults.interval);
    let timeframe: TimeFrame = interval.parse().map_err(EngineError::InvalidInput)?;

    let limit = match query.limit.as_deref() {
        Some(raw) => parse_limit(raw, defaults.max_limit)?,
        None => defaults.limit,
    };

    Ok(SeriesRequest { symbol, timeframe, limit })
}

pub fn resolve_price_symbol(query: &PriceQuery) -> Result<Symbol, EngineError> {
    let symbol = Symbol::parse(query.symbol.as_deref().unwrap_or_default());
    if symbol.is_empty() {
        return Err(EngineError::missing_symbol());
    }
    Ok(symbol)
}

pub fn parse_limit(raw: &str, max_limit: u32) -> Result<u32, EngineError> {
    let limit: u32 = raw
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidInput(format!("'limit' must be a positive integer, got '{}'", raw)))?;
    if limit == 0 || limit > max_limit {
        return Err(EngineError::InvalidInput(format!("'limit' must be between 1 and {}, got {}", max_limit, limit)));
    }
    Ok(limit)
}
