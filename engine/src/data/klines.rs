// Kline rows as returned by the upstream source:
// [open_time_ms, open, high, low, close, volume, close_time_ms, ...ignored]
// Prices and volume arrive as decimal strings; plain numbers are accepted too.
use serde::Deserialize;
use serde_json::Value;
use shared::models::Candle;
use shared::utils::datetime_from_millis;

use crate::error::EngineError;

const MIN_ROW_LEN: usize = 7;

/// Ticker response, e.g. `{"symbol":"XRPEUR","price":"0.67210000"}`.
#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: Value,
}

impl TickerPrice {
    pub fn price(&self) -> Result<f64, EngineError> {
        value_as_f64(&self.price).ok_or_else(|| malformed(format!("price {} is not a number", self.price)))
    }
}

fn malformed(detail: String) -> EngineError {
    EngineError::Upstream {
        status: None,
        detail: format!("Malformed upstream payload: {}", detail),
        timeout: false,
    }
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn value_as_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn parse_row(index: usize, row: &[Value]) -> Result<Candle, EngineError> {
    if row.len() < MIN_ROW_LEN {
        return Err(malformed(format!("row {} has {} fields, expected at least {}", index, row.len(), MIN_ROW_LEN)));
    }

    let time = |pos: usize, field: &str| {
        value_as_millis(&row[pos])
            .and_then(datetime_from_millis)
            .ok_or_else(|| malformed(format!("row {} has an invalid {}: {}", index, field, row[pos])))
    };
    let number = |pos: usize, field: &str| {
        value_as_f64(&row[pos]).ok_or_else(|| malformed(format!("row {} has an invalid {}: {}", index, field, row[pos])))
    };

    Ok(Candle {
        open_time: time(0, "open time")?,
        open: number(1, "open")?,
        high: number(2, "high")?,
        low: number(3, "low")?,
        close: number(4, "close")?,
        volume: number(5, "volume")?,
        close_time: time(6, "close time")?,
    })
}

pub fn parse_rows(rows: &[Vec<Value>]) -> Result<Vec<Candle>, EngineError> {
    rows.iter().enumerate().map(|(i, row)| parse_row(i, row)).collect()
}
