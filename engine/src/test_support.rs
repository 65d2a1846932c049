// Fixtures shared by the engine's unit tests: synthetic candles and an
// in-process fake of the upstream REST API.
use std::collections::HashMap;
use std::time::Duration as StdDuration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use shared::models::Candle;

pub const FIRST_OPEN_MS: i64 = 1_709_251_200_000; // 2024-03-01 00:00 UTC
const HOUR_MS: i64 = 3_600_000;

/// Hourly candles starting 2024-03-01 00:00 UTC with the given closes.
pub fn hourly_candles(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open_time = start + Duration::hours(i as i64);
            Candle {
                open_time,
                close_time: open_time + Duration::hours(1) - Duration::milliseconds(1),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10.0 + i as f64,
            }
        })
        .collect()
}

/// Kline rows in upstream wire form, closes rising by 1.0 per hour.
pub fn kline_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let open_time = FIRST_OPEN_MS + i as i64 * HOUR_MS;
            let close = 100.0 + i as f64;
            json!([
                open_time,
                format!("{:.8}", close - 0.5),
                format!("{:.8}", close + 1.0),
                format!("{:.8}", close - 1.0),
                format!("{:.8}", close),
                format!("{:.8}", 1000.0 + i as f64),
                open_time + HOUR_MS - 1,
                "0",
                42,
                "0",
                "0",
                "0"
            ])
        })
        .collect()
}

async fn klines(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let symbol = params.get("symbol").cloned().unwrap_or_default();
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(500);
    match symbol.as_str() {
        "EMPTYUSDT" => (StatusCode::OK, Json(json!([]))),
        "SLOWUSDT" => {
            tokio::time::sleep(StdDuration::from_secs(3)).await;
            (StatusCode::OK, Json(Value::Array(kline_rows(limit))))
        }
        "BROKENUSDT" => (StatusCode::OK, Json(json!([[1, "x"]]))),
        "NOPE" => (StatusCode::BAD_REQUEST, Json(json!({ "code": -1121, "msg": "Invalid symbol." }))),
        _ => (StatusCode::OK, Json(Value::Array(kline_rows(limit)))),
    }
}

async fn ticker_price(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let symbol = params.get("symbol").cloned().unwrap_or_default();
    if symbol == "NOPE" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "code": -1121, "msg": "Invalid symbol." })));
    }
    (StatusCode::OK, Json(json!({ "symbol": symbol, "price": "0.67210000" })))
}

pub fn fake_upstream() -> Router {
    Router::new()
        .route("/api/v3/klines", get(klines))
        .route("/api/v3/ticker/price", get(ticker_price))
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
