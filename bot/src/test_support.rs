// Fixtures for the bot's unit tests: an in-memory backend and a fake engine.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use shared::models::PriceQuote;
use shared::symbol::Symbol;

use crate::commands::EngineBackend;
use crate::error::ClientError;

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-chart";

/// Knows every symbol except FOOBAR and records chart requests.
#[derive(Clone, Default)]
pub struct FakeBackend {
    chart_calls: Arc<Mutex<Vec<(String, String, u32)>>>,
}

impl FakeBackend {
    pub fn chart_calls(&self) -> Vec<(String, String, u32)> {
        self.chart_calls.lock().unwrap().clone()
    }
}

fn no_data(symbol: &Symbol) -> ClientError {
    ClientError::Engine {
        status: 404,
        message: format!("No data for {} (1h)", symbol.display()),
    }
}

impl EngineBackend for FakeBackend {
    async fn price(&self, symbol: &Symbol) -> Result<PriceQuote, ClientError> {
        if symbol.canonical() == "FOOBAR" {
            return Err(no_data(symbol));
        }
        Ok(PriceQuote { symbol: symbol.canonical().to_string(), price: 0.6721 })
    }

    async fn chart(&self, symbol: &Symbol, interval: &str, limit: u32) -> Result<Vec<u8>, ClientError> {
        self.chart_calls
            .lock()
            .unwrap()
            .push((symbol.canonical().to_string(), interval.to_string(), limit));
        if symbol.canonical() == "FOOBAR" {
            return Err(no_data(symbol));
        }
        Ok(FAKE_PNG.to_vec())
    }
}

async fn price(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("symbol").map(String::as_str) {
        Some("FOOBAR") => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": "Binance response",
                "kind": "upstream_failure",
                "status": 400,
                "detail": "{\"code\":-1121,\"msg\":\"Invalid symbol.\"}"
            })),
        )
            .into_response(),
        Some(symbol) => Json(json!({ "symbol": symbol, "price": 64123.5 })).into_response(),
        None => (StatusCode::BAD_REQUEST, "plain text failure").into_response(),
    }
}

async fn chart(Query(params): Query<HashMap<String, String>>) -> Response {
    let symbol = params.get("symbol").cloned().unwrap_or_default();
    if symbol == "FOOBAR" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No data for FOOBAR (1h)", "kind": "no_data" })),
        )
            .into_response();
    }
    let tag = format!(
        "{}|{}|{}",
        symbol,
        params.get("interval").cloned().unwrap_or_default(),
        params.get("limit").cloned().unwrap_or_default()
    );
    let mut body = FAKE_PNG.to_vec();
    body.extend_from_slice(tag.as_bytes());
    ([(header::CONTENT_TYPE, "image/png")], body).into_response()
}

/// Answers like the engine's price and chart endpoints. Chart bodies end with
/// the received `symbol|interval|limit` so tests can check what was asked.
pub fn fake_engine() -> Router {
    Router::new()
        .route("/api/v1/binance/price", get(price))
        .route("/api/v1/binance/chart", get(chart))
}

pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
