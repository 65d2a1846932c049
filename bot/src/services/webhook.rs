// Webhook surface of the bot: one chat message in, one reply out
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::commands::{CommandRouter, EngineBackend, Reply};

pub const CAPTION_HEADER: &str = "x-caption";

#[derive(Debug, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TextReply {
    pub reply: String,
}

pub fn router<B: EngineBackend>(commands: Arc<CommandRouter<B>>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook", post(webhook::<B>))
        .with_state(commands)
}

async fn root() -> &'static str {
    "Chart bot online"
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Header values must be visible ASCII, so anything else in the caption is
/// written as a `\u{..}` escape and the pair stays recognizable.
fn caption_header(caption: &str) -> HeaderValue {
    HeaderValue::from_str(caption)
        .or_else(|_| HeaderValue::from_str(&caption.escape_default().to_string()))
        .unwrap_or_else(|_| HeaderValue::from_static("chart"))
}

async fn webhook<B: EngineBackend>(State(commands): State<Arc<CommandRouter<B>>>, body: Bytes) -> Response {
    let incoming: IncomingMessage = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Malformed webhook body, treating as empty message");
        IncomingMessage::default()
    });
    tracing::info!(message = %incoming.message, "Received chat message, dispatching to command router.");

    match commands.handle(&incoming.message).await {
        Reply::Text(reply) => Json(TextReply { reply }).into_response(),
        Reply::Photo { png, caption } => {
            (
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
                    (HeaderName::from_static(CAPTION_HEADER), caption_header(&caption)),
                ],
                png,
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::USAGE;
    use crate::test_support::{spawn_server, FakeBackend, FAKE_PNG};
    use serde_json::Value;

    async fn bot() -> String {
        spawn_server(router(Arc::new(CommandRouter::new(FakeBackend::default())))).await
    }

    async fn post_raw(base: &str, body: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/webhook", base))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_text_reply() {
        let base = bot().await;
        let response = post_raw(&base, r#"{"message": "/price XRP-EUR"}"#).await;
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "reply": "XRP-EUR: 0.6721" }));
    }

    #[tokio::test]
    async fn test_photo_reply() {
        let base = bot().await;
        let response = post_raw(&base, r#"{"message": "/chart btc/usdt"}"#).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[reqwest::header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[CAPTION_HEADER], "btc/usdt (1h)");
        assert_eq!(response.bytes().await.unwrap().as_ref(), FAKE_PNG);
    }

    #[test]
    fn test_caption_header_escapes_non_ascii() {
        assert_eq!(caption_header("BTC/USDT (1h)"), "BTC/USDT (1h)");
        assert_eq!(caption_header("b\u{442}c (1h)"), "b\\u{442}c (1h)");
    }

    #[tokio::test]
    async fn test_non_ascii_pair_keeps_its_caption() {
        let base = bot().await;
        let response = post_raw(&base, r#"{"message": "/chart b\u0442c"}"#).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[CAPTION_HEADER], "b\\u{442}c (1h)");
    }

    #[tokio::test]
    async fn test_malformed_body_gets_help() {
        let base = bot().await;
        for body in ["not json", "{}", r#"{"message": 5}"#] {
            let response = post_raw(&base, body).await;
            assert_eq!(response.status(), 200, "body {}", body);
            let reply: Value = response.json().await.unwrap();
            assert_eq!(reply["reply"], USAGE, "body {}", body);
        }
    }

    #[tokio::test]
    async fn test_health() {
        let base = bot().await;
        let body: Value = reqwest::get(format!("{}/health", base)).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }
}
