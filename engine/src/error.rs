use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// User-correctable request problem (missing symbol, bad interval or limit).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Candle source unreachable, timed out, or answered with a failure.
    #[error("Upstream failure: {detail}")]
    Upstream {
        status: Option<u16>,
        detail: String,
        timeout: bool,
    },

    /// Valid request, but the source returned no candles.
    #[error("No data for {symbol} ({interval})")]
    NoData { symbol: String, interval: String },

    #[error("Chart rendering error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal processing error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn missing_symbol() -> Self {
        EngineError::InvalidInput("Missing 'symbol' query param, e.g. XRP-EUR or XRPEUR".to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidInput(_) => "invalid_input",
            EngineError::Upstream { .. } => "upstream_failure",
            EngineError::NoData { .. } => "no_data",
            EngineError::Render(_) | EngineError::Config(_) | EngineError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::Upstream { timeout: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            EngineError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            EngineError::NoData { .. } => StatusCode::NOT_FOUND,
            EngineError::Render(_) | EngineError::Config(_) | EngineError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}

/// Body of every failed engine response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&EngineError> for ErrorBody {
    fn from(err: &EngineError) -> Self {
        match err {
            EngineError::Upstream { status, detail, timeout } => ErrorBody {
                error: if *timeout {
                    "Request to Binance timed out".to_string()
                } else if status.is_some() {
                    "Binance response".to_string()
                } else {
                    "Request to Binance failed".to_string()
                },
                kind: err.kind(),
                status: *status,
                detail: Some(detail.clone()),
            },
            other => ErrorBody {
                error: other.to_string(),
                kind: other.kind(),
                status: None,
                detail: None,
            },
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        } else {
            tracing::warn!(error = %self, kind = self.kind(), "Request rejected");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(EngineError::missing_symbol().status_code(), StatusCode::BAD_REQUEST);
        let upstream = EngineError::Upstream { status: Some(400), detail: "Invalid symbol.".into(), timeout: false };
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);
        let timed_out = EngineError::Upstream { status: None, detail: "timeout".into(), timeout: true };
        assert_eq!(timed_out.status_code(), StatusCode::GATEWAY_TIMEOUT);
        let no_data = EngineError::NoData { symbol: "BTCUSDT".into(), interval: "1h".into() };
        assert_eq!(no_data.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(EngineError::Render("boom".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_carries_upstream_detail() {
        let err = EngineError::Upstream { status: Some(400), detail: "{\"code\":-1121}".into(), timeout: false };
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["kind"], "upstream_failure");
        assert_eq!(body["status"], 400);
        assert_eq!(body["detail"], "{\"code\":-1121}");
        assert_eq!(err.to_string(), "Upstream failure: {\"code\":-1121}");
    }

    #[test]
    fn test_error_body_omits_empty_fields() {
        let body = serde_json::to_value(ErrorBody::from(&EngineError::missing_symbol())).unwrap();
        assert_eq!(body["kind"], "invalid_input");
        assert!(body.get("status").is_none());
        assert!(body.get("detail").is_none());
    }
}
