// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

pub struct Ema {
    name: String,
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            name: format!("EMA({})", span),
            span,
        }
    }

    /// Smoothing factor α = 2 / (span + 1).
    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "span": self.span, "alpha": self.alpha() })
    }

    // Seeded with the first close, so every position is defined.
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let Some(first) = data.first() else {
            return Vec::new();
        };

        let alpha = self.alpha();
        let mut results = Vec::with_capacity(data.len());
        let mut previous_ema = first.close;
        results.push(Some(previous_ema));

        for candle in data.iter().skip(1) {
            let ema = alpha * candle.close + (1.0 - alpha) * previous_ema;
            results.push(Some(ema));
            previous_ema = ema;
        }
        results
    }
}
