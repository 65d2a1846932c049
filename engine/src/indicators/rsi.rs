// Relative Strength Index (RSI) indicator implementation
//
// Gains and losses of close-to-close changes are smoothed with a simple moving
// average over `period` changes. The first change is undefined, so the first
// RSI value sits at index `period`.
use super::sma::rolling_mean;
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

/// RSI from smoothed gain and loss. No losses means no downward pressure: 100.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        if data.len() <= self.period || self.period == 0 {
            return vec![None; data.len()];
        }

        let mut gains = Vec::with_capacity(data.len());
        let mut losses = Vec::with_capacity(data.len());
        gains.push(None);
        losses.push(None);
        for pair in data.windows(2) {
            let change = pair[1].close - pair[0].close;
            gains.push(Some(change.max(0.0)));
            losses.push(Some((-change).max(0.0)));
        }

        let avg_gains = rolling_mean(&gains, self.period);
        let avg_losses = rolling_mean(&losses, self.period);

        avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| Some(rsi_value(gain?, loss?)))
            .collect()
    }
}
