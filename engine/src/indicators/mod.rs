// Technical indicators module
pub mod ema;
pub mod rsi;
pub mod sma;

pub use ema::Ema;
pub use rsi::Rsi;

use serde::Serialize;
use serde_json::Value;
use shared::models::{Candle, IndicatorSeries};

pub const RSI_PERIOD: usize = 14;
pub const EMA_FAST_SPAN: usize = 20;
pub const EMA_SLOW_SPAN: usize = 50;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>; // None where there is not enough history

    fn series(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries {
            name: self.name().to_string(),
            parameters: self.parameters(),
            values: self.calculate(data),
        }
    }
}

/// The derived series drawn on every chart, aligned with the input candles.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSet {
    pub rsi: IndicatorSeries,
    pub ema20: IndicatorSeries,
    pub ema50: IndicatorSeries,
}

/// Computes RSI-14, EMA-20 and EMA-50 over the candles.
///
/// Never rejects input: with fewer than two candles every series is
/// all-undefined (same length as the input).
pub fn compute(candles: &[Candle]) -> IndicatorSet {
    let rsi = Rsi::new(RSI_PERIOD);
    let ema20 = Ema::new(EMA_FAST_SPAN);
    let ema50 = Ema::new(EMA_SLOW_SPAN);

    if candles.len() < 2 {
        return IndicatorSet {
            rsi: undefined_series(&rsi, candles.len()),
            ema20: undefined_series(&ema20, candles.len()),
            ema50: undefined_series(&ema50, candles.len()),
        };
    }

    IndicatorSet {
        rsi: rsi.series(candles),
        ema20: ema20.series(candles),
        ema50: ema50.series(candles),
    }
}

fn undefined_series(calc: &dyn IndicatorCalculator, len: usize) -> IndicatorSeries {
    IndicatorSeries {
        name: calc.name().to_string(),
        parameters: calc.parameters(),
        values: vec![None; len],
    }
}
