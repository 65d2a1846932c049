use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Candles for one symbol and interval, ascending by `open_time`.
/// Built once per request and never shared between requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleSeries {
    pub symbol: Symbol,
    pub timeframe: TimeFrame,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Sorts by open time and drops duplicate timestamps, keeping the first seen.
    pub fn new(symbol: Symbol, timeframe: TimeFrame, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.open_time);
        candles.dedup_by_key(|c| c.open_time);
        CandleSeries { symbol, timeframe, candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn first_close(&self) -> Option<f64> {
        self.candles.first().map(|c| c.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}

/// Upstream kline interval tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    Minute1,
    Minute3,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour8,
    Hour12,
    Day1,
    Day3,
    Week1,
    Month1,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Minute1 => "1m",
            TimeFrame::Minute3 => "3m",
            TimeFrame::Minute5 => "5m",
            TimeFrame::Minute15 => "15m",
            TimeFrame::Minute30 => "30m",
            TimeFrame::Hour1 => "1h",
            TimeFrame::Hour2 => "2h",
            TimeFrame::Hour4 => "4h",
            TimeFrame::Hour6 => "6h",
            TimeFrame::Hour8 => "8h",
            TimeFrame::Hour12 => "12h",
            TimeFrame::Day1 => "1d",
            TimeFrame::Day3 => "3d",
            TimeFrame::Week1 => "1w",
            TimeFrame::Month1 => "1M",
        }
    }

    /// Nominal bar length. Months are counted as 30 days.
    pub fn duration(&self) -> Duration {
        match self {
            TimeFrame::Minute1 => Duration::minutes(1),
            TimeFrame::Minute3 => Duration::minutes(3),
            TimeFrame::Minute5 => Duration::minutes(5),
            TimeFrame::Minute15 => Duration::minutes(15),
            TimeFrame::Minute30 => Duration::minutes(30),
            TimeFrame::Hour1 => Duration::hours(1),
            TimeFrame::Hour2 => Duration::hours(2),
            TimeFrame::Hour4 => Duration::hours(4),
            TimeFrame::Hour6 => Duration::hours(6),
            TimeFrame::Hour8 => Duration::hours(8),
            TimeFrame::Hour12 => Duration::hours(12),
            TimeFrame::Day1 => Duration::days(1),
            TimeFrame::Day3 => Duration::days(3),
            TimeFrame::Week1 => Duration::weeks(1),
            TimeFrame::Month1 => Duration::days(30),
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    // Case matters: "1m" is a minute, "1M" a month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tf = match s.trim() {
            "1m" => TimeFrame::Minute1,
            "3m" => TimeFrame::Minute3,
            "5m" => TimeFrame::Minute5,
            "15m" => TimeFrame::Minute15,
            "30m" => TimeFrame::Minute30,
            "1h" => TimeFrame::Hour1,
            "2h" => TimeFrame::Hour2,
            "4h" => TimeFrame::Hour4,
            "6h" => TimeFrame::Hour6,
            "8h" => TimeFrame::Hour8,
            "12h" => TimeFrame::Hour12,
            "1d" => TimeFrame::Day1,
            "3d" => TimeFrame::Day3,
            "1w" => TimeFrame::Week1,
            "1M" => TimeFrame::Month1,
            other => return Err(format!("Unsupported interval '{}'", other)),
        };
        Ok(tf)
    }
}

/// A named, point-aligned indicator: one entry per candle, `None` where
/// there is not enough history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Defined points only, with their candle index.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
}
