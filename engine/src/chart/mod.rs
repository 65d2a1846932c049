// Chart renderer: candles plus indicator series into a three-panel PNG.
// Top to bottom on one time axis, heights 3:1:1: price (high/low band, close,
// dashed EMA-20/EMA-50), RSI with 70/30 reference lines, volume bars.
// The RGB buffer is owned by a single `render` call and dropped before it returns.

mod panels;

use std::io::Cursor;
use std::ops::Range;

use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use shared::models::{Candle, CandleSeries};

use crate::config::ChartSettings;
use crate::error::EngineError;
use crate::indicators::IndicatorSet;

// Smallest canvas where the volume panel still has room for its margin,
// time labels and a visible plot area.
const MIN_WIDTH: u32 = 320;
const MIN_HEIGHT: u32 = 400;

/// Canvas size for rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
}

impl ChartStyle {
    pub fn new(width: u32, height: u32) -> Self {
        ChartStyle {
            width: width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle::new(1200, 900)
    }
}

impl From<&ChartSettings> for ChartStyle {
    fn from(settings: &ChartSettings) -> Self {
        ChartStyle::new(settings.width, settings.height)
    }
}

/// Encoded chart image. Symbol and interval live only in the drawn title.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    png: Vec<u8>,
}

impl ChartArtifact {
    pub const CONTENT_TYPE: &'static str = "image/png";

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }

    pub fn len(&self) -> usize {
        self.png.len()
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

/// Everything a panel needs to draw, borrowed from the render call.
pub(crate) struct PanelContext<'a> {
    pub candles: &'a [Candle],
    pub indicators: &'a IndicatorSet,
    pub x_range: Range<DateTime<Utc>>,
    pub bar_width: Duration,
    pub title: String,
}

pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> EngineError {
    EngineError::Render(err.to_string())
}

/// Renders the chart. Fails with `NoData` on an empty series; a single candle
/// still renders (axis padded by one bar).
pub fn render(series: &CandleSeries, indicators: &IndicatorSet, style: &ChartStyle) -> Result<ChartArtifact, EngineError> {
    let candles = series.candles();
    if candles.is_empty() {
        return Err(EngineError::NoData {
            symbol: series.symbol.display().to_string(),
            interval: series.timeframe.to_string(),
        });
    }

    let style = ChartStyle::new(style.width, style.height);
    let step = series.timeframe.duration();
    let ctx = PanelContext {
        candles,
        indicators,
        x_range: time_range(candles, step),
        bar_width: step * 3 / 5,
        title: format!("{} ({})", series.symbol.display(), series.timeframe),
    };

    let mut buffer = vec![0u8; style.width as usize * style.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let (price_height, rsi_height, _) = panel_heights(style.height);
        let (price_area, rest) = root.split_vertically(price_height);
        let (rsi_area, volume_area) = rest.split_vertically(rsi_height);

        panels::draw_price_panel(&price_area, &ctx)?;
        panels::draw_rsi_panel(&rsi_area, &ctx)?;
        panels::draw_volume_panel(&volume_area, &ctx)?;

        root.present().map_err(render_err)?;
    }

    let png = encode_png(buffer, style.width, style.height)?;
    tracing::debug!(
        symbol = %series.symbol.display(),
        interval = %series.timeframe,
        candles = candles.len(),
        bytes = png.len(),
        "Chart rendered"
    );
    Ok(ChartArtifact { png })
}

/// Price, RSI and volume panel heights in a 3:1:1 ratio. Rounding leftovers
/// go to the volume panel, which also carries the time labels.
fn panel_heights(height: u32) -> (u32, u32, u32) {
    let price = height * 3 / 5;
    let rsi = height / 5;
    (price, rsi, height - price - rsi)
}

/// Open time of the first candle to open time of the last, padded by half a
/// bar on each side so a single candle still spans a non-empty range.
fn time_range(candles: &[Candle], step: Duration) -> Range<DateTime<Utc>> {
    let half = step / 2;
    let first = candles.first().map(|c| c.open_time).unwrap_or_default();
    let last = candles.last().map(|c| c.open_time).unwrap_or(first);
    (first - half)..(last + half)
}

/// Min..max of the given values, widened so the axis never collapses.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { (max.abs() * 0.01).max(1.0) };
    (min - pad)..(max + pad)
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, EngineError> {
    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| EngineError::Render("Drawing buffer does not match chart size".to_string()))?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, image::ImageFormat::Png).map_err(render_err)?;
    Ok(png.into_inner())
}
