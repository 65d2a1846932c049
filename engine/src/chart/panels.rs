// Panel drawing for the three stacked chart areas.
use chrono::{DateTime, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{padded_range, render_err, PanelContext};
use crate::error::EngineError;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const CLOSE_COLOR: RGBColor = RGBColor(33, 150, 243);
const EMA_FAST_COLOR: RGBColor = RGBColor(255, 152, 0);
const EMA_SLOW_COLOR: RGBColor = RGBColor(156, 39, 176);
const BAND_COLOR: RGBColor = RGBColor(144, 164, 174);
const RSI_COLOR: RGBColor = RGBColor(103, 58, 183);
const OVERBOUGHT_COLOR: RGBColor = RGBColor(229, 57, 53);
const OVERSOLD_COLOR: RGBColor = RGBColor(67, 160, 71);
const VOLUME_COLOR: RGBColor = RGBColor(96, 125, 139);

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

const FONT: &str = "sans-serif";
const TIME_LABELS: usize = 8;

fn format_time(t: &DateTime<Utc>) -> String {
    t.format("%m-%d %H:%M").to_string()
}

/// Splits an optional series into runs of consecutive defined points, so
/// undefined values become gaps in the drawn line.
pub(crate) fn contiguous_runs(times: &[DateTime<Utc>], values: &[Option<f64>]) -> Vec<Vec<(DateTime<Utc>, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (t, value) in times.iter().zip(values) {
        match value {
            Some(v) if v.is_finite() => current.push((*t, *v)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn defined_points(times: &[DateTime<Utc>], values: &[Option<f64>]) -> Vec<(DateTime<Utc>, f64)> {
    times
        .iter()
        .zip(values)
        .filter_map(|(t, v)| v.filter(|v| v.is_finite()).map(|v| (*t, v)))
        .collect()
}

pub(super) fn draw_price_panel(area: &Area<'_>, ctx: &PanelContext<'_>) -> Result<(), EngineError> {
    let candles = ctx.candles;
    let times: Vec<DateTime<Utc>> = candles.iter().map(|c| c.open_time).collect();
    let ema20 = defined_points(&times, &ctx.indicators.ema20.values);
    let ema50 = defined_points(&times, &ctx.indicators.ema50.values);

    let y_range = padded_range(
        candles
            .iter()
            .flat_map(|c| [c.high, c.low, c.close])
            .chain(ema20.iter().map(|p| p.1))
            .chain(ema50.iter().map(|p| p.1)),
    );

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(&ctx.title, (FONT, 24))
        .y_label_area_size(70)
        .build_cartesian_2d(ctx.x_range.clone(), y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(TIME_LABELS)
        .x_label_formatter(&format_time)
        .y_desc("Price")
        .draw()
        .map_err(render_err)?;

    // High/low band
    if candles.len() > 1 {
        let band: Vec<(DateTime<Utc>, f64)> = candles
            .iter()
            .map(|c| (c.open_time, c.high))
            .chain(candles.iter().rev().map(|c| (c.open_time, c.low)))
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(band, BAND_COLOR.mix(0.3))))
            .map_err(render_err)?;
    } else {
        chart
            .draw_series(candles.iter().map(|c| {
                PathElement::new(vec![(c.open_time, c.low), (c.open_time, c.high)], BAND_COLOR.stroke_width(4))
            }))
            .map_err(render_err)?;
    }

    chart
        .draw_series(LineSeries::new(
            candles.iter().map(|c| (c.open_time, c.close)),
            CLOSE_COLOR.stroke_width(2),
        ))
        .map_err(render_err)?
        .label("Close")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CLOSE_COLOR.stroke_width(2)));

    if candles.len() == 1 {
        chart
            .draw_series(candles.iter().map(|c| Circle::new((c.open_time, c.close), 4, CLOSE_COLOR.filled())))
            .map_err(render_err)?;
    }

    for (points, name, color) in [(ema20, "EMA20", EMA_FAST_COLOR), (ema50, "EMA50", EMA_SLOW_COLOR)] {
        chart
            .draw_series(DashedLineSeries::new(points, 6, 4, color.stroke_width(2)))
            .map_err(render_err)?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    Ok(())
}

pub(super) fn draw_rsi_panel(area: &Area<'_>, ctx: &PanelContext<'_>) -> Result<(), EngineError> {
    let times: Vec<DateTime<Utc>> = ctx.candles.iter().map(|c| c.open_time).collect();

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .y_label_area_size(70)
        .build_cartesian_2d(ctx.x_range.clone(), 0.0..100.0)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(TIME_LABELS)
        .x_label_formatter(&format_time)
        .y_labels(5)
        .y_desc("RSI")
        .draw()
        .map_err(render_err)?;

    for (level, color) in [(RSI_OVERBOUGHT, OVERBOUGHT_COLOR), (RSI_OVERSOLD, OVERSOLD_COLOR)] {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(ctx.x_range.start, level), (ctx.x_range.end, level)],
                4,
                4,
                color.stroke_width(1),
            ))
            .map_err(render_err)?;
    }

    for run in contiguous_runs(&times, &ctx.indicators.rsi.values) {
        chart
            .draw_series(LineSeries::new(run, RSI_COLOR.stroke_width(2)))
            .map_err(render_err)?;
    }

    Ok(())
}

pub(super) fn draw_volume_panel(area: &Area<'_>, ctx: &PanelContext<'_>) -> Result<(), EngineError> {
    let max_volume = ctx.candles.iter().map(|c| c.volume).filter(|v| v.is_finite()).fold(0.0, f64::max);
    let y_top = if max_volume > 0.0 { max_volume * 1.1 } else { 1.0 };
    let half_bar = ctx.bar_width / 2;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(ctx.x_range.clone(), 0.0..y_top)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(TIME_LABELS)
        .x_label_formatter(&format_time)
        .y_labels(3)
        .y_desc("Volume")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(ctx.candles.iter().map(|c| {
            Rectangle::new(
                [(c.open_time - half_bar, 0.0), (c.open_time + half_bar, c.volume.max(0.0))],
                VOLUME_COLOR.mix(0.8).filled(),
            )
        }))
        .map_err(render_err)?;

    Ok(())
}
