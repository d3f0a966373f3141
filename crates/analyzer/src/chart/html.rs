use std::path::Path;

use askama::Template;

use super::{
    date_label, day_offsets, ensure_parent, y_axis_max, ChartError, ChartStyle, ORGANIC_LABEL,
    ORGANIC_RGB, REPORTED_FILL_ALPHA, REPORTED_LABEL, REPORTED_RGB, Y_AXIS_LABEL,
};
use crate::daily::DailyActive;

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 72.0;
const MARGIN_BOTTOM: f64 = 44.0;
const Y_TICKS: u32 = 5;
const X_TICKS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub pos: String,
    pub label: String,
}

/// One hover column: the band covering a date plus both values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverBand {
    pub x: String,
    pub band_x: String,
    pub band_width: String,
    pub date: String,
    pub reported: u32,
    pub organic: u32,
}

#[derive(Template)]
#[template(path = "traction_chart.html")]
struct TractionChartTemplate<'a> {
    title: &'a str,
    width: u32,
    height: u32,
    plot_left: String,
    plot_right: String,
    plot_top: String,
    plot_bottom: String,
    plot_height: String,
    y_label: &'a str,
    reported_label: &'a str,
    organic_label: &'a str,
    reported_stroke: String,
    reported_fill: String,
    organic_stroke: String,
    reported_area: String,
    reported_line: String,
    organic_line: String,
    y_ticks: Vec<Tick>,
    x_ticks: Vec<Tick>,
    bands: Vec<HoverBand>,
}

fn fmt_px(v: f64) -> String {
    format!("{v:.1}")
}

/// Maps day offsets and counts into SVG pixel space.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x_span: f64,
    y_max: f64,
}

impl Frame {
    #[allow(clippy::cast_precision_loss)]
    fn new(style: &ChartStyle, x_span: i64, y_max: u32) -> Self {
        Self {
            left: MARGIN_LEFT,
            right: f64::from(style.width) - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: f64::from(style.height) - MARGIN_BOTTOM,
            x_span: x_span.max(1) as f64,
            y_max: f64::from(y_max.max(1)),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn x(&self, offset: i64) -> f64 {
        self.left + (self.right - self.left) * offset as f64 / self.x_span
    }

    fn y(&self, value: u32) -> f64 {
        self.bottom - (self.bottom - self.top) * f64::from(value) / self.y_max
    }
}

fn line_path(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{cmd}{},{}", fmt_px(*x), fmt_px(*y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Filled area down to the baseline (fill-to-zero).
fn area_path(points: &[(f64, f64)], baseline: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    format!(
        "{} L{},{} L{},{} Z",
        line_path(points),
        fmt_px(last.0),
        fmt_px(baseline),
        fmt_px(first.0),
        fmt_px(baseline)
    )
}

fn y_ticks(frame: &Frame, y_max: u32) -> Vec<Tick> {
    let step = y_max.div_ceil(Y_TICKS).max(1);
    (0..=Y_TICKS)
        .map(|i| i * step)
        .take_while(|&v| v <= y_max)
        .map(|v| Tick {
            pos: fmt_px(frame.y(v)),
            label: v.to_string(),
        })
        .collect()
}

fn x_ticks(frame: &Frame, series: &[DailyActive], offsets: &[i64]) -> Vec<Tick> {
    if series.is_empty() {
        return Vec::new();
    }
    let stride = series.len().div_ceil(X_TICKS).max(1);
    let start = series.first().map(|d| d.date);
    offsets
        .iter()
        .step_by(stride)
        .map(|&off| Tick {
            pos: fmt_px(frame.x(off)),
            label: date_label(start, off),
        })
        .collect()
}

fn hover_bands(frame: &Frame, series: &[DailyActive], offsets: &[i64]) -> Vec<HoverBand> {
    let xs: Vec<f64> = offsets.iter().map(|&o| frame.x(o)).collect();
    series
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let lo = if i == 0 { frame.left } else { (xs[i - 1] + xs[i]) / 2.0 };
            let hi = if i + 1 == xs.len() {
                frame.right
            } else {
                (xs[i] + xs[i + 1]) / 2.0
            };
            HoverBand {
                x: fmt_px(xs[i]),
                band_x: fmt_px(lo),
                band_width: fmt_px((hi - lo).max(1.0)),
                date: d.date.format("%Y-%m-%d").to_string(),
                reported: d.reported_dau,
                organic: d.organic_dau,
            }
        })
        .collect()
}

fn css_rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("rgb({r}, {g}, {b})")
}

fn css_rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {alpha})")
}

/// Renders the interactive document (inline SVG, unified per-date hover) to a string.
pub fn render_string(series: &[DailyActive], style: &ChartStyle) -> Result<String, ChartError> {
    let offsets = day_offsets(series);
    let y_max = y_axis_max(series);
    let frame = Frame::new(style, offsets.last().copied().unwrap_or(0), y_max);

    let reported_pts: Vec<(f64, f64)> = offsets
        .iter()
        .zip(series)
        .map(|(&o, d)| (frame.x(o), frame.y(d.reported_dau)))
        .collect();
    let organic_pts: Vec<(f64, f64)> = offsets
        .iter()
        .zip(series)
        .map(|(&o, d)| (frame.x(o), frame.y(d.organic_dau)))
        .collect();

    let tpl = TractionChartTemplate {
        title: &style.title,
        width: style.width,
        height: style.height,
        plot_left: fmt_px(frame.left),
        plot_right: fmt_px(frame.right),
        plot_top: fmt_px(frame.top),
        plot_bottom: fmt_px(frame.bottom),
        plot_height: fmt_px(frame.bottom - frame.top),
        y_label: Y_AXIS_LABEL,
        reported_label: REPORTED_LABEL,
        organic_label: ORGANIC_LABEL,
        reported_stroke: css_rgb(REPORTED_RGB),
        reported_fill: css_rgba(REPORTED_RGB, REPORTED_FILL_ALPHA),
        organic_stroke: css_rgb(ORGANIC_RGB),
        reported_area: area_path(&reported_pts, frame.bottom),
        reported_line: line_path(&reported_pts),
        organic_line: line_path(&organic_pts),
        y_ticks: y_ticks(&frame, y_max),
        x_ticks: x_ticks(&frame, series, &offsets),
        bands: hover_bands(&frame, series, &offsets),
    };
    Ok(tpl.render()?)
}

pub fn render(path: &Path, series: &[DailyActive], style: &ChartStyle) -> Result<(), ChartError> {
    ensure_parent(path)?;
    let doc = render_string(series, style)?;
    std::fs::write(path, doc).map_err(|source| ChartError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), points = series.len(), "html chart written");
    Ok(())
}
