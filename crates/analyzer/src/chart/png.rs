use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use super::{
    date_label, day_offsets, ensure_parent, y_axis_max, ChartError, ChartStyle, ORGANIC_LABEL,
    ORGANIC_RGB, REPORTED_FILL_ALPHA, REPORTED_LABEL, REPORTED_RGB, Y_AXIS_LABEL,
};
use crate::daily::DailyActive;

const FONT: &str = "sans-serif";
const HEADER_HEIGHT: u32 = 56;

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

/// Renders the static chart as a PNG. Pixel size is `width x height` times `scale`.
pub fn render(path: &Path, series: &[DailyActive], style: &ChartStyle) -> Result<(), ChartError> {
    ensure_parent(path)?;
    let size = (style.width * style.scale, style.height * style.scale);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw(&root, series, style).map_err(|e| ChartError::Backend(e.to_string()))?;
    root.present()
        .map_err(|e| ChartError::Backend(e.to_string()))?;
    tracing::info!(path = %path.display(), width = size.0, height = size.1, "png chart written");
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[DailyActive],
    style: &ChartStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let px = |v: u32| v * style.scale;
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(px(HEADER_HEIGHT));
    draw_header(&header, style)?;

    let offsets = day_offsets(series);
    let start = series.first().map(|d| d.date);
    let x_end = offsets.last().copied().unwrap_or(0).max(1);
    let y_max = y_axis_max(series);

    let mut chart = ChartBuilder::on(&body)
        .margin(px(12))
        .x_label_area_size(px(36))
        .y_label_area_size(px(56))
        .build_cartesian_2d(0i64..x_end, 0u32..y_max)?;

    let x_fmt = |offset: &i64| date_label(start, *offset);
    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.08))
        .x_labels(8)
        .x_label_formatter(&x_fmt)
        .y_desc(Y_AXIS_LABEL)
        .label_style((FONT, px(11)))
        .axis_desc_style((FONT, px(13)))
        .draw()?;

    let reported: Vec<(i64, u32)> = offsets
        .iter()
        .zip(series)
        .map(|(&x, d)| (x, d.reported_dau))
        .collect();
    let organic: Vec<(i64, u32)> = offsets
        .iter()
        .zip(series)
        .map(|(&x, d)| (x, d.organic_dau))
        .collect();

    let reported_color = rgb(REPORTED_RGB);
    chart.draw_series(
        AreaSeries::new(reported, 0, reported_color.mix(REPORTED_FILL_ALPHA))
            .border_style(reported_color.stroke_width(px(1))),
    )?;
    chart.draw_series(LineSeries::new(
        organic,
        rgb(ORGANIC_RGB).stroke_width(px(3)),
    ))?;

    Ok(())
}

/// Title on the left, both legend entries side by side on the right.
fn draw_header<DB: DrawingBackend>(
    header: &DrawingArea<DB, Shift>,
    style: &ChartStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let ipx = |v: u32| i32::try_from(v * style.scale).unwrap_or(i32::MAX);
    let reported_color = rgb(REPORTED_RGB);
    let organic_color = rgb(ORGANIC_RGB);
    let label_font = (FONT, f64::from(ipx(11))).into_font();

    header.draw(&Text::new(
        style.title.clone(),
        (ipx(12), ipx(8)),
        (FONT, f64::from(ipx(17))).into_font(),
    ))?;

    let (width, _) = header.dim_in_pixel();
    let right = i32::try_from(width).unwrap_or(i32::MAX) - ipx(24);
    let y = ipx(42);

    let reported_x = right - ipx(420);
    header.draw(&Rectangle::new(
        [(reported_x, y - ipx(6)), (reported_x + ipx(22), y + ipx(6))],
        reported_color.mix(REPORTED_FILL_ALPHA).filled(),
    ))?;
    header.draw(&Rectangle::new(
        [(reported_x, y - ipx(6)), (reported_x + ipx(22), y + ipx(6))],
        reported_color.stroke_width(1),
    ))?;
    header.draw(&Text::new(
        REPORTED_LABEL,
        (reported_x + ipx(28), y - ipx(6)),
        label_font.clone(),
    ))?;

    let organic_x = right - ipx(200);
    header.draw(&PathElement::new(
        vec![(organic_x, y), (organic_x + ipx(22), y)],
        organic_color.stroke_width(ipx(3).unsigned_abs()),
    ))?;
    header.draw(&Text::new(
        ORGANIC_LABEL,
        (organic_x + ipx(28), y - ipx(6)),
        label_font,
    ))?;
    Ok(())
}
