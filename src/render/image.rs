//! Image output for [`Figure`]s using the [`plotters`] crate.
//!
//! The backend follows the file extension: `.png` goes through the bitmap
//! backend, anything else is written as SVG.

use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{Figure, Series};
use crate::error::{Error, Result};
use crate::style::{LineStyle, Marker};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn plot_error(err: impl std::fmt::Display) -> Error {
    Error::Plot(err.to_string())
}

/// Draw `figure` and write it to `path`.
pub fn save_figure(figure: &Figure, path: &Path, size: (u32, u32)) -> Result<()> {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));

    if is_png {
        draw_figure(BitMapBackend::new(path, size).into_drawing_area(), figure)
    } else {
        draw_figure(SVGBackend::new(path, size).into_drawing_area(), figure)
    }
}

fn draw_figure<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let (x_min, x_max) = figure.x_range();
    let (y_min, y_max) = figure.y_range();

    let mut chart = ChartBuilder::on(&root)
        .caption(&figure.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(plot_error)?;

    for series in &figure.series {
        draw_series(&mut chart, series)?;
    }

    if !figure.series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 18))
            .draw()
            .map_err(plot_error)?;
    }

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Dash and gap lengths in pixels; `None` for a solid line.
///
/// The backend only draws uniform dashes, so `DashDot` becomes a long
/// dash with a short gap, which still tells it apart from `Dashed`.
fn dash_pattern(style: LineStyle) -> Option<(u32, u32)> {
    match style {
        LineStyle::Dashed => Some((10, 6)),
        LineStyle::Dotted => Some((2, 4)),
        LineStyle::DashDot => Some((18, 4)),
        LineStyle::Solid | LineStyle::NoLine => None,
    }
}

fn draw_series<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, series: &Series) -> Result<()> {
    let color = RGBColor(series.color.red, series.color.green, series.color.blue);
    let line = color.stroke_width(series.style.line_width().round().max(1.0) as u32);
    let points = series.points.iter().copied();
    let label = series.label.clone();

    // The legend entry goes on the line when there is one, else on the markers.
    let line_style = series.style.line_style();
    if line_style != LineStyle::NoLine {
        let anno = match dash_pattern(line_style) {
            Some((dash, gap)) => {
                chart.draw_series(DashedLineSeries::new(points.clone(), dash, gap, line))
            }
            None => chart.draw_series(LineSeries::new(points.clone(), line)),
        }
        .map_err(plot_error)?;
        anno.label(label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
    }

    let marker = series.style.marker();
    if marker == Marker::NoMarker {
        return Ok(());
    }
    let size = ((series.style.marker_size() / 2.0).round() as i32).max(1);
    let filled = color.filled();
    let stroke = color.stroke_width(1);

    let anno = match marker {
        Marker::Cross => chart.draw_series(points.map(|p| Cross::new(p, size, stroke))),
        Marker::Circle => chart.draw_series(points.map(|p| Circle::new(p, size, filled))),
        Marker::Point => chart.draw_series(points.map(|p| Circle::new(p, 2, filled))),
        Marker::Triangle => chart.draw_series(points.map(|p| TriangleMarker::new(p, size, filled))),
        Marker::Square => chart.draw_series(
            points.map(|p| EmptyElement::at(p) + Rectangle::new([(-size, -size), (size, size)], filled)),
        ),
        Marker::Plus | Marker::NoMarker => chart.draw_series(points.map(|p| {
            EmptyElement::at(p)
                + PathElement::new(vec![(-size, 0), (size, 0)], stroke)
                + PathElement::new(vec![(0, -size), (0, size)], stroke)
        })),
    }
    .map_err(plot_error)?;

    if line_style == LineStyle::NoLine {
        anno.label(label)
            .legend(move |(x, y)| Circle::new((x + 10, y), size, filled));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_broken_line_style_has_its_own_pattern() {
        let dashed = dash_pattern(LineStyle::Dashed).unwrap();
        let dotted = dash_pattern(LineStyle::Dotted).unwrap();
        let dash_dot = dash_pattern(LineStyle::DashDot).unwrap();
        assert_ne!(dashed, dotted);
        assert_ne!(dashed, dash_dot);
        assert_ne!(dotted, dash_dot);
        assert_eq!(dash_pattern(LineStyle::Solid), None);
    }
}
