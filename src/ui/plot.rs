use eframe::egui::{Color32, Ui};
use egui_plot::{Line, LineStyle as PlotLineStyle, MarkerShape, Plot, PlotPoints, Points};

use crate::color::Rgb;
use crate::state::ViewerState;
use crate::style::{LineStyle, Marker};

// ---------------------------------------------------------------------------
// Figure plot (central panel)
// ---------------------------------------------------------------------------

/// Render the visible series of the figure in the central panel.
pub fn figure_plot(ui: &mut Ui, state: &ViewerState) {
    let figure = &state.figure;

    Plot::new("figure_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(figure.x_label.clone())
        .y_axis_label(figure.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in state.visible_series() {
                let color = to_color32(series.color);
                let style = &series.style;

                if let Some(line_style) = plot_line_style(style.line_style()) {
                    let points: PlotPoints = series.points.iter().map(|&(x, y)| [x, y]).collect();
                    let line = Line::new(points)
                        .name(&series.label)
                        .color(color)
                        .width(style.line_width() as f32)
                        .style(line_style);
                    plot_ui.line(line);
                }

                if let Some((shape, filled)) = marker_shape(style.marker()) {
                    let points: PlotPoints = series.points.iter().map(|&(x, y)| [x, y]).collect();
                    let markers = Points::new(points)
                        .name(&series.label)
                        .color(color)
                        .shape(shape)
                        .filled(filled)
                        .radius((style.marker_size() / 2.0) as f32);
                    plot_ui.points(markers);
                }
            }
        });
}

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

fn plot_line_style(style: LineStyle) -> Option<PlotLineStyle> {
    match style {
        LineStyle::Solid => Some(PlotLineStyle::Solid),
        LineStyle::Dashed => Some(PlotLineStyle::Dashed { length: 10.0 }),
        LineStyle::Dotted => Some(PlotLineStyle::Dotted { spacing: 5.0 }),
        // egui_plot has no dash-dot pattern; a longer dash keeps it apart from `Dashed`.
        LineStyle::DashDot => Some(PlotLineStyle::Dashed { length: 18.0 }),
        LineStyle::NoLine => None,
    }
}

fn marker_shape(marker: Marker) -> Option<(MarkerShape, bool)> {
    match marker {
        Marker::Cross => Some((MarkerShape::Cross, false)),
        Marker::Plus => Some((MarkerShape::Plus, false)),
        Marker::Circle => Some((MarkerShape::Circle, true)),
        Marker::Point => Some((MarkerShape::Circle, true)),
        Marker::Triangle => Some((MarkerShape::Up, true)),
        Marker::Square => Some((MarkerShape::Square, true)),
        Marker::NoMarker => None,
    }
}
