use eframe::egui::{RichText, ScrollArea, Ui};

use super::plot::to_color32;
use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – series toggles
// ---------------------------------------------------------------------------

/// Render the left panel with one checkbox per series.
pub fn side_panel(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Series");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.show_all();
        }
        if ui.small_button("None").clicked() {
            state.hide_all();
        }
    });

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, series) in state.figure.series.iter().enumerate() {
                let text = RichText::new(&series.label).color(to_color32(series.color));
                let mut checked = state.visible[idx];
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(idx);
                }
            }
        });

    if let Some(idx) = toggled {
        state.toggle(idx);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar above the plot.
pub fn top_bar(ui: &mut Ui, state: &ViewerState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(&state.figure.title);
        ui.separator();
        ui.label(format!(
            "{} of {} series shown",
            state.visible_count(),
            state.figure.series.len()
        ));
    });
}
