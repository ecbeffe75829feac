use crate::render::{Figure, Series};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// State of the interactive window, independent of rendering.
pub struct ViewerState {
    /// The figure being shown.
    pub figure: Figure,

    /// Per-series visibility, parallel to `figure.series`.
    pub visible: Vec<bool>,
}

impl ViewerState {
    /// Start with every series visible.
    pub fn new(figure: Figure) -> Self {
        let visible = vec![true; figure.series.len()];
        Self { figure, visible }
    }

    /// Series currently switched on, in plotting order.
    pub fn visible_series(&self) -> impl Iterator<Item = &Series> {
        self.figure
            .series
            .iter()
            .zip(&self.visible)
            .filter(|(_, shown)| **shown)
            .map(|(series, _)| series)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    /// Flip the visibility of one series.
    pub fn toggle(&mut self, index: usize) {
        if let Some(shown) = self.visible.get_mut(index) {
            *shown = !*shown;
        }
    }

    pub fn show_all(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = true);
    }

    pub fn hide_all(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::style::Style;

    fn figure(labels: &[&str]) -> Figure {
        Figure {
            title: "p_vs_x".to_string(),
            x_label: "x".to_string(),
            y_label: "p".to_string(),
            series: labels
                .iter()
                .map(|label| Series {
                    label: label.to_string(),
                    points: vec![(0.0, 1.0)],
                    style: Style::default(),
                    color: Rgb::new(0, 0, 0),
                })
                .collect(),
        }
    }

    #[test]
    fn everything_visible_initially() {
        let state = ViewerState::new(figure(&["bottom", "top"]));
        assert_eq!(state.visible_count(), 2);
    }

    #[test]
    fn toggling_hides_one_series() {
        let mut state = ViewerState::new(figure(&["bottom", "top", "wall"]));
        state.toggle(1);
        let labels: Vec<&str> = state.visible_series().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["bottom", "wall"]);

        state.toggle(7);
        assert_eq!(state.visible_count(), 2);
    }

    #[test]
    fn hide_all_then_show_all() {
        let mut state = ViewerState::new(figure(&["bottom", "top"]));
        state.hide_all();
        assert_eq!(state.visible_count(), 0);
        state.show_all();
        assert_eq!(state.visible_count(), 2);
    }
}
