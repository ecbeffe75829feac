//! Renderer: turns the selected tables into a [`Figure`] and hands it to
//! the image writer and/or the interactive window.
//!
//! Every render call builds a fresh figure, so nothing drawn by one call
//! leaks into the next. If drawing fails half way, the image file may be
//! left incomplete.

pub mod image;

use std::path::PathBuf;

use log::{debug, info};

use crate::color::{generate_palette, Rgb};
use crate::config::PlotterConfig;
use crate::data::loader::parse_reference;
use crate::data::model::{ReferenceTable, Table};
use crate::data::select::{DataChoice, SampleSelector, SubtreeSelector};
use crate::data::tree::ResultTree;
use crate::error::{Error, Result};
use crate::style::{Style, StyleSpec};

/// Number of colours handed out to series that do not name one.
const COLOR_CYCLE_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Figure – what gets drawn
// ---------------------------------------------------------------------------

/// One line of the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: Style,
    pub color: Rgb,
}

/// A complete XY line plot, independent of the backend drawing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn x_range(&self) -> (f64, f64) {
        padded_range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
    }

    pub fn y_range(&self) -> (f64, f64) {
        padded_range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)))
    }
}

/// Min/max of the finite values with 5% headroom on both sides.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span < f64::EPSILON {
        let pad = (min.abs() * 0.05).max(0.5);
        return (min - pad, max + pad);
    }
    (min - span * 0.05, max + span * 0.05)
}

// ---------------------------------------------------------------------------
// RenderRequest – one render call
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Column plotted on the x axis; also the axis label.
    pub x_key: String,
    /// Column plotted on the y axis; also the axis label.
    pub y_key: String,
    /// Image file name (without extension).
    pub title: String,
    pub styles: Option<StyleSpec>,
    pub choice: DataChoice,
}

impl RenderRequest {
    pub fn new(x_key: &str, y_key: &str, title: &str) -> Self {
        RenderRequest {
            x_key: x_key.to_string(),
            y_key: y_key.to_string(),
            title: title.to_string(),
            styles: None,
            choice: DataChoice::Last,
        }
    }

    pub fn with_styles(mut self, styles: StyleSpec) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_choice(mut self, choice: DataChoice) -> Self {
        self.choice = choice;
        self
    }
}

// ---------------------------------------------------------------------------
// Plotter – owns the loaded data
// ---------------------------------------------------------------------------

/// Loaded case results and reference data plus the output settings.
///
/// Everything is read eagerly in [`Plotter::new`]; render calls only read.
/// One plotter is meant to be used from one thread; two plotters writing
/// the same `plots_dir` must not render the same title concurrently.
#[derive(Debug)]
pub struct Plotter {
    config: PlotterConfig,
    results: Option<ResultTree>,
    reference: Option<ReferenceTable>,
}

impl Plotter {
    /// Load the configured case directory and reference file.
    pub fn new(config: PlotterConfig) -> Result<Self> {
        config.validate()?;

        let reference = match (&config.reference_file, config.plot_reference) {
            (Some(path), true) => {
                let [angle, coefficient] = &config.reference_columns;
                let reference = parse_reference(
                    path,
                    config.reference_skip_rows,
                    &config.reference_name,
                    Style::table_default(),
                )?
                .with_column_names(angle, coefficient)?;
                Some(reference)
            }
            _ => None,
        };

        let results = config
            .case_dir
            .as_deref()
            .map(|dir| ResultTree::build(dir, &config.case_name))
            .transpose()?;

        Ok(Plotter::from_parts(config, results, reference))
    }

    /// Assemble a plotter from data loaded elsewhere.
    pub fn from_parts(
        config: PlotterConfig,
        results: Option<ResultTree>,
        reference: Option<ReferenceTable>,
    ) -> Self {
        Plotter {
            config,
            results,
            reference,
        }
    }

    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    pub fn results(&self) -> Option<&ResultTree> {
        self.results.as_ref()
    }

    pub fn reference(&self) -> Option<&ReferenceTable> {
        self.reference.as_ref()
    }

    /// The default selector: `sample_dir` from the configuration, then the
    /// request's data choice.
    pub fn selector(&self, request: &RenderRequest) -> SampleSelector {
        SampleSelector::new(self.config.sample_dir.clone(), request.choice.clone())
    }

    /// Leaf tables of the branch chosen by `selector`, in plotting order.
    /// A directory inside that branch is an error, not a partial plot.
    pub fn selected_tables<'p>(
        &'p self,
        selector: &dyn SubtreeSelector,
    ) -> Result<Vec<&'p Table>> {
        let Some(tree) = &self.results else {
            return Ok(Vec::new());
        };
        let node = selector.select(tree)?;
        let mut tables = Vec::new();
        for (key, child) in node.children() {
            match child.table() {
                Some(table) => tables.push(table),
                None => {
                    return Err(Error::Configuration(format!(
                        "'{key}' under the selected time step is a directory, not a table"
                    )))
                }
            }
        }
        Ok(tables)
    }

    /// Build the figure for `request` using the default selector.
    pub fn figure(&self, request: &RenderRequest) -> Result<Figure> {
        self.figure_with(request, &self.selector(request))
    }

    /// Build the figure for `request`, choosing tables with `selector`.
    pub fn figure_with(
        &self,
        request: &RenderRequest,
        selector: &dyn SubtreeSelector,
    ) -> Result<Figure> {
        let x_key = request.x_key.as_str();
        let y_key = request.y_key.as_str();
        let mut series = Vec::new();

        if let Some(reference) = &self.reference {
            let table = reference.table();
            series.push((table.name().to_string(), table.xy(x_key, y_key)?, table.style().clone()));
        }

        let tables = self.selected_tables(selector)?;
        let own_styles: Vec<&Style> = tables.iter().map(|t| t.style()).collect();
        let styles = match &request.styles {
            Some(spec) => spec.resolve(&own_styles)?,
            None => own_styles.into_iter().cloned().collect(),
        };
        for (table, style) in tables.iter().zip(styles) {
            series.push((table.name().to_string(), table.xy(x_key, y_key)?, style));
        }

        let palette = generate_palette(COLOR_CYCLE_LEN);
        let mut drawn = Vec::with_capacity(series.len());
        for (i, (label, points, style)) in series.into_iter().enumerate() {
            let color = style.rgb()?.unwrap_or(palette[i % COLOR_CYCLE_LEN]);
            drawn.push(Series {
                label,
                points,
                style,
                color,
            });
        }

        debug!("figure '{}': {} series", request.title, drawn.len());
        Ok(Figure {
            title: request.title.clone(),
            x_label: request.x_key.clone(),
            y_label: request.y_key.clone(),
            series: drawn,
        })
    }

    /// Build the figure and write and/or show it as configured.
    pub fn render(&self, request: &RenderRequest) -> Result<()> {
        self.render_with(request, &self.selector(request))
    }

    pub fn render_with(
        &self,
        request: &RenderRequest,
        selector: &dyn SubtreeSelector,
    ) -> Result<()> {
        let figure = self.figure_with(request, selector)?;
        self.output(&figure)
    }

    fn output(&self, figure: &Figure) -> Result<()> {
        if self.config.save {
            let path: PathBuf = self.config.output_path(&figure.title);
            std::fs::create_dir_all(&self.config.plots_dir)
                .map_err(|e| Error::io(&self.config.plots_dir, e))?;
            image::save_figure(figure, &path, self.config.figure_size)?;
            info!("wrote {}", path.display());
        }
        if self.config.show {
            crate::app::show_figure(figure.clone(), self.config.figure_size)?;
        }
        Ok(())
    }
}
