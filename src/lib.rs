//! Comparison plots of OpenFOAM post-processing output.
//!
//! Case results below a post-processing directory are parsed into a
//! [`ResultTree`] of [`Table`]s; a [`Plotter`] picks one time-step
//! directory, overlays optional reference data and writes an XY line plot
//! per call.
//!
//! ```no_run
//! use foam_plot::{Plotter, PlotterConfig, RenderRequest, StyleSpec};
//!
//! # fn main() -> foam_plot::Result<()> {
//! let config = PlotterConfig {
//!     case_dir: Some("cylinder/postProcessing".into()),
//!     plot_reference: false,
//!     ..Default::default()
//! };
//! let plotter = Plotter::new(config)?;
//! let request = RenderRequest::new("x", "p", "p_vs_x")
//!     .with_styles(StyleSpec::from_json(r#"{"linestyle": "dashed"}"#)?);
//! plotter.render(&request)?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod state;
pub mod style;
pub mod ui;

pub use config::PlotterConfig;
pub use data::model::{Column, ReferenceTable, Table};
pub use data::select::{DataChoice, SampleSelector, SubtreeSelector};
pub use data::tree::{NodeRef, ResultTree};
pub use error::{Error, Result};
pub use render::{Figure, Plotter, RenderRequest, Series};
pub use style::{LineStyle, Marker, Style, StyleSpec};
