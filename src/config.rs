use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::loader::DEFAULT_REFERENCE_SKIP_ROWS;
use crate::data::model::{ANGLE_COLUMN, PRESSURE_COEFFICIENT_COLUMN};
use crate::data::select::DataChoice;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Plotter configuration
// ---------------------------------------------------------------------------

/// Everything a [`crate::render::Plotter`] needs, fixed at construction.
///
/// Loadable from JSON; every field is optional in the file and unknown
/// fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotterConfig {
    /// Post-processing directory of the case (`<case>/postProcessing`).
    pub case_dir: Option<PathBuf>,

    /// Two-column reference data file.
    pub reference_file: Option<PathBuf>,

    /// Directory images are written to.
    pub plots_dir: PathBuf,

    /// Label of the case results.
    pub case_name: String,

    /// Write `<plots_dir>/<title>.<extension>` after each render.
    pub save: bool,

    /// Open a window showing the plot after each render.
    pub show: bool,

    /// Overlay the reference data.
    pub plot_reference: bool,

    /// Image format, `svg` or `png`.
    pub extension: String,

    /// Header rows skipped at the top of the reference file.
    pub reference_skip_rows: usize,

    /// Legend label of the reference data.
    pub reference_name: String,

    /// Column names given to the reference data (angle, coefficient).
    pub reference_columns: [String; 2],

    /// Tree path below which the time-step directories live.
    pub sample_dir: Vec<String>,

    /// Image size in pixels.
    pub figure_size: (u32, u32),

    /// Default time-step directory: `"last"`, a key, or an integer key.
    pub choice: JsonValue,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            case_dir: None,
            reference_file: None,
            plots_dir: PathBuf::from("plots"),
            case_name: "Case".to_string(),
            save: true,
            show: false,
            plot_reference: true,
            extension: "svg".to_string(),
            reference_skip_rows: DEFAULT_REFERENCE_SKIP_ROWS,
            reference_name: "Reference Data".to_string(),
            reference_columns: [
                ANGLE_COLUMN.to_string(),
                PRESSURE_COEFFICIENT_COLUMN.to_string(),
            ],
            sample_dir: vec!["sample".to_string()],
            figure_size: (1200, 800),
            choice: JsonValue::String("last".to_string()),
        }
    }
}

impl PlotterConfig {
    /// Read a configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::Configuration(format!("invalid configuration: {e}")))
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.extension.as_str(), "svg" | "png") {
            return Err(Error::Configuration(format!(
                "unsupported image extension '{}' (use svg or png)",
                self.extension
            )));
        }
        if self.plot_reference && self.reference_file.is_none() {
            return Err(Error::Configuration(
                "reference plotting is enabled but no reference file is configured".to_string(),
            ));
        }
        self.data_choice()?;
        let (width, height) = self.figure_size;
        if width == 0 || height == 0 {
            return Err(Error::Configuration(format!(
                "figure size {width}x{height} is empty"
            )));
        }
        Ok(())
    }

    /// The configured default data choice.
    pub fn data_choice(&self) -> Result<DataChoice> {
        DataChoice::from_json(&self.choice)
    }

    /// Path of the image written for `title`.
    pub fn output_path(&self, title: &str) -> PathBuf {
        self.plots_dir.join(format!("{title}.{}", self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = PlotterConfig::from_json("{}").unwrap();
        assert_eq!(config, PlotterConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config = PlotterConfig::from_json(
            r#"{"case_dir": "cylinder/postProcessing", "plot_reference": false, "extension": "png"}"#,
        )
        .unwrap();
        assert_eq!(config.case_dir, Some(PathBuf::from("cylinder/postProcessing")));
        assert!(!config.plot_reference);
        assert_eq!(config.extension, "png");
        assert_eq!(config.plots_dir, PathBuf::from("plots"));
    }

    #[test]
    fn choice_accepts_integer_key() {
        let config = PlotterConfig::from_json(r#"{"choice": 20}"#).unwrap();
        assert_eq!(config.data_choice().unwrap(), DataChoice::Key("20".to_string()));
        assert_eq!(PlotterConfig::default().data_choice().unwrap(), DataChoice::Last);
    }

    #[test]
    fn choice_of_other_type_fails_validation() {
        let config = PlotterConfig {
            plot_reference: false,
            ..PlotterConfig::from_json(r#"{"choice": [10]}"#).unwrap()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = PlotterConfig::from_json(r#"{"colour_theme": "dark"}"#).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn validate_rejects_unknown_extension() {
        let config = PlotterConfig {
            extension: "gif".to_string(),
            plot_reference: false,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn validate_requires_reference_file_when_overlaying() {
        let config = PlotterConfig::default();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = PlotterConfig {
            reference_file: Some(PathBuf::from("ref/Cp.dat")),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn output_path_uses_title_and_extension() {
        let config = PlotterConfig::default();
        assert_eq!(config.output_path("p_vs_x"), PathBuf::from("plots/p_vs_x.svg"));
    }
}
