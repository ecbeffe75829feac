use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use foam_plot::{DataChoice, Plotter, PlotterConfig, RenderRequest, StyleSpec};

/// Plot OpenFOAM post-processing output against reference data.
#[derive(Debug, Parser)]
#[command(name = "foam-plot", version)]
struct Cli {
    /// Column plotted on the x axis.
    #[arg(long = "x")]
    x_key: String,

    /// Column plotted on the y axis.
    #[arg(long = "y")]
    y_key: String,

    /// Name of the written image (without extension).
    #[arg(long)]
    title: String,

    /// JSON configuration file; the flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Post-processing directory of the case.
    #[arg(long)]
    case_dir: Option<PathBuf>,

    /// Reference data file; plotted unless `--no-reference` is given.
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Output directory for images.
    #[arg(long)]
    plots_dir: Option<PathBuf>,

    #[arg(long)]
    case_name: Option<String>,

    /// Do not write an image.
    #[arg(long)]
    no_save: bool,

    /// Open a window with the plot.
    #[arg(long)]
    show: bool,

    /// Do not overlay the reference data.
    #[arg(long)]
    no_reference: bool,

    /// Image format: svg or png.
    #[arg(long)]
    extension: Option<String>,

    /// Time-step directory to plot: `last` or a directory name.
    /// Defaults to the `choice` of the config file, else `last`.
    #[arg(long)]
    choice: Option<String>,

    /// Style as JSON: one mapping for all series or a list with one entry per series.
    #[arg(long)]
    style: Option<String>,

    /// Also write every plotted case table as CSV into this directory.
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

impl Cli {
    fn plotter_config(&self) -> Result<PlotterConfig> {
        let mut config = match &self.config {
            Some(path) => PlotterConfig::from_json_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            // Without a config file, reference data is only plotted when a
            // reference file is passed on the command line.
            None => PlotterConfig {
                plot_reference: false,
                ..Default::default()
            },
        };

        if let Some(dir) = &self.case_dir {
            config.case_dir = Some(dir.clone());
        }
        if let Some(file) = &self.reference {
            config.reference_file = Some(file.clone());
            config.plot_reference = true;
        }
        if let Some(dir) = &self.plots_dir {
            config.plots_dir = dir.clone();
        }
        if let Some(name) = &self.case_name {
            config.case_name = name.clone();
        }
        if let Some(ext) = &self.extension {
            config.extension = ext.clone();
        }
        if self.no_save {
            config.save = false;
        }
        if self.show {
            config.show = true;
        }
        if self.no_reference {
            config.plot_reference = false;
        }
        Ok(config)
    }

    fn request(&self, config: &PlotterConfig) -> Result<RenderRequest> {
        let choice = match &self.choice {
            Some(choice) => DataChoice::parse(choice),
            None => config.data_choice()?,
        };
        let mut request =
            RenderRequest::new(&self.x_key, &self.y_key, &self.title).with_choice(choice);
        if let Some(style) = &self.style {
            request = request.with_styles(StyleSpec::from_json(style)?);
        }
        Ok(request)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.plotter_config()?;
    let request = cli.request(&config)?;

    let plotter = Plotter::new(config).context("loading case data")?;
    plotter
        .render(&request)
        .with_context(|| format!("rendering '{}'", request.title))?;

    if let Some(dir) = &cli.export_csv {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let selector = plotter.selector(&request);
        for table in plotter.selected_tables(&selector)? {
            let path = dir.join(format!("{}.csv", table.name()));
            table
                .write_csv(&path)
                .with_context(|| format!("exporting {}", table.name()))?;
            info!("exported {}", path.display());
        }
    }

    Ok(())
}
