pub mod report;

use crate::error::Result;
use crate::types::{DashboardConfig, ToggleMode};
use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for dexa
#[derive(Parser, Debug)]
#[command(name = "dexa")]
#[command(about = "DEXA body-composition overview and benchmark report")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub data: DataArgs,

    /// Patient to report on (defaults to the first scanned patient alphabetically)
    #[arg(short, long)]
    pub patient: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Input tables and config shared by both binaries
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// JSON config file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per body-part scan table
    #[arg(long, value_name = "FILE")]
    pub scans: Option<PathBuf>,

    /// Composition indices table
    #[arg(long, value_name = "FILE")]
    pub composition: Option<PathBuf>,

    /// Population benchmark table
    #[arg(long, value_name = "FILE")]
    pub benchmarks: Option<PathBuf>,

    /// strftime format of the Scan Date columns
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Half-width of the benchmark band, as a fraction of the median
    #[arg(long, value_name = "FRACTION")]
    pub band_pct: Option<f64>,
}

impl DataArgs {
    /// Loads the config file (if any) and applies flag overrides on top
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or the merged
    /// values are out of range.
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_json_file(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(format) = &self.date_format {
            config = config.with_date_format(format.clone());
        }
        if let Some(pct) = self.band_pct {
            config = config.with_band_pct(pct);
        }
        let mut paths = config.paths.clone();
        if let Some(path) = &self.scans {
            paths.scans = path.clone();
        }
        if let Some(path) = &self.composition {
            paths.composition = path.clone();
        }
        if let Some(path) = &self.benchmarks {
            paths.benchmarks = path.clone();
        }
        config = config.with_paths(paths);

        config.validate()?;
        Ok(config)
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Toggle semantics for body-part buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleModeArg {
    /// Clicks add or remove parts; Total clears the rest
    Accumulate,
    /// Each click selects only the clicked part
    Replace,
}

impl From<ToggleModeArg> for ToggleMode {
    fn from(arg: ToggleModeArg) -> Self {
        match arg {
            ToggleModeArg::Accumulate => ToggleMode::Accumulate,
            ToggleModeArg::Replace => ToggleMode::Replace,
        }
    }
}

/// Initialises `env_logger` at Info, or Debug when `verbose`
///
/// `RUST_LOG` still applies on top of the chosen level.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
