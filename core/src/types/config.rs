use crate::error::{DexaError, Result};
use crate::types::{ToggleMode, TrendPalette};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default strftime format of the `Scan Date` column
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Default half-width of the expected range around the population median
pub const DEFAULT_BAND_PCT: f64 = 0.15;

/// Default percent change below which a series is classified as stable
pub const DEFAULT_STABLE_THRESHOLD_PCT: f64 = 2.0;

/// Locations of the three input tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Per body-part scan table
    pub scans: PathBuf,

    /// Per scan composition indices
    pub composition: PathBuf,

    /// Population benchmark results
    pub benchmarks: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            scans: PathBuf::from("Data/master_dexa_data.csv"),
            composition: PathBuf::from("Data/composition_indices.csv"),
            benchmarks: PathBuf::from("Data/fat_mass_benchmark_results.csv"),
        }
    }
}

/// Dashboard-wide settings
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
///
/// # Example
///
/// ```
/// use dexa_core::{DashboardConfig, ToggleMode};
///
/// let config = DashboardConfig::default()
///     .with_toggle_mode(ToggleMode::Replace)
///     .with_band_pct(0.10);
///
/// assert_eq!(config.toggle_mode, ToggleMode::Replace);
/// assert_eq!(config.band_pct, 0.10);
/// assert_eq!(config.date_format, "%d-%m-%Y");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// strftime format of every `Scan Date` column
    pub date_format: String,

    /// Semantics of non-Total button clicks
    pub toggle_mode: ToggleMode,

    /// Half-width of the benchmark band, as a fraction of the median
    pub band_pct: f64,

    /// Threshold (percent) for classifying a long-run trend as stable
    pub stable_threshold_pct: f64,

    /// Trend delta colors
    pub palette: TrendPalette,

    /// Input table locations
    pub paths: DataPaths,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            toggle_mode: ToggleMode::default(),
            band_pct: DEFAULT_BAND_PCT,
            stable_threshold_pct: DEFAULT_STABLE_THRESHOLD_PCT,
            palette: TrendPalette::default(),
            paths: DataPaths::default(),
        }
    }
}

impl DashboardConfig {
    /// Reads a config from a JSON file and validates it
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds out-of-range values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses a config from JSON text and validates it
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text)
            .map_err(|e| DexaError::Config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(DexaError::Config("date_format must not be empty".into()));
        }
        if !(0.0..1.0).contains(&self.band_pct) {
            return Err(DexaError::Config(format!(
                "band_pct must be in [0, 1), got {}",
                self.band_pct
            )));
        }
        if !self.stable_threshold_pct.is_finite() || self.stable_threshold_pct < 0.0 {
            return Err(DexaError::Config(format!(
                "stable_threshold_pct must be a non-negative number, got {}",
                self.stable_threshold_pct
            )));
        }
        Ok(())
    }

    /// Builder: Set the scan date format
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Builder: Set the toggle semantics
    pub fn with_toggle_mode(mut self, mode: ToggleMode) -> Self {
        self.toggle_mode = mode;
        self
    }

    /// Builder: Set the benchmark band half-width
    pub fn with_band_pct(mut self, pct: f64) -> Self {
        self.band_pct = pct;
        self
    }

    /// Builder: Set the stable-trend threshold
    pub fn with_stable_threshold_pct(mut self, pct: f64) -> Self {
        self.stable_threshold_pct = pct;
        self
    }

    /// Builder: Set the input table locations
    pub fn with_paths(mut self, paths: DataPaths) -> Self {
        self.paths = paths;
        self
    }
}
