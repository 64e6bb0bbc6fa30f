use serde::{Deserialize, Serialize};

/// Display and interpretation settings for one tracked metric
///
/// `lower_is_better` decides which direction of change is good news, so
/// trend colors come from the metric rather than from each call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricConfig {
    pub label: &'static str,
    pub unit: &'static str,

    /// Divisor applied to raw values before display (1000 turns grams into kg)
    pub scale: f64,

    /// Decimal places shown
    pub precision: usize,
    pub lower_is_better: bool,
}

impl MetricConfig {
    /// Total body mass, read in kg
    pub const WEIGHT: MetricConfig = MetricConfig {
        label: "Current Weight",
        unit: "kg",
        scale: 1.0,
        precision: 1,
        lower_is_better: false,
    };

    /// Whole-body fat percentage
    pub const BODY_FAT_PERCENT: MetricConfig = MetricConfig {
        label: "Body Fat",
        unit: "%",
        scale: 1.0,
        precision: 1,
        lower_is_better: true,
    };

    /// Whole-body lean mass, read in grams and shown in kg
    pub const LEAN_MASS: MetricConfig = MetricConfig {
        label: "Lean Mass",
        unit: "kg",
        scale: 1000.0,
        precision: 1,
        lower_is_better: false,
    };

    /// Body mass index
    pub const BMI: MetricConfig = MetricConfig {
        label: "BMI",
        unit: "kg/m²",
        scale: 1.0,
        precision: 1,
        lower_is_better: false,
    };

    /// Converts a raw value into display units
    pub fn to_display(&self, raw: f64) -> f64 {
        raw / self.scale
    }
}

/// Colors used for trend deltas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPalette {
    pub positive: String,
    pub negative: String,
    pub neutral: String,
}

impl Default for TrendPalette {
    fn default() -> Self {
        Self {
            positive: "#27ae60".to_string(),
            negative: "#e74c3c".to_string(),
            neutral: "#95a5a6".to_string(),
        }
    }
}
