use crate::error::{DexaError, Result};
use crate::types::{MetricConfig, TrendClass, TrendDirection, TrendPalette, TrendSignal};
use serde::Serialize;
use std::fmt;

/// Direction of change from `previous` to `current`
pub fn trend_direction(current: f64, previous: f64) -> TrendDirection {
    if current > previous {
        TrendDirection::Up
    } else if current < previous {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    }
}

/// Whether a direction is good or bad news for a metric
///
/// Increases are positive unless `lower_is_better`, in which case decreases
/// are. A flat trend is always neutral.
pub fn trend_signal(direction: TrendDirection, lower_is_better: bool) -> TrendSignal {
    match (direction, lower_is_better) {
        (TrendDirection::Flat, _) => TrendSignal::Neutral,
        (TrendDirection::Up, false) | (TrendDirection::Down, true) => TrendSignal::Positive,
        (TrendDirection::Up, true) | (TrendDirection::Down, false) => TrendSignal::Negative,
    }
}

/// Color for a trend delta
pub fn trend_color(
    direction: TrendDirection,
    lower_is_better: bool,
    palette: &TrendPalette,
) -> &str {
    match trend_signal(direction, lower_is_better) {
        TrendSignal::Positive => &palette.positive,
        TrendSignal::Negative => &palette.negative,
        TrendSignal::Neutral => &palette.neutral,
    }
}

/// Latest-vs-previous summary of one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendCard {
    pub label: &'static str,
    pub unit: &'static str,

    /// Latest value in display units
    pub value: f64,
    pub direction: TrendDirection,
    pub signal: TrendSignal,
    pub color: String,

    /// Absolute change in display units
    pub delta: f64,

    #[serde(skip)]
    precision: usize,
}

impl TrendCard {
    /// Formats the delta line, e.g. `"↓ 1.2 kg"`
    pub fn delta_text(&self) -> String {
        format!("{} {}", self.direction.symbol(), self.with_unit(self.delta))
    }

    /// Formats the headline value, e.g. `"67.5 kg"` or `"27.9%"`
    pub fn value_text(&self) -> String {
        self.with_unit(self.value)
    }

    // "%" hugs the number, other units are spaced
    fn with_unit(&self, value: f64) -> String {
        let separator = if self.unit == "%" || self.unit.is_empty() {
            ""
        } else {
            " "
        };
        format!("{:.*}{}{}", self.precision, value, separator, self.unit)
    }
}

impl fmt::Display for TrendCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.label,
            self.value_text(),
            self.delta_text()
        )
    }
}

/// Builds the trend card for a metric from its latest and previous values
///
/// Values are raw (table units); the card holds display units. Without a
/// previous sample the latest value is compared with itself and the trend is
/// flat.
///
/// # Example
///
/// ```
/// use dexa_core::{compute_trend_card, MetricConfig, TrendDirection, TrendPalette};
///
/// let palette = TrendPalette::default();
/// let card = compute_trend_card(27.9, Some(29.4), &MetricConfig::BODY_FAT_PERCENT, &palette);
///
/// assert_eq!(card.direction, TrendDirection::Down);
/// assert_eq!(card.color, palette.positive);
/// assert_eq!(card.delta_text(), "↓ 1.5%");
/// ```
pub fn compute_trend_card(
    latest: f64,
    previous: Option<f64>,
    metric: &MetricConfig,
    palette: &TrendPalette,
) -> TrendCard {
    let previous = previous.unwrap_or(latest);
    let direction = trend_direction(latest, previous);

    TrendCard {
        label: metric.label,
        unit: metric.unit,
        value: metric.to_display(latest),
        direction,
        signal: trend_signal(direction, metric.lower_is_better),
        color: trend_color(direction, metric.lower_is_better, palette).to_string(),
        delta: metric.to_display((latest - previous).abs()),
        precision: metric.precision,
    }
}

/// Classifies a series by its percent change from the first sample
///
/// Changes smaller than `stable_threshold_pct` (in absolute value) are
/// `Stable`; otherwise the sign decides.
///
/// # Errors
///
/// Returns `InvalidBaseline` if `first` is zero or either value is not finite.
pub fn classify_trend(latest: f64, first: f64, stable_threshold_pct: f64) -> Result<TrendClass> {
    if first == 0.0 || !first.is_finite() {
        return Err(DexaError::InvalidBaseline(format!(
            "cannot compute percent change from baseline {}",
            first
        )));
    }
    if !latest.is_finite() {
        return Err(DexaError::InvalidBaseline(format!(
            "latest value {} is not a number",
            latest
        )));
    }

    let pct_change = (latest - first) / first * 100.0;
    if pct_change.abs() < stable_threshold_pct {
        Ok(TrendClass::Stable)
    } else if latest > first {
        Ok(TrendClass::Increasing)
    } else {
        Ok(TrendClass::Decreasing)
    }
}
