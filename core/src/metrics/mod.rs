//! Derived values shown on the dashboard
//!
//! Everything here is a pure function of the loaded tables and the current
//! selection; nothing in this module reads files or holds state.

mod benchmark;
mod overview;
mod ratio;
mod series;
mod trend;

pub use benchmark::{benchmark_band, summary_text, BenchmarkBand, BenchmarkPoint, BenchmarkView};
pub use overview::{
    body_fat_axis_range, CurrentStatus, DatedValue, KeyRatios, PatientOverview, ProgressRecords,
    ValueRange,
};
pub use ratio::{compute_ratio, fat_lean_ratio, FatLeanRatio};
pub use series::{
    derive_series, latest_measurements, LatestMeasurement, PartSeries, SeriesPoint, TrendView,
};
pub use trend::{
    classify_trend, compute_trend_card, trend_color, trend_direction, trend_signal, TrendCard,
};
