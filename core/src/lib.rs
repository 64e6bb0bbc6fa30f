pub mod cli;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod selection;
pub mod types;

pub use cli::report::{BenchmarkReport, OverviewReport, TrendReport};
pub use dataset::{filter_by_patient_and_parts, Dataset};
pub use error::{DexaError, Result};
pub use metrics::{
    benchmark_band, classify_trend, compute_ratio, compute_trend_card, derive_series,
    latest_measurements, trend_color, trend_direction, trend_signal, BenchmarkBand, BenchmarkView,
    FatLeanRatio, PatientOverview, TrendCard, TrendView,
};
pub use selection::{ButtonState, DashboardEvent, DashboardSession, SelectionState};
pub use types::*;
