//! Core type definitions for body-composition data
//!
//! This module provides the fundamental types used throughout the dexa library:
//! - [`BodyPart`]: Anatomical regions that can be selected on the dashboard
//! - [`BodyPartGroup`]: Static grouping of body-part buttons
//! - [`ScanRecord`], [`CompositionRecord`], [`BenchmarkRecord`]: Input table rows
//! - [`ToggleMode`]: Semantics of body-part button clicks
//! - [`TrendDirection`], [`TrendClass`], [`BenchmarkCategory`]: Derived classifications
//! - [`MetricConfig`], [`TrendPalette`]: Per-metric display and trend coloring
//! - [`DashboardConfig`]: Dashboard-wide settings

mod config;
mod enums;
mod groups;
mod metric;
mod records;

pub use config::{
    DashboardConfig, DataPaths, DEFAULT_BAND_PCT, DEFAULT_DATE_FORMAT,
    DEFAULT_STABLE_THRESHOLD_PCT,
};
pub use enums::{
    BenchmarkCategory, BodyPart, ToggleMode, TrendClass, TrendDirection, TrendSignal,
};
pub use groups::{group_of, BodyPartGroup, BODY_PART_GROUPS};
pub use metric::{MetricConfig, TrendPalette};
pub use records::{BenchmarkRecord, CompositionRecord, ScanRecord};
