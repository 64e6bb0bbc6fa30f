//! Read-only access to the loaded DEXA tables
//!
//! The three tables are loaded once into a [`Dataset`] snapshot which is then
//! shared (behind an `Arc`) by every session. Nothing mutates a snapshot
//! after construction.

mod filter;
pub mod loader;

pub use filter::filter_by_patient_and_parts;
pub use loader::{
    load_benchmarks, load_composition, load_scans, parse_scan_date, try_load_benchmarks,
    try_load_composition, try_load_scans,
};

use crate::types::{
    BenchmarkRecord, BodyPart, CompositionRecord, DashboardConfig, DataPaths, ScanRecord,
};
use log::info;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Immutable snapshot of the scan, composition and benchmark tables
///
/// Each table is sorted by scan date ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    scans: Vec<ScanRecord>,
    composition: Vec<CompositionRecord>,
    benchmarks: Vec<BenchmarkRecord>,
}

impl Dataset {
    /// Builds a snapshot from already-loaded tables
    ///
    /// Tables are re-sorted by scan date (stable), so callers may pass rows
    /// in any order.
    pub fn new(
        mut scans: Vec<ScanRecord>,
        mut composition: Vec<CompositionRecord>,
        mut benchmarks: Vec<BenchmarkRecord>,
    ) -> Self {
        scans.sort_by_key(|r| r.scan_date);
        composition.sort_by_key(|r| r.scan_date);
        benchmarks.sort_by_key(|r| r.scan_date);
        Self {
            scans,
            composition,
            benchmarks,
        }
    }

    /// Loads all three tables
    ///
    /// An unreadable table degrades to an empty one; see
    /// [`loader::load_scans`].
    pub fn load(paths: &DataPaths, config: &DashboardConfig) -> Self {
        let format = config.date_format.as_str();
        let dataset = Self {
            scans: load_scans(&paths.scans, format),
            composition: load_composition(&paths.composition, format),
            benchmarks: load_benchmarks(&paths.benchmarks, format),
        };
        info!(
            "Dataset loaded: {} scans, {} composition rows, {} benchmark rows, {} patients",
            dataset.scans.len(),
            dataset.composition.len(),
            dataset.benchmarks.len(),
            dataset.patients().len()
        );
        dataset
    }

    /// Loads all three tables into a shareable snapshot
    pub fn load_shared(paths: &DataPaths, config: &DashboardConfig) -> Arc<Self> {
        Arc::new(Self::load(paths, config))
    }

    /// Returns true when no table holds any row
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty() && self.composition.is_empty() && self.benchmarks.is_empty()
    }

    /// Scan table, sorted by date
    pub fn scans(&self) -> &[ScanRecord] {
        &self.scans
    }

    /// Composition table, sorted by date
    pub fn composition(&self) -> &[CompositionRecord] {
        &self.composition
    }

    /// Benchmark table, sorted by date
    pub fn benchmarks(&self) -> &[BenchmarkRecord] {
        &self.benchmarks
    }

    /// Distinct patient names across all tables, sorted
    pub fn patients(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .scans
            .iter()
            .map(|r| r.patient_name.as_str())
            .chain(self.composition.iter().map(|r| r.patient_name.as_str()))
            .chain(self.benchmarks.iter().map(|r| r.patient_name.as_str()))
            .filter(|name| !name.is_empty())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// First patient of the scan table in sorted order, used as the initial
    /// dropdown value
    ///
    /// Patients that only appear in the composition or benchmark tables have
    /// no overview to show, so they are never the default.
    pub fn default_patient(&self) -> Option<String> {
        self.scans
            .iter()
            .map(|r| r.patient_name.as_str())
            .filter(|name| !name.is_empty())
            .min()
            .map(str::to_string)
    }

    /// Scans of one patient for one body part, sorted by date
    pub fn scans_for(&self, patient: &str, part: BodyPart) -> Vec<&ScanRecord> {
        self.scans
            .iter()
            .filter(|r| r.patient_name == patient && r.body_part == part)
            .collect()
    }

    /// Composition rows of one patient, sorted by date
    pub fn composition_for(&self, patient: &str) -> Vec<&CompositionRecord> {
        self.composition
            .iter()
            .filter(|r| r.patient_name == patient)
            .collect()
    }

    /// Benchmark rows of one patient, sorted by date
    pub fn benchmarks_for(&self, patient: &str) -> Vec<&BenchmarkRecord> {
        self.benchmarks
            .iter()
            .filter(|r| r.patient_name == patient)
            .collect()
    }
}
