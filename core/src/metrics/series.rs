use super::ratio::{compute_ratio, fat_lean_ratio, FatLeanRatio};
use crate::dataset::filter_by_patient_and_parts;
use crate::error::{DexaError, Result};
use crate::selection::SelectionState;
use crate::types::{BodyPart, ScanRecord};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

/// One scan date of a body-part series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub fat_grams: f64,
    pub lean_grams: f64,

    /// `None` when the lean mass cannot divide
    pub ratio: Option<f64>,
}

/// Time series for one selected body part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSeries {
    pub part: BodyPart,
    pub points: Vec<SeriesPoint>,
}

impl PartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Splits records into one series per selected part
///
/// Series follow selection (button) order; each keeps the input order of its
/// records, so pass date-sorted records. Parts without rows yield an empty
/// series rather than being skipped, so series indices line up with the
/// selection.
pub fn derive_series(records: &[&ScanRecord], selection: &SelectionState) -> Vec<PartSeries> {
    selection
        .parts()
        .iter()
        .map(|&part| PartSeries {
            part,
            points: records
                .iter()
                .filter(|r| r.body_part == part)
                .map(|r| SeriesPoint {
                    date: r.scan_date,
                    fat_grams: r.fat_grams,
                    lean_grams: r.lean_grams,
                    ratio: match fat_lean_ratio(r.fat_grams, r.lean_grams) {
                        Ok(ratio) => Some(ratio),
                        Err(e) => {
                            debug!("{} on {}: no ratio: {}", part, r.scan_date, e);
                            None
                        }
                    },
                })
                .collect(),
        })
        .collect()
}

/// Latest measurements of one body part, as shown on the stats card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestMeasurement {
    pub part: BodyPart,
    pub fat_grams: f64,
    pub lean_grams: f64,

    /// `None` renders as "no data" for the ratio line
    pub ratio: Option<FatLeanRatio>,
}

/// Per-part values at the most recent scan date among `records`
///
/// Parts that were not measured on that date are left out.
pub fn latest_measurements(
    records: &[&ScanRecord],
    selection: &SelectionState,
) -> Vec<LatestMeasurement> {
    let Some(latest_date) = records.iter().map(|r| r.scan_date).max() else {
        return Vec::new();
    };

    selection
        .parts()
        .iter()
        .filter_map(|&part| {
            records
                .iter()
                .find(|r| r.scan_date == latest_date && r.body_part == part)
        })
        .map(|r| LatestMeasurement {
            part: r.body_part,
            fat_grams: r.fat_grams,
            lean_grams: r.lean_grams,
            ratio: compute_ratio(r.fat_grams, r.lean_grams).ok(),
        })
        .collect()
}

/// Everything the body-part trend page renders for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub selection: SelectionState,
    pub series: Vec<PartSeries>,
    pub latest_date: NaiveDate,
    pub latest: Vec<LatestMeasurement>,
}

impl TrendView {
    /// Filters the scan table and derives series and the stats card
    ///
    /// # Errors
    ///
    /// Returns `NoData` when no scan matches the patient and selection.
    pub fn build(
        scans: &[ScanRecord],
        patient: Option<&str>,
        selection: &SelectionState,
    ) -> Result<Self> {
        let records = filter_by_patient_and_parts(scans, patient, selection.parts());
        let latest_date = records.iter().map(|r| r.scan_date).max().ok_or_else(|| {
            DexaError::NoData(format!(
                "no scans for {} and {}",
                patient.unwrap_or("any patient"),
                selection
            ))
        })?;

        Ok(Self {
            selection: selection.clone(),
            series: derive_series(&records, selection),
            latest_date,
            latest: latest_measurements(&records, selection),
        })
    }
}
