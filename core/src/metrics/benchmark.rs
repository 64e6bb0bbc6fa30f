use crate::error::{DexaError, Result};
use crate::types::{BenchmarkCategory, BenchmarkRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// Expected range around a median series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkBand {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Computes the expected range `median * (1 ± pct)`, elementwise
///
/// Output series have the same length and order as the input.
///
/// # Example
///
/// ```
/// use dexa_core::benchmark_band;
///
/// let band = benchmark_band(&[100.0, 200.0], 0.15);
/// assert_eq!(band.upper, vec![115.0, 230.0]);
/// assert_eq!(band.lower, vec![85.0, 170.0]);
/// ```
pub fn benchmark_band(median: &[f64], pct: f64) -> BenchmarkBand {
    BenchmarkBand {
        upper: median.iter().map(|m| m + m * pct).collect(),
        lower: median.iter().map(|m| m - m * pct).collect(),
    }
}

/// One scan on the benchmark chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkPoint {
    pub date: NaiveDate,
    pub actual_grams: f64,
    pub median_grams: f64,
}

/// Fat mass vs population median for one patient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkView {
    pub patient: String,
    pub points: Vec<BenchmarkPoint>,
    pub band: BenchmarkBand,
    pub latest_category: BenchmarkCategory,
    pub latest_deviation: Option<f64>,
    pub interpretation: Option<String>,
    pub summary: String,
}

impl BenchmarkView {
    /// Builds the benchmark view from a patient's rows
    ///
    /// Usually fed from [`Dataset::benchmarks_for`](crate::Dataset::benchmarks_for);
    /// rows of other patients are ignored.
    ///
    /// # Errors
    ///
    /// Returns `NoData` if the patient has no benchmark rows.
    pub fn build(records: &[&BenchmarkRecord], patient: &str, band_pct: f64) -> Result<Self> {
        let mut rows: Vec<&BenchmarkRecord> = records
            .iter()
            .copied()
            .filter(|r| r.patient_name == patient)
            .collect();
        rows.sort_by_key(|r| r.scan_date);

        let latest = rows.last().ok_or_else(|| {
            DexaError::NoData(format!("no benchmark rows for patient '{}'", patient))
        })?;

        let points: Vec<BenchmarkPoint> = rows
            .iter()
            .map(|r| BenchmarkPoint {
                date: r.scan_date,
                actual_grams: r.total_fat_grams,
                median_grams: r.median_fat_grams,
            })
            .collect();
        let medians: Vec<f64> = points.iter().map(|p| p.median_grams).collect();

        Ok(Self {
            patient: patient.to_string(),
            band: benchmark_band(&medians, band_pct),
            latest_category: latest.category.clone(),
            latest_deviation: latest.deviation(),
            interpretation: latest.interpretation.clone(),
            summary: summary_text(latest),
            points,
        })
    }
}

/// Summary line for the latest benchmark row, e.g. `"(Above Median) - Keep going"`
pub fn summary_text(record: &BenchmarkRecord) -> String {
    format!(
        "({}) - {}",
        record.category,
        record.patient_message.as_deref().unwrap_or("")
    )
    .trim_end_matches([' ', '-'])
    .to_string()
}
