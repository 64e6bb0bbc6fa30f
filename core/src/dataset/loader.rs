//! CSV loading for the scan, composition and benchmark tables
//!
//! Each table is read through a raw serde row type whose field names follow
//! the headers of the exported spreadsheets; the logical column names are
//! accepted as aliases. Rows are then validated one by one: a row whose date
//! does not parse, whose body part is outside the selectable universe, or
//! that fails to deserialize is logged and dropped. Only an unreadable
//! source is an error.

use crate::error::{DexaError, Result};
use crate::types::{BenchmarkCategory, BenchmarkRecord, BodyPart, CompositionRecord, ScanRecord};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Parses a scan date with the configured strftime format
///
/// # Errors
///
/// Returns `InvalidValue` if the text does not match the format.
pub fn parse_scan_date(text: &str, format: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(text.trim(), format)?)
}

/// A deserialized table row that still needs validation
trait RawRow: DeserializeOwned {
    type Record;

    fn scan_date(&self) -> &str;

    /// Converts the row, or explains why it is dropped
    fn into_record(self, date: NaiveDate) -> std::result::Result<Self::Record, String>;
}

#[derive(Debug, Deserialize)]
struct RawScanRow {
    #[serde(rename = "Patient Name", alias = "PatientName")]
    patient_name: String,
    #[serde(rename = "Scan Date", alias = "ScanDate")]
    scan_date: String,
    #[serde(rename = "Body Part", alias = "BodyPart")]
    body_part: String,
    #[serde(rename = "Fat (g)", alias = "FatGrams")]
    fat_grams: f64,
    #[serde(rename = "Lean (g)", alias = "LeanGrams")]
    lean_grams: f64,
    #[serde(rename = "BMC (g)", alias = "BoneGrams", default)]
    bone_grams: Option<f64>,
    #[serde(rename = "Total Mass (kg)", alias = "TotalMassKg", default)]
    total_mass_kg: Option<f64>,
}

impl RawRow for RawScanRow {
    type Record = ScanRecord;

    fn scan_date(&self) -> &str {
        &self.scan_date
    }

    fn into_record(self, date: NaiveDate) -> std::result::Result<ScanRecord, String> {
        let body_part: BodyPart = self
            .body_part
            .parse()
            .map_err(|_| format!("body part '{}' is not tracked", self.body_part))?;

        if !self.fat_grams.is_finite() || self.fat_grams < 0.0 {
            return Err(format!("fat mass {} is not a non-negative number", self.fat_grams));
        }
        if !self.lean_grams.is_finite() {
            return Err(format!("lean mass {} is not a number", self.lean_grams));
        }

        Ok(ScanRecord {
            patient_name: self.patient_name.trim().to_string(),
            scan_date: date,
            body_part,
            fat_grams: self.fat_grams,
            lean_grams: self.lean_grams,
            bone_grams: self.bone_grams,
            total_mass_kg: self.total_mass_kg,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawCompositionRow {
    #[serde(rename = "Patient Name", alias = "PatientName")]
    patient_name: String,
    #[serde(rename = "Scan Date", alias = "ScanDate")]
    scan_date: String,
    #[serde(rename = "Total Body Fat (%)", alias = "BodyFatPercent", default)]
    body_fat_percent: Option<f64>,
    #[serde(rename = "BMI (kg/m²)", alias = "BMI", default)]
    bmi: Option<f64>,
    #[serde(rename = "Fat Mass Index (FMI)", alias = "FatMassIndex", default)]
    fat_mass_index: Option<f64>,
    #[serde(rename = "Lean Mass Index (kg/m²)", alias = "LeanMassIndex", default)]
    lean_mass_index: Option<f64>,
    #[serde(rename = "Android/Gynoid Fat Ratio", alias = "AndroidGynoidRatio", default)]
    android_gynoid_ratio: Option<f64>,
    #[serde(rename = "Trunk/Legs Fat Ratio", alias = "TrunkLegRatio", default)]
    trunk_leg_ratio: Option<f64>,
    #[serde(rename = "Visceral Fat Area (cm²)", alias = "VisceralFatArea", default)]
    visceral_fat_area: Option<f64>,
    #[serde(
        rename = "Basal Metabolic Rate (kcal/day)",
        alias = "BasalMetabolicRate",
        default
    )]
    basal_metabolic_rate: Option<f64>,
    #[serde(rename = "Total Bone Mass (%)", alias = "BoneMassPercent", default)]
    bone_mass_percent: Option<f64>,
}

impl RawRow for RawCompositionRow {
    type Record = CompositionRecord;

    fn scan_date(&self) -> &str {
        &self.scan_date
    }

    fn into_record(self, date: NaiveDate) -> std::result::Result<CompositionRecord, String> {
        Ok(CompositionRecord {
            patient_name: self.patient_name.trim().to_string(),
            scan_date: date,
            body_fat_percent: self.body_fat_percent,
            bmi: self.bmi,
            fat_mass_index: self.fat_mass_index,
            lean_mass_index: self.lean_mass_index,
            android_gynoid_ratio: self.android_gynoid_ratio,
            trunk_leg_ratio: self.trunk_leg_ratio,
            visceral_fat_area: self.visceral_fat_area,
            basal_metabolic_rate: self.basal_metabolic_rate,
            bone_mass_percent: self.bone_mass_percent,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawBenchmarkRow {
    #[serde(rename = "Patient Name", alias = "PatientName")]
    patient_name: String,
    #[serde(rename = "Scan Date", alias = "ScanDate")]
    scan_date: String,
    #[serde(rename = "Body Part", alias = "BodyPart", default)]
    body_part: Option<String>,
    #[serde(rename = "TotalBodyFat_g", alias = "TotalBodyFatGrams")]
    total_fat_grams: f64,
    #[serde(rename = "NHANES_Median_FatMass_g", alias = "NHANESMedianFatMassGrams")]
    median_fat_grams: f64,
    #[serde(
        rename = "FatMass_vs_Median_%",
        alias = "FatMassVsMedianPercent",
        default
    )]
    deviation_percent: Option<f64>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Interpretation", default)]
    interpretation: Option<String>,
    #[serde(rename = "Patient_Message", alias = "PatientMessage", default)]
    patient_message: Option<String>,
    #[serde(rename = "Sex", default)]
    sex: Option<String>,
    #[serde(rename = "AgeGroup", alias = "Age Group", default)]
    age_group: Option<String>,
    #[serde(rename = "Ethnicity", default)]
    ethnicity: Option<String>,
}

impl RawRow for RawBenchmarkRow {
    type Record = BenchmarkRecord;

    fn scan_date(&self) -> &str {
        &self.scan_date
    }

    fn into_record(self, date: NaiveDate) -> std::result::Result<BenchmarkRecord, String> {
        if let Some(part) = self.body_part.as_deref() {
            if !part.trim().is_empty() && !part.trim().eq_ignore_ascii_case("total") {
                return Err(format!("benchmark row for '{}' is not whole-body", part));
            }
        }

        Ok(BenchmarkRecord {
            patient_name: self.patient_name.trim().to_string(),
            scan_date: date,
            total_fat_grams: self.total_fat_grams,
            median_fat_grams: self.median_fat_grams,
            deviation_percent: self.deviation_percent,
            category: BenchmarkCategory::from_str(self.category.as_deref().unwrap_or("")),
            interpretation: non_empty(self.interpretation),
            patient_message: non_empty(self.patient_message),
            sex: non_empty(self.sex),
            age_group: non_empty(self.age_group),
            ethnicity: non_empty(self.ethnicity),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads and validates every row of a table
///
/// Rows keep their source order; callers sort afterwards.
fn read_table<R: RawRow, S: Read>(source: S, date_format: &str, table: &str) -> Vec<R::Record> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (index, row) in reader.deserialize::<R>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{} line {}: skipping malformed row: {}", table, line, e);
                dropped += 1;
                continue;
            }
        };

        let date = match parse_scan_date(raw.scan_date(), date_format) {
            Ok(date) => date,
            Err(_) => {
                warn!(
                    "{} line {}: skipping row with unparseable date '{}'",
                    table,
                    line,
                    raw.scan_date()
                );
                dropped += 1;
                continue;
            }
        };

        match raw.into_record(date) {
            Ok(record) => records.push(record),
            Err(reason) => {
                debug!("{} line {}: skipping row: {}", table, line, reason);
                dropped += 1;
            }
        }
    }

    info!("{}: loaded {} rows, dropped {}", table, records.len(), dropped);
    records
}

fn open_source(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path)
        .map_err(|e| DexaError::DataUnavailable(format!("{}: {}", path.display(), e)))
}

/// Sorts scans by date and drops repeated (patient, date, body part) rows
fn normalize_scans(mut records: Vec<ScanRecord>) -> Vec<ScanRecord> {
    records.sort_by_key(|r| r.scan_date);

    let mut seen = HashSet::new();
    records.retain(|r| {
        let fresh = seen.insert((r.patient_name.clone(), r.scan_date, r.body_part));
        if !fresh {
            warn!(
                "Duplicate {} record for {} on {}; keeping the first",
                r.body_part, r.patient_name, r.scan_date
            );
        }
        fresh
    });
    records
}

/// Reads scan records from any CSV source, sorted by scan date
pub fn read_scans<S: Read>(source: S, date_format: &str) -> Vec<ScanRecord> {
    normalize_scans(read_table::<RawScanRow, S>(source, date_format, "scans"))
}

/// Reads composition records from any CSV source, sorted by scan date
pub fn read_composition<S: Read>(source: S, date_format: &str) -> Vec<CompositionRecord> {
    let mut records = read_table::<RawCompositionRow, S>(source, date_format, "composition");
    records.sort_by_key(|r| r.scan_date);
    records
}

/// Reads benchmark records from any CSV source, sorted by scan date
pub fn read_benchmarks<S: Read>(source: S, date_format: &str) -> Vec<BenchmarkRecord> {
    let mut records = read_table::<RawBenchmarkRow, S>(source, date_format, "benchmarks");
    records.sort_by_key(|r| r.scan_date);
    records
}

/// Loads the scan table, sorted by scan date ascending
///
/// # Errors
///
/// Returns `DataUnavailable` if the file cannot be opened. Individual bad
/// rows never fail the load.
pub fn try_load_scans(path: &Path, date_format: &str) -> Result<Vec<ScanRecord>> {
    Ok(read_scans(open_source(path)?, date_format))
}

/// Loads the composition table, sorted by scan date ascending
pub fn try_load_composition(path: &Path, date_format: &str) -> Result<Vec<CompositionRecord>> {
    Ok(read_composition(open_source(path)?, date_format))
}

/// Loads the benchmark table, sorted by scan date ascending
pub fn try_load_benchmarks(path: &Path, date_format: &str) -> Result<Vec<BenchmarkRecord>> {
    Ok(read_benchmarks(open_source(path)?, date_format))
}

/// Loads the scan table, degrading to an empty table if it is unreadable
pub fn load_scans(path: &Path, date_format: &str) -> Vec<ScanRecord> {
    degrade(try_load_scans(path, date_format))
}

/// Loads the composition table, degrading to an empty table if it is unreadable
pub fn load_composition(path: &Path, date_format: &str) -> Vec<CompositionRecord> {
    degrade(try_load_composition(path, date_format))
}

/// Loads the benchmark table, degrading to an empty table if it is unreadable
pub fn load_benchmarks(path: &Path, date_format: &str) -> Vec<BenchmarkRecord> {
    degrade(try_load_benchmarks(path, date_format))
}

fn degrade<T>(result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(e) => {
            error!("Error loading data: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCAN_HEADER: &str = "Patient Name,Scan Date,Body Part,Fat (g),Lean (g),BMC (g),Total Mass (kg)\n";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_scan_date() {
        assert_eq!(parse_scan_date("05-03-2024", "%d-%m-%Y").unwrap(), date(2024, 3, 5));
        assert_eq!(parse_scan_date(" 03-05-2024 ", "%m-%d-%Y").unwrap(), date(2024, 3, 5));
        assert!(matches!(
            parse_scan_date("2024/03/05", "%d-%m-%Y"),
            Err(DexaError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_read_scans_drops_only_bad_date() {
        let csv = format!(
            "{}{}{}{}{}",
            SCAN_HEADER,
            "Jane Doe,01-01-2024,Total,20000,45000,2500,67.5\n",
            "Jane Doe,32-01-2024,Total,21000,45000,2500,68.0\n",
            "Jane Doe,01-02-2024,Left Arm,1500,3000,,\n",
            "John Roe,01-03-2024,Total,18000,52000,2800,72.8\n",
        );

        let records = read_scans(csv.as_bytes(), "%d-%m-%Y");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].scan_date, date(2024, 1, 1));
        assert_eq!(records[0].bone_grams, Some(2500.0));
        assert_eq!(records[1].body_part, BodyPart::LeftArm);
        assert_eq!(records[1].bone_grams, None);
        assert_eq!(records[2].patient_name, "John Roe");
    }

    #[test]
    fn test_read_scans_keeps_source_order_within_date() {
        let csv = format!(
            "{}{}{}{}",
            SCAN_HEADER,
            "Jane Doe,01-01-2024,Right Leg,4000,9000,,\n",
            "Jane Doe,01-01-2024,Left Arm,1500,3000,,\n",
            "Jane Doe,01-01-2024,Total,20000,45000,,\n",
        );

        let parts: Vec<BodyPart> = read_scans(csv.as_bytes(), "%d-%m-%Y")
            .into_iter()
            .map(|r| r.body_part)
            .collect();

        assert_eq!(parts, vec![BodyPart::RightLeg, BodyPart::LeftArm, BodyPart::Total]);
    }

    #[test]
    fn test_read_scans_sorts_by_date() {
        let csv = format!(
            "{}{}{}",
            SCAN_HEADER,
            "Jane Doe,01-06-2024,Total,19000,46000,,\n",
            "Jane Doe,01-01-2024,Total,20000,45000,,\n",
        );

        let records = read_scans(csv.as_bytes(), "%d-%m-%Y");
        assert_eq!(records[0].scan_date, date(2024, 1, 1));
        assert_eq!(records[1].scan_date, date(2024, 6, 1));
    }

    #[test]
    fn test_read_scans_drops_untracked_parts_and_malformed_rows() {
        let csv = format!(
            "{}{}{}{}",
            SCAN_HEADER,
            "Jane Doe,01-01-2024,Pelvis,900,2000,,\n",
            "Jane Doe,01-01-2024,Total,lots,45000,,\n",
            "Jane Doe,01-01-2024,Gynoid,3000,6000,,\n",
        );

        let records = read_scans(csv.as_bytes(), "%d-%m-%Y");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body_part, BodyPart::Gynoid);
    }

    #[test]
    fn test_read_scans_drops_duplicates() {
        let csv = format!(
            "{}{}{}",
            SCAN_HEADER,
            "Jane Doe,01-01-2024,Total,20000,45000,,\n",
            "Jane Doe,01-01-2024,Total,99999,45000,,\n",
        );

        let records = read_scans(csv.as_bytes(), "%d-%m-%Y");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fat_grams, 20000.0);
    }

    #[test]
    fn test_read_scans_logical_headers() {
        let csv = "PatientName,ScanDate,BodyPart,FatGrams,LeanGrams\n\
                   Jane Doe,2024-01-01,Android,1200,3100\n";

        let records = read_scans(csv.as_bytes(), "%Y-%m-%d");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body_part, BodyPart::Android);
        assert_eq!(records[0].lean_grams, 3100.0);
        assert_eq!(records[0].total_mass_kg, None);
    }

    #[test]
    fn test_read_composition() {
        let csv = "Patient Name,Scan Date,Total Body Fat (%),BMI (kg/m²),Visceral Fat Area (cm²)\n\
                   Jane Doe,01-06-2024,28.1,23.9,\n\
                   Jane Doe,01-01-2024,30.2,24.4,88.0\n";

        let records = read_composition(csv.as_bytes(), "%d-%m-%Y");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body_fat_percent, Some(30.2));
        assert_eq!(records[0].visceral_fat_area, Some(88.0));
        assert_eq!(records[1].bmi, Some(23.9));
        assert_eq!(records[1].visceral_fat_area, None);
        assert_eq!(records[1].fat_mass_index, None);
    }

    #[test]
    fn test_read_benchmarks_keeps_total_only() {
        let csv = "Patient Name,Scan Date,Body Part,TotalBodyFat_g,NHANES_Median_FatMass_g,FatMass_vs_Median_%,Category,Interpretation,Patient_Message,Sex,AgeGroup,Ethnicity\n\
                   Jane Doe,01-01-2024,Total,22000,20000,10.0,Above Median,Slightly high,Keep going,F,40-49,\n\
                   Jane Doe,01-01-2024,Left Arm,1500,1400,7.1,Above Median,,,F,40-49,\n";

        let records = read_benchmarks(csv.as_bytes(), "%d-%m-%Y");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.category, BenchmarkCategory::AboveMedian);
        assert_eq!(record.patient_message.as_deref(), Some("Keep going"));
        assert_eq!(record.sex.as_deref(), Some("F"));
        assert_eq!(record.ethnicity, None);
        assert_eq!(record.deviation(), Some(10.0));
    }

    #[test]
    fn test_try_load_missing_file() {
        let err = try_load_scans(Path::new("/nonexistent/scans.csv"), "%d-%m-%Y").unwrap_err();
        assert!(matches!(err, DexaError::DataUnavailable(_)));
    }

    #[test]
    fn test_load_missing_file_degrades_to_empty() {
        assert!(load_scans(Path::new("/nonexistent/scans.csv"), "%d-%m-%Y").is_empty());
        assert!(load_composition(Path::new("/nonexistent/c.csv"), "%d-%m-%Y").is_empty());
        assert!(load_benchmarks(Path::new("/nonexistent/b.csv"), "%d-%m-%Y").is_empty());
    }

    #[test]
    fn test_load_scans_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SCAN_HEADER).unwrap();
        writeln!(file, "Jane Doe,01-01-2024,Total,20000,45000,2500,67.5").unwrap();
        writeln!(file, "Jane Doe,not a date,Total,20000,45000,2500,67.5").unwrap();

        let records = load_scans(file.path(), "%d-%m-%Y");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_mass_kg, Some(67.5));
    }
}
