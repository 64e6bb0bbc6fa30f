use super::{BenchmarkCategory, BodyPart};
use chrono::NaiveDate;
use serde::Serialize;

/// One DEXA measurement of one body part for one patient on one date
///
/// For a given (patient, date) there is at most one record per body part;
/// the loader drops duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    pub patient_name: String,
    pub scan_date: NaiveDate,
    pub body_part: BodyPart,

    /// Fat mass in grams
    pub fat_grams: f64,

    /// Lean mass in grams
    pub lean_grams: f64,

    /// Bone mineral content in grams
    pub bone_grams: Option<f64>,

    /// Total mass of the region in kilograms
    pub total_mass_kg: Option<f64>,
}

impl ScanRecord {
    /// Creates a record with only the fat/lean fields populated
    pub fn new(
        patient_name: impl Into<String>,
        scan_date: NaiveDate,
        body_part: BodyPart,
        fat_grams: f64,
        lean_grams: f64,
    ) -> Self {
        Self {
            patient_name: patient_name.into(),
            scan_date,
            body_part,
            fat_grams,
            lean_grams,
            bone_grams: None,
            total_mass_kg: None,
        }
    }

    /// Builder: Set bone mineral content
    pub fn with_bone_grams(mut self, grams: f64) -> Self {
        self.bone_grams = Some(grams);
        self
    }

    /// Builder: Set total mass
    pub fn with_total_mass_kg(mut self, kg: f64) -> Self {
        self.total_mass_kg = Some(kg);
        self
    }
}

/// Derived composition indices for one (patient, date)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRecord {
    pub patient_name: String,
    pub scan_date: NaiveDate,
    pub body_fat_percent: Option<f64>,
    pub bmi: Option<f64>,
    pub fat_mass_index: Option<f64>,
    pub lean_mass_index: Option<f64>,
    pub android_gynoid_ratio: Option<f64>,
    pub trunk_leg_ratio: Option<f64>,

    /// Visceral fat area in cm²
    pub visceral_fat_area: Option<f64>,

    /// Basal metabolic rate in kcal/day
    pub basal_metabolic_rate: Option<f64>,

    /// Bone mass as a percentage of body mass
    pub bone_mass_percent: Option<f64>,
}

impl CompositionRecord {
    /// Creates a record with every index missing
    pub fn new(patient_name: impl Into<String>, scan_date: NaiveDate) -> Self {
        Self {
            patient_name: patient_name.into(),
            scan_date,
            body_fat_percent: None,
            bmi: None,
            fat_mass_index: None,
            lean_mass_index: None,
            android_gynoid_ratio: None,
            trunk_leg_ratio: None,
            visceral_fat_area: None,
            basal_metabolic_rate: None,
            bone_mass_percent: None,
        }
    }
}

/// Whole-body fat mass compared against a population reference median
///
/// Produced by an external pipeline and consumed read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    pub patient_name: String,
    pub scan_date: NaiveDate,
    pub total_fat_grams: f64,
    pub median_fat_grams: f64,

    /// Deviation from the median, in percent
    pub deviation_percent: Option<f64>,
    pub category: BenchmarkCategory,
    pub interpretation: Option<String>,
    pub patient_message: Option<String>,
    pub sex: Option<String>,
    pub age_group: Option<String>,
    pub ethnicity: Option<String>,
}

impl BenchmarkRecord {
    /// Returns the deviation from the median, computing it when the table
    /// left the column empty
    pub fn deviation(&self) -> Option<f64> {
        self.deviation_percent.or_else(|| {
            (self.median_fat_grams > 0.0).then(|| {
                (self.total_fat_grams - self.median_fat_grams) / self.median_fat_grams * 100.0
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_benchmark(total: f64, median: f64, deviation: Option<f64>) -> BenchmarkRecord {
        BenchmarkRecord {
            patient_name: "Jane Doe".to_string(),
            scan_date: date(2024, 3, 1),
            total_fat_grams: total,
            median_fat_grams: median,
            deviation_percent: deviation,
            category: BenchmarkCategory::NearMedian,
            interpretation: None,
            patient_message: None,
            sex: None,
            age_group: None,
            ethnicity: None,
        }
    }

    #[test]
    fn test_scan_record_builder() {
        let day = date(2024, 1, 5);
        let record = ScanRecord::new("Jane Doe", day, BodyPart::Total, 20000.0, 45000.0)
            .with_bone_grams(2500.0)
            .with_total_mass_kg(67.5);

        assert_eq!(record.patient_name, "Jane Doe");
        assert_eq!(record.bone_grams, Some(2500.0));
        assert_eq!(record.total_mass_kg, Some(67.5));
    }

    #[test]
    fn test_benchmark_deviation_from_column() {
        let record = make_benchmark(22000.0, 20000.0, Some(9.5));
        assert_eq!(record.deviation(), Some(9.5));
    }

    #[test]
    fn test_benchmark_deviation_computed() {
        let record = make_benchmark(22000.0, 20000.0, None);
        let deviation = record.deviation().unwrap();
        assert!((deviation - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_benchmark_deviation_zero_median() {
        let record = make_benchmark(22000.0, 0.0, None);
        assert_eq!(record.deviation(), None);
    }
}
