use crate::types::{BodyPart, ScanRecord};
use std::collections::BTreeSet;

/// Selects the scans of one patient (or all patients) for a set of body parts
///
/// Results are sorted by scan date, then by body part label, matching the
/// order the trend charts consume them in.
///
/// # Arguments
///
/// * `records` - Scan table to filter
/// * `patient` - Patient name to keep, or `None` for every patient
/// * `parts` - Body parts to keep
///
/// # Example
///
/// ```
/// use dexa_core::{filter_by_patient_and_parts, BodyPart, ScanRecord};
/// use chrono::NaiveDate;
/// use std::collections::BTreeSet;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let records = vec![
///     ScanRecord::new("Jane Doe", day, BodyPart::Total, 20000.0, 45000.0),
///     ScanRecord::new("Jane Doe", day, BodyPart::LeftArm, 1500.0, 3000.0),
///     ScanRecord::new("John Roe", day, BodyPart::Total, 18000.0, 52000.0),
/// ];
///
/// let parts = BTreeSet::from([BodyPart::Total]);
/// let jane = filter_by_patient_and_parts(&records, Some("Jane Doe"), &parts);
/// assert_eq!(jane.len(), 1);
///
/// let everyone = filter_by_patient_and_parts(&records, None, &parts);
/// assert_eq!(everyone.len(), 2);
/// ```
pub fn filter_by_patient_and_parts<'a>(
    records: &'a [ScanRecord],
    patient: Option<&str>,
    parts: &BTreeSet<BodyPart>,
) -> Vec<&'a ScanRecord> {
    let mut selected: Vec<&ScanRecord> = records
        .iter()
        .filter(|record| parts.contains(&record.body_part))
        .filter(|record| patient.map_or(true, |name| record.patient_name == name))
        .collect();

    selected.sort_by(|a, b| {
        a.scan_date
            .cmp(&b.scan_date)
            .then_with(|| a.body_part.label().cmp(b.body_part.label()))
    });
    selected
}
