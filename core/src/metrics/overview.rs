//! Patient overview: headline cards, current status, records and ratios
//!
//! Everything on the overview page is derived from the patient's whole-body
//! (`Total`) scans plus the composition table. Missing composition rows
//! leave the corresponding fields empty instead of failing the page.

use super::trend::{classify_trend, compute_trend_card, TrendCard};
use crate::dataset::Dataset;
use crate::error::{DexaError, Result};
use crate::types::{
    BodyPart, CompositionRecord, DashboardConfig, MetricConfig, ScanRecord, TrendClass,
};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

/// A value together with the scan date it was measured on
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatedValue {
    pub value: f64,
    pub date: NaiveDate,
}

/// Observed minimum and maximum of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Returns `max - min`
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, v| match range {
            None => Some(ValueRange { min: v, max: v }),
            Some(r) => Some(ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }
}

/// Snapshot of the most recent scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStatus {
    pub last_scan: NaiveDate,
    pub days_since: i64,
    pub fat_mass_kg: f64,
    pub bone_mass_kg: Option<f64>,
    pub bone_mass_percent: Option<f64>,
    pub basal_metabolic_rate: Option<f64>,
}

/// Personal bests across all scans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecords {
    /// Highest whole-body lean mass, in kg
    pub best_lean_mass_kg: Option<DatedValue>,

    /// Lowest body-fat percentage
    pub lowest_body_fat: Option<DatedValue>,

    /// Body weight range in kg
    pub weight_range: Option<ValueRange>,
}

/// Latest composition ratios
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRatios {
    pub fat_mass_index: Option<f64>,
    pub lean_mass_index: Option<f64>,
    pub android_gynoid_ratio: Option<f64>,
    pub trunk_leg_ratio: Option<f64>,
}

/// Everything the overview page renders for one patient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientOverview {
    pub patient: String,

    /// Weight, body fat %, lean mass, BMI (those with data)
    pub key_metrics: Vec<TrendCard>,
    pub status: CurrentStatus,
    pub records: ProgressRecords,
    pub ratios: Option<KeyRatios>,

    /// Y axis range for the body-fat chart, padded by 5 points and clamped
    /// to [0, 100]
    pub body_fat_axis: Option<ValueRange>,
    pub body_fat_series: Vec<DatedValue>,
    pub visceral_fat_series: Vec<DatedValue>,

    /// Whole-body fat mass from first to latest scan
    pub fat_trend: Option<TrendClass>,
}

impl PatientOverview {
    /// Builds the overview for one patient
    ///
    /// `today` is used for the "days since last scan" count.
    ///
    /// # Errors
    ///
    /// Returns `NoData` if the patient has no whole-body scans.
    pub fn build(
        dataset: &Dataset,
        patient: &str,
        today: NaiveDate,
        config: &DashboardConfig,
    ) -> Result<Self> {
        let totals = dataset.scans_for(patient, BodyPart::Total);
        let composition = dataset.composition_for(patient);

        let (latest, previous) = last_two(&totals).ok_or_else(|| {
            DexaError::NoData(format!("no whole-body scans for patient '{}'", patient))
        })?;
        let comp_pair = last_two(&composition);

        Ok(Self {
            patient: patient.to_string(),
            key_metrics: key_metrics(latest, previous, comp_pair, config),
            status: current_status(latest, comp_pair.map(|(c, _)| c), today),
            records: progress_records(&totals, &composition),
            ratios: comp_pair.map(|(c, _)| KeyRatios {
                fat_mass_index: c.fat_mass_index,
                lean_mass_index: c.lean_mass_index,
                android_gynoid_ratio: c.android_gynoid_ratio,
                trunk_leg_ratio: c.trunk_leg_ratio,
            }),
            body_fat_axis: body_fat_axis_range(
                composition.iter().filter_map(|c| c.body_fat_percent),
            ),
            body_fat_series: dated(&composition, |c| c.body_fat_percent),
            visceral_fat_series: dated(&composition, |c| c.visceral_fat_area),
            fat_trend: fat_trend(&totals, config.stable_threshold_pct),
        })
    }
}

/// Latest and previous entries; the previous falls back to the latest
fn last_two<'a, T>(rows: &[&'a T]) -> Option<(&'a T, &'a T)> {
    let latest = *rows.last()?;
    let previous = rows.len().checked_sub(2).map_or(latest, |i| rows[i]);
    Some((latest, previous))
}

fn key_metrics(
    latest: &ScanRecord,
    previous: &ScanRecord,
    comp: Option<(&CompositionRecord, &CompositionRecord)>,
    config: &DashboardConfig,
) -> Vec<TrendCard> {
    let palette = &config.palette;
    let mut cards = Vec::with_capacity(4);

    if let Some(weight) = latest.total_mass_kg {
        cards.push(compute_trend_card(
            weight,
            previous.total_mass_kg,
            &MetricConfig::WEIGHT,
            palette,
        ));
    }

    if let Some((c, p)) = comp {
        if let Some(body_fat) = c.body_fat_percent {
            cards.push(compute_trend_card(
                body_fat,
                p.body_fat_percent,
                &MetricConfig::BODY_FAT_PERCENT,
                palette,
            ));
        }
    }

    cards.push(compute_trend_card(
        latest.lean_grams,
        Some(previous.lean_grams),
        &MetricConfig::LEAN_MASS,
        palette,
    ));

    if let Some((c, p)) = comp {
        if let Some(bmi) = c.bmi {
            cards.push(compute_trend_card(bmi, p.bmi, &MetricConfig::BMI, palette));
        }
    }

    cards
}

fn current_status(
    latest: &ScanRecord,
    comp: Option<&CompositionRecord>,
    today: NaiveDate,
) -> CurrentStatus {
    CurrentStatus {
        last_scan: latest.scan_date,
        days_since: (today - latest.scan_date).num_days(),
        fat_mass_kg: latest.fat_grams / 1000.0,
        bone_mass_kg: latest.bone_grams.map(|g| g / 1000.0),
        bone_mass_percent: comp.and_then(|c| c.bone_mass_percent),
        basal_metabolic_rate: comp.and_then(|c| c.basal_metabolic_rate),
    }
}

fn progress_records(totals: &[&ScanRecord], composition: &[&CompositionRecord]) -> ProgressRecords {
    // First occurrence wins on ties
    let best_lean = totals.iter().fold(None::<&ScanRecord>, |best, r| match best {
        Some(b) if b.lean_grams >= r.lean_grams => Some(b),
        _ => Some(*r),
    });

    let lowest_fat = composition
        .iter()
        .filter_map(|c| c.body_fat_percent.map(|v| (v, c.scan_date)))
        .fold(None::<DatedValue>, |best, (value, date)| match best {
            Some(b) if b.value <= value => Some(b),
            _ => Some(DatedValue { value, date }),
        });

    ProgressRecords {
        best_lean_mass_kg: best_lean.map(|r| DatedValue {
            value: r.lean_grams / 1000.0,
            date: r.scan_date,
        }),
        lowest_body_fat: lowest_fat,
        weight_range: ValueRange::of(totals.iter().filter_map(|r| r.total_mass_kg)),
    }
}

/// Padded, clamped y range for a body-fat percentage chart
pub fn body_fat_axis_range(values: impl IntoIterator<Item = f64>) -> Option<ValueRange> {
    ValueRange::of(values).map(|r| ValueRange {
        min: (r.min - 5.0).max(0.0),
        max: (r.max + 5.0).min(100.0),
    })
}

fn dated(
    composition: &[&CompositionRecord],
    field: impl Fn(&CompositionRecord) -> Option<f64>,
) -> Vec<DatedValue> {
    composition
        .iter()
        .filter_map(|c| {
            field(*c).map(|value| DatedValue {
                value,
                date: c.scan_date,
            })
        })
        .collect()
}

fn fat_trend(totals: &[&ScanRecord], stable_threshold_pct: f64) -> Option<TrendClass> {
    let first = totals.first()?;
    let latest = totals.last()?;
    match classify_trend(latest.fat_grams, first.fat_grams, stable_threshold_pct) {
        Ok(class) => Some(class),
        Err(e) => {
            debug!("No fat trend for {}: {}", latest.patient_name, e);
            None
        }
    }
}
