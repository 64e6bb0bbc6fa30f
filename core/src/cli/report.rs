use crate::metrics::{BenchmarkView, PatientOverview, TrendView};
use std::fmt;

const NO_DATA: &str = "No data available";

fn or_no_data(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => NO_DATA.to_string(),
    }
}

/// Text report for the patient overview page
pub struct OverviewReport<'a> {
    overview: &'a PatientOverview,
}

impl<'a> OverviewReport<'a> {
    /// Creates a new text report
    pub fn new(overview: &'a PatientOverview) -> Self {
        Self { overview }
    }
}

impl<'a> fmt::Display for OverviewReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.overview;

        writeln!(f, "Patient Overview: {}", o.patient)?;
        writeln!(f, "=================")?;
        writeln!(f)?;

        writeln!(f, "Key Metrics")?;
        writeln!(f, "-----------")?;
        for card in &o.key_metrics {
            writeln!(f, "{:<16}{:<12}{}", card.label, card.value_text(), card.delta_text())?;
        }
        writeln!(f)?;

        let s = &o.status;
        writeln!(f, "Current Status")?;
        writeln!(f, "--------------")?;
        writeln!(
            f,
            "Last Scan:      {} ({} days ago)",
            s.last_scan.format("%Y-%m-%d"),
            s.days_since
        )?;
        writeln!(f, "Fat Mass:       {:.1} kg", s.fat_mass_kg)?;
        writeln!(f, "Bone Mass:      {}", or_no_data(s.bone_mass_kg, 2, " kg"))?;
        writeln!(f, "Bone Mass %:    {}", or_no_data(s.bone_mass_percent, 1, "%"))?;
        writeln!(
            f,
            "BMR:            {}",
            or_no_data(s.basal_metabolic_rate, 0, " kcal/day")
        )?;
        writeln!(f)?;

        let r = &o.records;
        writeln!(f, "Progress Records")?;
        writeln!(f, "----------------")?;
        match &r.best_lean_mass_kg {
            Some(best) => writeln!(
                f,
                "Best Lean Mass: {:.1} kg on {}",
                best.value,
                best.date.format("%Y-%m-%d")
            )?,
            None => writeln!(f, "Best Lean Mass: {}", NO_DATA)?,
        }
        match &r.lowest_body_fat {
            Some(low) => writeln!(
                f,
                "Lowest Body Fat: {:.1}% on {}",
                low.value,
                low.date.format("%Y-%m-%d")
            )?,
            None => writeln!(f, "Lowest Body Fat: {}", NO_DATA)?,
        }
        match &r.weight_range {
            Some(range) => writeln!(
                f,
                "Weight Range:   {:.1} - {:.1} kg ({:.1} kg span)",
                range.min,
                range.max,
                range.span()
            )?,
            None => writeln!(f, "Weight Range:   {}", NO_DATA)?,
        }
        writeln!(f)?;

        writeln!(f, "Key Ratios")?;
        writeln!(f, "----------")?;
        match &o.ratios {
            Some(k) => {
                writeln!(f, "FMI:            {}", or_no_data(k.fat_mass_index, 1, ""))?;
                writeln!(f, "LMI:            {}", or_no_data(k.lean_mass_index, 1, ""))?;
                writeln!(
                    f,
                    "Android/Gynoid: {}",
                    or_no_data(k.android_gynoid_ratio, 2, "")
                )?;
                writeln!(f, "Trunk/Legs:     {}", or_no_data(k.trunk_leg_ratio, 2, ""))?;
            }
            None => writeln!(f, "{}", NO_DATA)?,
        }

        if let Some(trend) = o.fat_trend {
            writeln!(f)?;
            writeln!(f, "Fat Mass Trend: {}", trend)?;
        }

        Ok(())
    }
}

/// Text report for the fat-mass benchmark page
pub struct BenchmarkReport<'a> {
    view: &'a BenchmarkView,
}

impl<'a> BenchmarkReport<'a> {
    pub fn new(view: &'a BenchmarkView) -> Self {
        Self { view }
    }
}

impl<'a> fmt::Display for BenchmarkReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.view;

        writeln!(f, "Fat Mass Benchmark: {}", v.patient)?;
        writeln!(f, "===================")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<12}{:>12}{:>12}{:>12}{:>12}",
            "Date", "Actual (g)", "Median (g)", "Low (g)", "High (g)"
        )?;
        for (i, point) in v.points.iter().enumerate() {
            writeln!(
                f,
                "{:<12}{:>12.0}{:>12.0}{:>12.0}{:>12.0}",
                point.date.format("%Y-%m-%d").to_string(),
                point.actual_grams,
                point.median_grams,
                v.band.lower.get(i).copied().unwrap_or(f64::NAN),
                v.band.upper.get(i).copied().unwrap_or(f64::NAN),
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Category:       {}", v.latest_category)?;
        if let Some(deviation) = v.latest_deviation {
            writeln!(f, "Deviation:      {:+.1}%", deviation)?;
        }
        if let Some(interpretation) = &v.interpretation {
            writeln!(f, "Interpretation: {}", interpretation)?;
        }
        writeln!(f, "Summary:        {}", v.summary)?;

        Ok(())
    }
}

/// Text report for the body-part trend page
pub struct TrendReport<'a> {
    view: &'a TrendView,
}

impl<'a> TrendReport<'a> {
    pub fn new(view: &'a TrendView) -> Self {
        Self { view }
    }
}

impl<'a> fmt::Display for TrendReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.view;

        writeln!(f, "Body Part Trends")?;
        writeln!(f, "================")?;
        writeln!(f)?;

        let mut current_group = "";
        for button in v.selection.button_states() {
            if button.group.label != current_group {
                current_group = button.group.label;
                writeln!(f, "{}:", current_group)?;
            }
            let mark = if button.selected { "x" } else { " " };
            writeln!(f, "  [{}] {}", mark, button.part)?;
        }
        writeln!(f)?;

        for series in &v.series {
            writeln!(f, "{}", series.part)?;
            if series.is_empty() {
                writeln!(f, "  {}", NO_DATA)?;
                continue;
            }
            for point in &series.points {
                writeln!(
                    f,
                    "  {}  fat {:>8.0} g  lean {:>8.0} g  ratio {}",
                    point.date.format("%Y-%m-%d"),
                    point.fat_grams,
                    point.lean_grams,
                    or_no_data(point.ratio, 3, "")
                )?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Latest Scan ({})", v.latest_date.format("%Y-%m-%d"))?;
        writeln!(f, "------------------------")?;
        for m in &v.latest {
            let ratio = m
                .ratio
                .map(|r| r.to_string())
                .unwrap_or_else(|| NO_DATA.to_string());
            writeln!(
                f,
                "{:<10} Fat: {:.0} g  Lean: {:.0} g  Fat:Lean {}",
                m.part.label(),
                m.fat_grams,
                m.lean_grams,
                ratio
            )?;
        }

        Ok(())
    }
}
