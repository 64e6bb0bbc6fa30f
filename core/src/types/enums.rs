use crate::error::DexaError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Anatomical region reported by a DEXA scan
///
/// The variant order is the button order of the selection panel, so a
/// `BTreeSet<BodyPart>` iterates parts the way they are laid out on screen.
/// Regions the scanner reports beyond these (ribs, spine, pelvis...) are not
/// part of the universe and are dropped at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyPart {
    #[serde(rename = "Left Arm")]
    LeftArm,
    #[serde(rename = "Right Arm")]
    RightArm,
    #[serde(rename = "Left Leg")]
    LeftLeg,
    #[serde(rename = "Right Leg")]
    RightLeg,
    Total,
    Android,
    Gynoid,
}

impl BodyPart {
    /// Every selectable body part, in button order
    pub const ALL: [BodyPart; 7] = [
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
        BodyPart::Total,
        BodyPart::Android,
        BodyPart::Gynoid,
    ];

    /// Returns the label used in the input tables and on the buttons
    pub fn label(&self) -> &'static str {
        match self {
            BodyPart::LeftArm => "Left Arm",
            BodyPart::RightArm => "Right Arm",
            BodyPart::LeftLeg => "Left Leg",
            BodyPart::RightLeg => "Right Leg",
            BodyPart::Total => "Total",
            BodyPart::Android => "Android",
            BodyPart::Gynoid => "Gynoid",
        }
    }

    /// Returns whether this is the whole-body aggregate
    pub fn is_total(&self) -> bool {
        matches!(self, BodyPart::Total)
    }
}

impl FromStr for BodyPart {
    type Err = DexaError;

    /// Parses a body part label
    ///
    /// Case-insensitive; underscores, hyphens and repeated whitespace are
    /// treated as single spaces, so `"left_arm"` and `"Left  Arm"` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match normalized.as_str() {
            "left arm" => Ok(BodyPart::LeftArm),
            "right arm" => Ok(BodyPart::RightArm),
            "left leg" => Ok(BodyPart::LeftLeg),
            "right leg" => Ok(BodyPart::RightLeg),
            "total" => Ok(BodyPart::Total),
            "android" => Ok(BodyPart::Android),
            "gynoid" => Ok(BodyPart::Gynoid),
            _ => Err(DexaError::UnknownSelection(s.to_string())),
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Toggle semantics for non-Total buttons
///
/// Clicking Total always selects only Total; the modes differ in what a
/// click on any other button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToggleMode {
    /// Multi-select: a click adds an unselected part (evicting Total) or
    /// removes a selected one
    #[default]
    Accumulate,

    /// Single-select: a click replaces the selection with the clicked part;
    /// clicking the only selected part deselects it
    Replace,
}

/// Direction of change between two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Returns the arrow shown next to a trend delta
    pub fn symbol(&self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Flat => "→",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Whether a change is good news for the metric it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSignal {
    Positive,
    Negative,
    Neutral,
}

/// Long-run classification of a series from its first to its latest sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClass {
    Stable,
    Decreasing,
    Increasing,
}

impl TrendClass {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            TrendClass::Stable => "stable",
            TrendClass::Decreasing => "decreasing",
            TrendClass::Increasing => "increasing",
        }
    }
}

impl fmt::Display for TrendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Classification of total fat mass against the population median
///
/// Ordered by deviation magnitude: categories closer to the median sort
/// first, unrecognized labels sort last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum BenchmarkCategory {
    NearMedian,
    BelowMedian,
    AboveMedian,
    WellBelowMedian,
    WellAboveMedian,
    Unknown(String),
}

impl BenchmarkCategory {
    /// Returns the deviation severity (0 = at the median)
    fn severity(&self) -> i32 {
        match self {
            BenchmarkCategory::NearMedian => 0,
            BenchmarkCategory::BelowMedian | BenchmarkCategory::AboveMedian => 1,
            BenchmarkCategory::WellBelowMedian | BenchmarkCategory::WellAboveMedian => 2,
            BenchmarkCategory::Unknown(_) => 3,
        }
    }

    /// Returns the display label
    pub fn label(&self) -> &str {
        match self {
            BenchmarkCategory::NearMedian => "Near Median",
            BenchmarkCategory::BelowMedian => "Below Median",
            BenchmarkCategory::AboveMedian => "Above Median",
            BenchmarkCategory::WellBelowMedian => "Well Below Median",
            BenchmarkCategory::WellAboveMedian => "Well Above Median",
            BenchmarkCategory::Unknown(raw) => raw.as_str(),
        }
    }

    /// Parses a category from the benchmark pipeline's free-form label
    ///
    /// Labels are split into words and matched by whole keyword ("well",
    /// "significantly" or "much" for the outer bands, "above"/"high" and
    /// "below"/"low" for the side, "near", "typical", "within", "average" or
    /// "normal" for the middle band). Anything else is kept verbatim as
    /// `Unknown`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        let s_lower = s.trim().to_lowercase();
        let words: Vec<&str> = s_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has_any =
            |keywords: &[&str]| words.iter().any(|w| keywords.iter().any(|k| k == w));

        let strong = has_any(&["well", "significantly", "much"]);
        let above = has_any(&["above", "high", "higher"]);
        let below = has_any(&["below", "low", "lower"]);

        if above && !below {
            if strong {
                BenchmarkCategory::WellAboveMedian
            } else {
                BenchmarkCategory::AboveMedian
            }
        } else if below && !above {
            if strong {
                BenchmarkCategory::WellBelowMedian
            } else {
                BenchmarkCategory::BelowMedian
            }
        } else if has_any(&["near", "typical", "within", "average", "normal"]) {
            BenchmarkCategory::NearMedian
        } else {
            BenchmarkCategory::Unknown(s.trim().to_string())
        }
    }
}

impl PartialOrd for BenchmarkCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BenchmarkCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity()
            .cmp(&other.severity())
            .then_with(|| self.label().cmp(other.label()))
    }
}

impl fmt::Display for BenchmarkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Left Arm", BodyPart::LeftArm)]
    #[case("right arm", BodyPart::RightArm)]
    #[case("LEFT_LEG", BodyPart::LeftLeg)]
    #[case("  Right  Leg ", BodyPart::RightLeg)]
    #[case("total", BodyPart::Total)]
    #[case("Android", BodyPart::Android)]
    #[case("gynoid", BodyPart::Gynoid)]
    fn test_body_part_parse(#[case] input: &str, #[case] expected: BodyPart) {
        assert_eq!(input.parse::<BodyPart>().unwrap(), expected);
    }

    #[test]
    fn test_body_part_parse_unknown() {
        let err = "Pelvis".parse::<BodyPart>().unwrap_err();
        assert!(matches!(err, DexaError::UnknownSelection(s) if s == "Pelvis"));
    }

    #[test]
    fn test_body_part_label_roundtrip() {
        for part in BodyPart::ALL {
            assert_eq!(part.label().parse::<BodyPart>().unwrap(), part);
        }
    }

    #[test]
    fn test_body_part_button_order() {
        assert!(BodyPart::LeftArm < BodyPart::RightArm);
        assert!(BodyPart::RightLeg < BodyPart::Total);
        assert!(BodyPart::Total < BodyPart::Android);
    }

    #[test]
    fn test_trend_symbols() {
        assert_eq!(TrendDirection::Up.symbol(), "↑");
        assert_eq!(TrendDirection::Down.symbol(), "↓");
        assert_eq!(TrendDirection::Flat.symbol(), "→");
    }

    #[rstest]
    #[case("Near Median", BenchmarkCategory::NearMedian)]
    #[case("Within typical range", BenchmarkCategory::NearMedian)]
    #[case("Above Median", BenchmarkCategory::AboveMedian)]
    #[case("Well Above Median", BenchmarkCategory::WellAboveMedian)]
    #[case("below median", BenchmarkCategory::BelowMedian)]
    #[case("Significantly Below", BenchmarkCategory::WellBelowMedian)]
    #[case("Normal - follow up", BenchmarkCategory::NearMedian)]
    #[case("Slightly Above Median (follow-up advised)", BenchmarkCategory::AboveMedian)]
    #[case("Well below median, follow-up", BenchmarkCategory::WellBelowMedian)]
    #[case("High", BenchmarkCategory::AboveMedian)]
    fn test_benchmark_category_parse(#[case] input: &str, #[case] expected: BenchmarkCategory) {
        assert_eq!(BenchmarkCategory::from_str(input), expected);
    }

    #[test]
    fn test_benchmark_category_unknown_keeps_label() {
        assert_eq!(
            BenchmarkCategory::from_str("Followup pending"),
            BenchmarkCategory::Unknown("Followup pending".to_string())
        );

        let category = BenchmarkCategory::from_str(" Unclassified ");
        assert_eq!(category, BenchmarkCategory::Unknown("Unclassified".to_string()));
        assert_eq!(category.to_string(), "Unclassified");
    }

    #[test]
    fn test_benchmark_category_ordering() {
        assert!(BenchmarkCategory::NearMedian < BenchmarkCategory::AboveMedian);
        assert!(BenchmarkCategory::BelowMedian < BenchmarkCategory::WellAboveMedian);
        assert!(
            BenchmarkCategory::WellBelowMedian < BenchmarkCategory::Unknown("x".to_string())
        );
    }
}
