use crate::error::{DexaError, Result};
use serde::Serialize;
use std::fmt;

/// Fat-to-lean ratio expressed as a small "n:d" display ratio
///
/// Ratios below 1 are normalised to `x:d` with an integer denominator
/// (`0.111` becomes `1.0:9`); ratios of 1 or more become `x:1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FatLeanRatio {
    /// Rounded to one decimal place
    pub numerator: f64,
    pub denominator: u32,
}

impl fmt::Display for FatLeanRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}:{}", self.numerator, self.denominator)
    }
}

/// Raw fat/lean quotient
///
/// # Errors
///
/// Returns `InvalidMeasurement` if lean mass is not positive or either value
/// is negative or not finite.
pub fn fat_lean_ratio(fat: f64, lean: f64) -> Result<f64> {
    if !fat.is_finite() || fat < 0.0 {
        return Err(DexaError::InvalidMeasurement(format!(
            "fat mass must be a non-negative number, got {}",
            fat
        )));
    }
    if !lean.is_finite() || lean <= 0.0 {
        return Err(DexaError::InvalidMeasurement(format!(
            "lean mass must be positive, got {}",
            lean
        )));
    }
    Ok(fat / lean)
}

/// Computes the display ratio for a fat and lean mass
///
/// # Example
///
/// ```
/// use dexa_core::compute_ratio;
///
/// assert_eq!(compute_ratio(3000.0, 27000.0).unwrap().to_string(), "1.0:9");
/// assert_eq!(compute_ratio(30000.0, 20000.0).unwrap().to_string(), "1.5:1");
/// assert!(compute_ratio(3000.0, 0.0).is_err());
/// ```
pub fn compute_ratio(fat: f64, lean: f64) -> Result<FatLeanRatio> {
    let r = fat_lean_ratio(fat, lean)?;

    if r == 0.0 {
        return Ok(FatLeanRatio {
            numerator: 0.0,
            denominator: 1,
        });
    }

    let denominator = if r < 1.0 {
        let d = (1.0 / r).round();
        if d > u32::MAX as f64 {
            return Err(DexaError::InvalidMeasurement(format!(
                "fat/lean ratio {} is too small to display",
                r
            )));
        }
        d as u32
    } else {
        1
    };

    Ok(FatLeanRatio {
        numerator: round_to(r * denominator as f64, 1),
        denominator,
    })
}

/// Rounds to a fixed number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
