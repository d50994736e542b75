//! Illustrative growth reference curves.
//!
//! Piecewise-linear approximation of percentile growth: a birth baseline plus
//! a fast early growth rate up to a breakpoint, then a slower rate beyond it.
//! The 3rd and 97th percentile bands are fixed scalings of the median. These
//! are deliberately simplified placeholder formulas, not WHO/CDC growth-chart
//! standards, and must not be read as clinical values.

use shared::{Gender, ReferenceBand, ReferenceCurve};

/// Median birth weight in kg (male, female).
pub const WEIGHT_BASE_KG: (f64, f64) = (3.3, 3.2);
/// Weight gain in kg/month up to the breakpoint.
pub const WEIGHT_RATE_EARLY: f64 = 0.7;
/// Weight gain in kg/month beyond the breakpoint.
pub const WEIGHT_RATE_LATE: f64 = 0.25;
/// Age in months at which weight gain slows.
pub const WEIGHT_BREAKPOINT_MONTHS: u32 = 6;
/// Percentile tail factors applied to the median weight.
pub const WEIGHT_TAILS: (f64, f64) = (0.85, 1.15);

/// Median birth length in cm (male, female).
pub const HEIGHT_BASE_CM: (f64, f64) = (49.9, 49.1);
/// Height gain in cm/month up to the breakpoint.
pub const HEIGHT_RATE_EARLY: f64 = 2.4;
/// Height gain in cm/month beyond the breakpoint.
pub const HEIGHT_RATE_LATE: f64 = 0.8;
/// Age in months at which height gain slows.
pub const HEIGHT_BREAKPOINT_MONTHS: u32 = 12;
/// Percentile tail factors applied to the median height.
pub const HEIGHT_TAILS: (f64, f64) = (0.95, 1.05);

fn piecewise(base: f64, rate_early: f64, rate_late: f64, breakpoint: u32, months: u32) -> f64 {
    if months <= breakpoint {
        base + rate_early * months as f64
    } else {
        base + rate_early * breakpoint as f64 + rate_late * (months - breakpoint) as f64
    }
}

fn pick(by_gender: (f64, f64), gender: Gender) -> f64 {
    match gender {
        Gender::Male => by_gender.0,
        Gender::Female => by_gender.1,
    }
}

/// Median reference weight in kg at `total_months` of age.
pub fn median_weight_kg(gender: Gender, total_months: u32) -> f64 {
    piecewise(
        pick(WEIGHT_BASE_KG, gender),
        WEIGHT_RATE_EARLY,
        WEIGHT_RATE_LATE,
        WEIGHT_BREAKPOINT_MONTHS,
        total_months,
    )
}

/// Median reference height in cm at `total_months` of age.
pub fn median_height_cm(gender: Gender, total_months: u32) -> f64 {
    piecewise(
        pick(HEIGHT_BASE_CM, gender),
        HEIGHT_RATE_EARLY,
        HEIGHT_RATE_LATE,
        HEIGHT_BREAKPOINT_MONTHS,
        total_months,
    )
}

/// Reference bands for both measurements at `total_months` of age.
pub fn reference_curve(gender: Gender, total_months: u32) -> ReferenceCurve {
    let weight_p50 = median_weight_kg(gender, total_months);
    let height_p50 = median_height_cm(gender, total_months);
    ReferenceCurve {
        weight: ReferenceBand {
            p3: weight_p50 * WEIGHT_TAILS.0,
            p50: weight_p50,
            p97: weight_p50 * WEIGHT_TAILS.1,
        },
        height: ReferenceBand {
            p3: height_p50 * HEIGHT_TAILS.0,
            p50: height_p50,
            p97: height_p50 * HEIGHT_TAILS.1,
        },
    }
}
