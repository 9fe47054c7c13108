//! Social Security Administration parameters
//!
//! 2025 PIA bend points, the full retirement age schedule and the
//! early/delayed claiming adjustments.

/// Monthly PIA bend points (2025)
pub const PIA_BEND_POINTS: [f64; 2] = [1_115.0, 6_721.0];

/// Marginal PIA replacement rates for the three AIME segments
pub const PIA_RATES: [f64; 3] = [0.90, 0.32, 0.15];

/// Number of computation years in the AIME average
pub const COMPUTATION_YEARS: usize = 35;

/// Months in the AIME averaging period (35 years x 12)
pub const AIME_DIVISOR: f64 = 420.0;

/// Earliest and latest claiming ages
pub const EARLIEST_CLAIM_AGE: u32 = 62;
pub const LATEST_CLAIM_AGE: u32 = 70;

/// Annual earnings limit for the retirement earnings test (2025)
pub const EARNINGS_TEST_LIMIT: f64 = 23_400.0;

const EARLY_REDUCTION_PER_MONTH: f64 = 0.0056;
const DELAYED_CREDIT_PER_MONTH: f64 = 0.008;
const MIN_CLAIMING_FACTOR: f64 = 0.70;
const MAX_CLAIMING_FACTOR: f64 = 1.24;

/// Full retirement age in years for a birth year
///
/// Births from 1955 through 1959 add two months per year past 1954.
pub fn full_retirement_age(birth_year: i32) -> f64 {
    match birth_year {
        y if y <= 1954 => 66.0,
        y if y >= 1960 => 67.0,
        y => 66.0 + f64::from(y - 1954) * 2.0 / 12.0,
    }
}

/// Benefit multiplier for claiming at `claim_age` relative to `fra`
pub fn claiming_factor(claim_age: f64, fra: f64) -> f64 {
    if (claim_age - fra).abs() < 1e-9 {
        1.0
    } else if claim_age < fra {
        let reduction = EARLY_REDUCTION_PER_MONTH * 12.0 * (fra - claim_age);
        (1.0 - reduction).max(MIN_CLAIMING_FACTOR)
    } else {
        let increase = DELAYED_CREDIT_PER_MONTH * 12.0 * (claim_age - fra);
        (1.0 + increase).min(MAX_CLAIMING_FACTOR)
    }
}

/// Primary insurance amount from AIME via the three-segment bend point formula
pub fn primary_insurance_amount(aime: f64) -> f64 {
    let [first, second] = PIA_BEND_POINTS;
    let [r1, r2, r3] = PIA_RATES;

    if aime <= 0.0 {
        0.0
    } else if aime <= first {
        r1 * aime
    } else if aime <= second {
        r1 * first + r2 * (aime - first)
    } else {
        r1 * first + r2 * (second - first) + r3 * (aime - second)
    }
}
