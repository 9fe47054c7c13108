//! Federal income tax tables (2025 tax year)
//!
//! Brackets, standard deductions and the Social Security provisional income
//! thresholds, keyed by filing status.

use serde::{Deserialize, Serialize};

/// Tax year the constants in this module describe
pub const TAX_YEAR: i32 = 2025;

/// IRS filing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilingStatus {
    #[default]
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "married_joint", alias = "married", alias = "marriedJoint")]
    MarriedJoint,
    #[serde(rename = "married_separate", alias = "marriedSeparate")]
    MarriedSeparate,
    #[serde(rename = "head_of_household", alias = "headOfHousehold")]
    HeadOfHousehold,
    /// Any label the tables do not cover
    #[serde(other)]
    Unknown,
}

impl FilingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedJoint => "married_joint",
            FilingStatus::MarriedSeparate => "married_separate",
            FilingStatus::HeadOfHousehold => "head_of_household",
            FilingStatus::Unknown => "unknown",
        }
    }
}

/// One marginal bracket: income up to `upper` is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBracket {
    pub upper: f64,
    pub rate: f64,
}

const fn bracket(upper: f64, rate: f64) -> TaxBracket {
    TaxBracket { upper, rate }
}

const SINGLE_BRACKETS: [TaxBracket; 7] = [
    bracket(11_925.0, 0.10),
    bracket(48_475.0, 0.12),
    bracket(103_350.0, 0.22),
    bracket(197_300.0, 0.24),
    bracket(250_525.0, 0.32),
    bracket(626_350.0, 0.35),
    bracket(f64::INFINITY, 0.37),
];

const MARRIED_JOINT_BRACKETS: [TaxBracket; 7] = [
    bracket(23_850.0, 0.10),
    bracket(96_950.0, 0.12),
    bracket(206_700.0, 0.22),
    bracket(394_600.0, 0.24),
    bracket(501_050.0, 0.32),
    bracket(751_600.0, 0.35),
    bracket(f64::INFINITY, 0.37),
];

const MARRIED_SEPARATE_BRACKETS: [TaxBracket; 7] = [
    bracket(11_925.0, 0.10),
    bracket(48_475.0, 0.12),
    bracket(103_350.0, 0.22),
    bracket(197_300.0, 0.24),
    bracket(250_525.0, 0.32),
    bracket(375_800.0, 0.35),
    bracket(f64::INFINITY, 0.37),
];

const HEAD_OF_HOUSEHOLD_BRACKETS: [TaxBracket; 7] = [
    bracket(17_000.0, 0.10),
    bracket(64_850.0, 0.12),
    bracket(103_350.0, 0.22),
    bracket(197_300.0, 0.24),
    bracket(250_500.0, 0.32),
    bracket(626_350.0, 0.35),
    bracket(f64::INFINITY, 0.37),
];

/// Age at which the additional standard deduction applies
pub const SENIOR_DEDUCTION_AGE: u32 = 65;

/// Bracket table for a filing status, `None` for an unknown status
pub fn federal_brackets(status: FilingStatus) -> Option<&'static [TaxBracket]> {
    match status {
        FilingStatus::Single => Some(&SINGLE_BRACKETS),
        FilingStatus::MarriedJoint => Some(&MARRIED_JOINT_BRACKETS),
        FilingStatus::MarriedSeparate => Some(&MARRIED_SEPARATE_BRACKETS),
        FilingStatus::HeadOfHousehold => Some(&HEAD_OF_HOUSEHOLD_BRACKETS),
        FilingStatus::Unknown => None,
    }
}

/// Apply a marginal bracket table to taxable income
pub fn bracket_tax(brackets: &[TaxBracket], taxable_income: f64) -> f64 {
    let mut tax = 0.0;
    let mut lower = 0.0;
    for b in brackets {
        if taxable_income <= lower {
            break;
        }
        let slice = taxable_income.min(b.upper) - lower;
        tax += slice * b.rate;
        lower = b.upper;
    }
    tax
}

/// Standard deduction including the age-65 add-on
///
/// `spouse_age` only counts for married statuses.
pub fn standard_deduction(status: FilingStatus, age: u32, spouse_age: u32) -> f64 {
    let (base, senior_add_on) = match status {
        FilingStatus::Single => (15_000.0, 2_000.0),
        FilingStatus::MarriedJoint => (30_000.0, 1_600.0),
        FilingStatus::MarriedSeparate => (15_000.0, 1_600.0),
        FilingStatus::HeadOfHousehold => (22_500.0, 2_000.0),
        FilingStatus::Unknown => return 0.0,
    };

    let mut deduction = base;
    if age >= SENIOR_DEDUCTION_AGE {
        deduction += senior_add_on;
    }
    if status == FilingStatus::MarriedJoint && spouse_age >= SENIOR_DEDUCTION_AGE {
        deduction += senior_add_on;
    }
    deduction
}

/// Provisional income thresholds (base, additional) for Social Security taxation
pub fn social_security_thresholds(status: FilingStatus) -> (f64, f64) {
    match status {
        FilingStatus::MarriedJoint => (32_000.0, 44_000.0),
        _ => (25_000.0, 34_000.0),
    }
}
