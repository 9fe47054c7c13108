//! Withdrawal schedule assumptions for the TSP
//!
//! A simplified distribution period stands in for the IRS Uniform Lifetime
//! Table.

/// Distribution period used at and beyond the table's last age
pub const MIN_DISTRIBUTION_DIVISOR: f64 = 10.0;

/// Age the simplified divisor counts down to
const DIVISOR_TERMINAL_AGE: f64 = 90.0;

/// Simplified RMD divisor: `max(90 - age, 10)`
pub fn rmd_divisor(age: u32) -> f64 {
    (DIVISOR_TERMINAL_AGE - f64::from(age)).max(MIN_DISTRIBUTION_DIVISOR)
}

/// Simplified RMD amount for a balance at an attained age
pub fn rmd_amount(balance: f64, age: u32) -> f64 {
    balance / rmd_divisor(age)
}

/// First RMD age by birth year (SECURE 2.0: 73, or 75 for births from 1960)
pub fn rmd_start_age(birth_year: i32) -> u32 {
    if birth_year >= 1960 {
        75
    } else {
        73
    }
}
