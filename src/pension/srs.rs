//! FERS Special Retirement Supplement
//!
//! Bridges the Social Security gap for FERS retirees who leave on an
//! immediate, unreduced annuity before 62. Subject to the SSA earnings test.

use serde::{Deserialize, Serialize};

use crate::assumptions::ssa::EARNINGS_TEST_LIMIT;

/// Age at which the supplement stops
pub const SRS_END_AGE: u32 = 62;

/// Career length the SS-at-62 estimate is prorated over
const FULL_CAREER_YEARS: f64 = 40.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SrsRequest {
    /// Annual SS benefit estimated at 62
    pub estimated_ss_at_62: f64,
    /// Civilian FERS service only; rounded up to whole years
    pub years_of_fers_service: f64,
    pub retirement_age: u32,
    /// True for MRA with 30, 60 with 20, or special provision retirements
    pub is_immediate_unreduced_annuity: bool,
    /// Earned income expected while the supplement is paid
    pub projected_earned_income: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsOutcome {
    pub annual_srs: f64,
    pub monthly_srs: f64,
    pub earnings_test_reduction: f64,
    pub is_eligible: bool,
    pub notes: Vec<String>,
}

impl SrsOutcome {
    fn ineligible() -> Self {
        Self {
            notes: vec![
                "Not eligible for SRS (must be immediate, unreduced FERS annuity and retire before age 62)."
                    .to_string(),
            ],
            ..Default::default()
        }
    }
}

/// Calculate the supplement; ineligibility is an ordinary zero outcome
pub fn calculate_srs(request: &SrsRequest) -> SrsOutcome {
    if !request.is_immediate_unreduced_annuity || request.retirement_age >= SRS_END_AGE {
        return SrsOutcome::ineligible();
    }

    let service = request.years_of_fers_service.ceil();
    let srs = request.estimated_ss_at_62 / FULL_CAREER_YEARS * service;

    let mut notes = Vec::new();
    let excess = request.projected_earned_income - EARNINGS_TEST_LIMIT;
    let mut reduction = 0.0;
    if excess > 0.0 {
        reduction = (excess / 2.0).min(srs);
        notes.push(format!("Earnings test reduction applied: ${:.2}", reduction));
    }

    let annual = (srs - reduction).max(0.0);
    log::debug!("SRS {:.2} before earnings test, {:.2} after", srs, annual);

    SrsOutcome {
        annual_srs: annual,
        monthly_srs: annual / 12.0,
        earnings_test_reduction: reduction,
        is_eligible: true,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eligible_request() -> SrsRequest {
        SrsRequest {
            estimated_ss_at_62: 20_000.0,
            years_of_fers_service: 30.0,
            retirement_age: 57,
            is_immediate_unreduced_annuity: true,
            projected_earned_income: 0.0,
        }
    }

    #[test]
    fn test_srs_basic() {
        let outcome = calculate_srs(&eligible_request());
        assert!(outcome.is_eligible);
        assert_relative_eq!(outcome.annual_srs, 15_000.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.monthly_srs, 1_250.0, epsilon = 1e-9);
        assert_eq!(outcome.earnings_test_reduction, 0.0);
        assert!(outcome.notes.is_empty());
    }

    #[test]
    fn test_srs_service_rounds_up() {
        let request = SrsRequest {
            years_of_fers_service: 29.2,
            ..eligible_request()
        };
        assert_relative_eq!(calculate_srs(&request).annual_srs, 15_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_srs_earnings_test() {
        let request = SrsRequest {
            projected_earned_income: 33_400.0,
            ..eligible_request()
        };
        let outcome = calculate_srs(&request);
        assert_relative_eq!(outcome.earnings_test_reduction, 5_000.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.annual_srs, 10_000.0, epsilon = 1e-9);
        assert_eq!(outcome.notes, vec!["Earnings test reduction applied: $5000.00"]);
    }

    #[test]
    fn test_srs_earnings_test_capped_at_supplement() {
        let request = SrsRequest {
            projected_earned_income: 200_000.0,
            ..eligible_request()
        };
        let outcome = calculate_srs(&request);
        assert_relative_eq!(outcome.earnings_test_reduction, 15_000.0, epsilon = 1e-9);
        assert_eq!(outcome.annual_srs, 0.0);
    }

    #[test]
    fn test_srs_ineligible() {
        let at_62 = SrsRequest {
            retirement_age: 62,
            ..eligible_request()
        };
        let reduced = SrsRequest {
            is_immediate_unreduced_annuity: false,
            ..eligible_request()
        };
        for request in [at_62, reduced] {
            let outcome = calculate_srs(&request);
            assert!(!outcome.is_eligible);
            assert_eq!(outcome.annual_srs, 0.0);
            assert!(outcome.notes[0].starts_with("Not eligible for SRS"));
        }
    }
}
