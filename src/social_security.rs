//! Social Security benefit estimator
//!
//! Two paths: SSA statement values when all three are supplied, otherwise an
//! AIME/PIA estimate from earnings history or average salary. All amounts in
//! the outcome are monthly.

use serde::{Deserialize, Serialize};

use crate::assumptions::ssa::{
    claiming_factor, full_retirement_age, primary_insurance_amount, AIME_DIVISOR,
    COMPUTATION_YEARS, EARLIEST_CLAIM_AGE, LATEST_CLAIM_AGE,
};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialSecurityRequest {
    pub birth_year: i32,
    pub current_age: u32,

    /// Indexed annual earnings; the highest 35 years are used
    pub earnings_history: Vec<f64>,

    /// Fallback when no history is given
    pub estimated_annual_salary: f64,
    pub years_worked: u32,

    /// SSA statement monthly estimates; used only when all three are positive
    pub user_estimate_62: f64,
    #[serde(rename = "userEstimateFRA", alias = "userEstimateFra")]
    pub user_estimate_fra: f64,
    pub user_estimate_70: f64,

    /// Desired claiming age, 62 through 70
    pub claim_age: u32,
}

impl Default for SocialSecurityRequest {
    fn default() -> Self {
        Self {
            birth_year: 1960,
            current_age: 0,
            earnings_history: Vec::new(),
            estimated_annual_salary: 0.0,
            years_worked: 0,
            user_estimate_62: 0.0,
            user_estimate_fra: 0.0,
            user_estimate_70: 0.0,
            claim_age: 67,
        }
    }
}

impl SocialSecurityRequest {
    pub fn validate(&self) -> Result<()> {
        if !(EARLIEST_CLAIM_AGE..=LATEST_CLAIM_AGE).contains(&self.claim_age) {
            return Err(EngineError::validation(
                "claimAge",
                format!(
                    "must be between {} and {}, got {}",
                    EARLIEST_CLAIM_AGE, LATEST_CLAIM_AGE, self.claim_age
                ),
            ));
        }
        Ok(())
    }

    fn has_statement_values(&self) -> bool {
        self.user_estimate_62 > 0.0 && self.user_estimate_fra > 0.0 && self.user_estimate_70 > 0.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSecurityOutcome {
    pub full_retirement_age: f64,
    /// Zero when statement values were used
    pub aime: f64,
    pub pia: f64,
    pub estimate_at_62: f64,
    #[serde(rename = "estimateAtFRA")]
    pub estimate_at_fra: f64,
    pub estimate_at_70: f64,
    pub claiming_age: u32,
    /// Monthly benefit at the claiming age
    pub claiming_amount: f64,
    pub notes: Vec<String>,
}

impl SocialSecurityOutcome {
    pub fn annual_claiming_amount(&self) -> f64 {
        self.claiming_amount * 12.0
    }
}

/// AIME from the highest computation years of indexed earnings, or from a
/// flat salary over the years worked, zero-padded to 35 years
pub fn estimate_aime(earnings: &[f64], salary: f64, years_worked: u32) -> f64 {
    let total: f64 = if !earnings.is_empty() {
        let mut sorted = earnings.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted.iter().take(COMPUTATION_YEARS).sum()
    } else if salary > 0.0 && years_worked > 0 {
        salary * years_worked.min(COMPUTATION_YEARS as u32) as f64
    } else {
        0.0
    };
    total / AIME_DIVISOR
}

fn interpolate(x: f64, (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> f64 {
    if (x1 - x0).abs() < f64::EPSILON {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

fn from_statement(request: &SocialSecurityRequest, fra: f64) -> SocialSecurityOutcome {
    let claim = f64::from(request.claim_age);
    let at_62 = (f64::from(EARLIEST_CLAIM_AGE), request.user_estimate_62);
    let at_fra = (fra, request.user_estimate_fra);
    let at_70 = (f64::from(LATEST_CLAIM_AGE), request.user_estimate_70);

    let claiming_amount = if request.claim_age == EARLIEST_CLAIM_AGE {
        request.user_estimate_62
    } else if (claim - fra).abs() < 1e-9 {
        request.user_estimate_fra
    } else if request.claim_age == LATEST_CLAIM_AGE {
        request.user_estimate_70
    } else if claim < fra {
        interpolate(claim, at_62, at_fra)
    } else {
        interpolate(claim, at_fra, at_70)
    };

    SocialSecurityOutcome {
        full_retirement_age: fra,
        aime: 0.0,
        pia: 0.0,
        estimate_at_62: request.user_estimate_62,
        estimate_at_fra: request.user_estimate_fra,
        estimate_at_70: request.user_estimate_70,
        claiming_age: request.claim_age,
        claiming_amount,
        notes: vec!["Used user-provided SSA statement values.".to_string()],
    }
}

/// Estimate monthly benefits at 62, FRA, 70 and the chosen claiming age
pub fn calculate_social_security(request: &SocialSecurityRequest) -> SocialSecurityOutcome {
    let fra = full_retirement_age(request.birth_year);
    if request.has_statement_values() {
        return from_statement(request, fra);
    }

    let aime = estimate_aime(
        &request.earnings_history,
        request.estimated_annual_salary,
        request.years_worked,
    );
    let pia = primary_insurance_amount(aime);
    log::debug!("SS estimate: AIME {:.2}, PIA {:.2}, FRA {:.2}", aime, pia, fra);

    let mut notes = Vec::new();
    if request.earnings_history.is_empty()
        && request.estimated_annual_salary > 0.0
        && request.years_worked > 0
    {
        notes.push("Estimate based on average salary and years worked.".to_string());
    } else if aime == 0.0 || pia == 0.0 {
        notes.push(
            "No SSA statement or sufficient earnings data provided; estimate is zero.".to_string(),
        );
    }

    SocialSecurityOutcome {
        full_retirement_age: fra,
        aime,
        pia,
        estimate_at_62: pia * claiming_factor(f64::from(EARLIEST_CLAIM_AGE), fra),
        estimate_at_fra: pia,
        estimate_at_70: pia * claiming_factor(f64::from(LATEST_CLAIM_AGE), fra),
        claiming_age: request.claim_age,
        claiming_amount: pia * claiming_factor(f64::from(request.claim_age), fra),
        notes,
    }
}
