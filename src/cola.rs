//! Cost-of-living adjustment projection
//!
//! FERS retirees receive a diminished COLA when CPI exceeds 2%; CSRS and
//! Social Security receive the full CPI increase.

use serde::{Deserialize, Serialize};

use crate::pension::RetirementSystem;

/// Age before which regular FERS retirees receive no COLA
pub const FERS_COLA_AGE: u32 = 62;

/// Which COLA rule applies to an income stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColaPolicy {
    #[serde(rename = "FERS")]
    Fers,
    #[serde(rename = "CSRS", alias = "CSRS Offset", alias = "CSRSOffset")]
    Csrs,
    SocialSecurity,
    None,
    /// Rate applied as given
    #[default]
    #[serde(other)]
    Generic,
}

impl ColaPolicy {
    /// COLA rule for a pension under a retirement system
    pub fn for_system(system: RetirementSystem) -> Self {
        match system {
            RetirementSystem::Fers => ColaPolicy::Fers,
            RetirementSystem::Csrs | RetirementSystem::CsrsOffset => ColaPolicy::Csrs,
            RetirementSystem::Unknown => ColaPolicy::Generic,
        }
    }

    /// Annual COLA for a CPI change under this policy
    pub fn rate(&self, cpi: f64) -> f64 {
        match self {
            ColaPolicy::Fers => fers_capped_rate(cpi),
            ColaPolicy::Csrs | ColaPolicy::SocialSecurity | ColaPolicy::Generic => cpi,
            ColaPolicy::None => 0.0,
        }
    }
}

/// FERS diminished COLA: full CPI up to 2%, 2% for CPI in (2%, 3%],
/// CPI minus 1% above 3%
pub fn fers_capped_rate(cpi: f64) -> f64 {
    if cpi <= 0.02 {
        cpi
    } else if cpi <= 0.03 {
        0.02
    } else {
        (cpi - 0.01).max(0.02)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColaRequest {
    pub initial_amount: f64,
    /// Assumed CPI change, decimal
    pub cola_rate: f64,
    pub years: u32,
    pub policy: ColaPolicy,
    /// Calendar year of the first adjustment, for labeling only
    pub start_year: i32,
    /// FERS only: enables the no-COLA-before-62 rule
    pub retirement_age: Option<u32>,
    /// FERS only: special provision retirees get COLA before 62
    pub is_special_provision: bool,
    /// Months the benefit was paid in the first year; prorates year one when under 12
    pub months_in_first_year: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColaYear {
    pub year: i32,
    pub starting_amount: f64,
    pub cola_rate: f64,
    pub adjusted_amount: f64,
    pub cumulative_growth: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColaOutcome {
    pub base_amount: f64,
    pub projected_amounts: Vec<f64>,
    pub yearly: Vec<ColaYear>,
    pub final_amount: f64,
    /// Total growth over the horizon, e.g. 0.0927 for 9.27%
    pub cumulative_growth: f64,
    pub effective_annual_rate: f64,
    pub notes: Vec<String>,
}

pub fn calculate_cola(request: &ColaRequest) -> ColaOutcome {
    let base = request.initial_amount;
    let policy_rate = request.policy.rate(request.cola_rate);
    let growth_since_base = |amount: f64| if base != 0.0 { amount / base - 1.0 } else { 0.0 };

    let fers_age_gate = match (request.policy, request.retirement_age) {
        (ColaPolicy::Fers, Some(age)) if !request.is_special_provision => Some(age),
        _ => None,
    };

    let mut notes = Vec::new();
    if request.policy == ColaPolicy::Fers && request.years > 0 {
        notes.push(format!("FERS COLA cap logic applied: {:.2}%", policy_rate * 100.0));
    }
    if matches!(fers_age_gate, Some(age) if age < FERS_COLA_AGE) {
        notes.push("FERS COLA not applied until age 62 for regular retirement.".to_string());
    }

    let mut yearly = Vec::with_capacity(request.years as usize);
    let mut amount = base;
    for i in 0..request.years {
        let mut rate = policy_rate;
        if let Some(age) = fers_age_gate {
            if age + i < FERS_COLA_AGE {
                rate = 0.0;
            }
        }
        if i == 0 && request.months_in_first_year > 0 && request.months_in_first_year < 12 {
            rate *= f64::from(request.months_in_first_year) / 12.0;
            notes.push(format!(
                "First year COLA prorated for {} months.",
                request.months_in_first_year
            ));
        }

        let starting_amount = amount;
        amount *= 1.0 + rate;
        yearly.push(ColaYear {
            year: request.start_year + i as i32,
            starting_amount,
            cola_rate: rate,
            adjusted_amount: amount,
            cumulative_growth: growth_since_base(amount),
        });
    }

    let total_growth = growth_since_base(amount);
    let effective_annual_rate = if request.years > 0 {
        (1.0 + total_growth).powf(1.0 / f64::from(request.years)) - 1.0
    } else {
        0.0
    };

    ColaOutcome {
        base_amount: base,
        projected_amounts: yearly.iter().map(|y| y.adjusted_amount).collect(),
        yearly,
        final_amount: amount,
        cumulative_growth: total_growth,
        effective_annual_rate,
        notes,
    }
}
