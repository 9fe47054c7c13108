//! Thrift Savings Plan projector
//!
//! Produces the balance expected at retirement and a year-by-year table of
//! contributions, growth and withdrawals until the end age or depletion.

mod state;

pub use state::{TspState, TspYear, DEPLETION_THRESHOLD};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How retirement withdrawals are sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalMethod {
    #[default]
    Fixed,
    #[serde(alias = "percent")]
    Percentage,
    #[serde(alias = "RMD")]
    Rmd,
    #[serde(other)]
    None,
}

/// Default last age of the year-by-year table
pub const DEFAULT_END_AGE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TspRequest {
    pub current_age: u32,
    /// Contributions stop at this age
    pub retirement_age: u32,
    pub withdrawal_start_age: u32,
    pub end_age: u32,
    /// Enables the RMD start-age gate for the RMD method
    pub birth_year: Option<i32>,

    pub current_balance: f64,
    pub annual_employee_contribution: f64,
    pub annual_agency_match: f64,
    /// Decimal, e.g. 0.06
    pub expected_return_rate: f64,

    pub withdrawal_method: WithdrawalMethod,
    pub fixed_withdrawal_amount: f64,
    /// Decimal share of the balance for the percentage method
    pub withdrawal_percentage: f64,
}

impl Default for TspRequest {
    fn default() -> Self {
        Self {
            current_age: 55,
            retirement_age: 62,
            withdrawal_start_age: 62,
            end_age: DEFAULT_END_AGE,
            birth_year: None,
            current_balance: 0.0,
            annual_employee_contribution: 0.0,
            annual_agency_match: 0.0,
            expected_return_rate: 0.0,
            withdrawal_method: WithdrawalMethod::Fixed,
            fixed_withdrawal_amount: 0.0,
            withdrawal_percentage: 0.0,
        }
    }
}

impl TspRequest {
    /// Employee plus agency contribution for one working year
    pub fn annual_contribution(&self) -> f64 {
        self.annual_employee_contribution + self.annual_agency_match
    }

    pub fn years_until_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end_age < self.current_age {
            return Err(EngineError::validation(
                "endAge",
                format!("{} is before current age {}", self.end_age, self.current_age),
            ));
        }
        if !self.current_balance.is_finite() || self.current_balance < 0.0 {
            return Err(EngineError::validation(
                "currentBalance",
                "must be a non-negative amount",
            ));
        }
        if self.expected_return_rate <= -1.0 {
            return Err(EngineError::validation(
                "expectedReturnRate",
                "must be greater than -100%",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TspOutcome {
    pub projected_balance_at_retirement: f64,
    /// First year's withdrawal
    pub annual_withdrawal_income: f64,
    pub monthly_withdrawal_income: f64,
    /// Number of withdrawal years in the table
    pub years_balance_lasts: u32,
    pub yearly: Vec<TspYear>,
    pub max_balance: f64,
    pub final_balance: f64,
    pub total_contributions: f64,
    pub total_returns: f64,
    pub total_withdrawals: f64,
    pub depleted_at_age: Option<u32>,
    pub notes: Vec<String>,
}

/// Balance at retirement: each working year adds both contributions, then
/// grows the sum
pub fn balance_at_retirement(request: &TspRequest) -> f64 {
    let growth = 1.0 + request.expected_return_rate;
    (0..request.years_until_retirement()).fold(request.current_balance, |balance, _| {
        (balance + request.annual_contribution()) * growth
    })
}

/// Project the account from the current age to the end age or depletion
pub fn project_tsp(request: &TspRequest) -> TspOutcome {
    let mut state = TspState::from_request(request);
    let mut yearly = Vec::new();

    while state.age <= request.end_age {
        let year = state.advance(request);
        yearly.push(year);
        if state.is_depleted() {
            break;
        }
    }

    let mut notes = Vec::new();
    if let Some(age) = state.first_rmd_age {
        notes.push(format!("Required Minimum Distributions begin at age {}.", age));
    }
    if let Some(age) = state.depleted_at_age {
        log::debug!("TSP balance depleted at age {}", age);
        notes.push(format!("Balance depleted at age {}.", age));
    }

    let annual_withdrawal = yearly
        .iter()
        .find(|year| year.withdrawal > 0.0)
        .map(|year| year.withdrawal)
        .unwrap_or(0.0);
    let years_balance_lasts = yearly
        .iter()
        .filter(|year| year.age >= request.withdrawal_start_age)
        .count() as u32;

    TspOutcome {
        projected_balance_at_retirement: balance_at_retirement(request),
        annual_withdrawal_income: annual_withdrawal,
        monthly_withdrawal_income: annual_withdrawal / 12.0,
        years_balance_lasts,
        final_balance: state.balance,
        max_balance: state.max_balance,
        total_contributions: state.total_contributions,
        total_returns: state.total_returns,
        total_withdrawals: state.total_withdrawals,
        depleted_at_age: state.depleted_at_age,
        yearly,
        notes,
    }
}
