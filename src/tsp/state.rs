//! TSP balance state carried across projection years

use serde::{Deserialize, Serialize};

use super::{TspRequest, WithdrawalMethod};
use crate::assumptions::withdrawals::{rmd_amount, rmd_start_age};

/// Ending balance at or below which the account counts as depleted
pub const DEPLETION_THRESHOLD: f64 = 0.01;

/// One year of TSP activity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TspYear {
    pub age: u32,
    pub starting_balance: f64,
    pub contributions: f64,
    pub returns: f64,
    pub withdrawal: f64,
    pub ending_balance: f64,
}

/// Balance and running totals for one projection loop
#[derive(Debug, Clone)]
pub struct TspState {
    /// Attained age for the next year to be processed
    pub age: u32,

    /// Balance at the start of the next year
    pub balance: f64,

    /// Highest balance seen, starting from the opening balance
    pub max_balance: f64,

    pub total_contributions: f64,
    pub total_returns: f64,
    pub total_withdrawals: f64,

    /// Age of the first year that ended at or below the depletion threshold
    pub depleted_at_age: Option<u32>,

    /// Age of the first RMD-method withdrawal, once taken
    pub first_rmd_age: Option<u32>,
}

impl TspState {
    pub fn new(age: u32, balance: f64) -> Self {
        Self {
            age,
            balance,
            max_balance: balance,
            total_contributions: 0.0,
            total_returns: 0.0,
            total_withdrawals: 0.0,
            depleted_at_age: None,
            first_rmd_age: None,
        }
    }

    /// Initialize state from a request at its current age
    pub fn from_request(request: &TspRequest) -> Self {
        Self::new(request.current_age, request.current_balance)
    }

    pub fn is_withdrawing(&self, plan: &TspRequest) -> bool {
        self.age >= plan.withdrawal_start_age
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted_at_age.is_some()
    }

    /// Withdrawal the plan calls for this year at the current balance
    pub fn withdrawal(&self, plan: &TspRequest) -> f64 {
        if !self.is_withdrawing(plan) || self.balance <= 0.0 {
            return 0.0;
        }

        match plan.withdrawal_method {
            WithdrawalMethod::Fixed => plan.fixed_withdrawal_amount.min(self.balance),
            WithdrawalMethod::Percentage => {
                (self.balance * plan.withdrawal_percentage).min(self.balance)
            }
            WithdrawalMethod::Rmd => {
                let start = plan.birth_year.map(rmd_start_age).unwrap_or(0);
                if self.age >= start {
                    rmd_amount(self.balance, self.age)
                } else {
                    0.0
                }
            }
            WithdrawalMethod::None => 0.0,
        }
    }

    /// Process one year and move to the next age
    ///
    /// Accumulating years grow the balance then add the contribution;
    /// withdrawing years take the withdrawal then grow the remainder.
    pub fn advance(&mut self, plan: &TspRequest) -> TspYear {
        let starting_balance = self.balance;
        let rate = plan.expected_return_rate;
        let mut year = TspYear {
            age: self.age,
            starting_balance,
            ..Default::default()
        };

        if self.is_withdrawing(plan) {
            let withdrawal = self.withdrawal(plan);
            let remaining = starting_balance - withdrawal;
            year.withdrawal = withdrawal;
            year.returns = remaining * rate;
            year.ending_balance = (remaining * (1.0 + rate)).max(0.0);

            if withdrawal > 0.0
                && plan.withdrawal_method == WithdrawalMethod::Rmd
                && self.first_rmd_age.is_none()
            {
                self.first_rmd_age = Some(self.age);
            }
        } else {
            let contribution = if self.age < plan.retirement_age {
                plan.annual_contribution()
            } else {
                0.0
            };
            year.contributions = contribution;
            year.returns = starting_balance * rate;
            year.ending_balance = starting_balance * (1.0 + rate) + contribution;
        }

        self.total_contributions += year.contributions;
        self.total_returns += year.returns;
        self.total_withdrawals += year.withdrawal;
        self.max_balance = self.max_balance.max(year.ending_balance);
        // An account that was already empty does not run out
        if starting_balance > DEPLETION_THRESHOLD
            && year.ending_balance <= DEPLETION_THRESHOLD
            && self.depleted_at_age.is_none()
        {
            self.depleted_at_age = Some(self.age);
        }

        self.balance = year.ending_balance;
        self.age += 1;
        year
    }
}
