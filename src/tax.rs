//! Federal and state income tax estimate for one year of retirement income

use serde::{Deserialize, Serialize};

use crate::assumptions::tax_tables::{
    bracket_tax, federal_brackets, social_security_thresholds, standard_deduction,
};
use crate::assumptions::FilingStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxRequest {
    pub filing_status: FilingStatus,
    pub age: u32,
    /// Only used for married-joint filers
    pub spouse_age: u32,

    pub pension_income: f64,
    /// Traditional TSP withdrawals
    pub tsp_withdrawals: f64,
    pub other_income: f64,
    pub social_security_income: f64,
    /// Tax-exempt income that still counts toward provisional income
    pub non_taxable_income: f64,

    /// Used instead of the standard deduction when larger
    pub itemized_deductions: f64,
    pub federal_tax_credits: f64,
    pub state_tax_credits: f64,

    pub state_of_residence: String,
    /// Flat rate applied to federal taxable income
    pub state_income_tax_rate: f64,
}

impl TaxRequest {
    /// Every income stream, taxable or not
    pub fn total_income(&self) -> f64 {
        self.pension_income
            + self.tsp_withdrawals
            + self.other_income
            + self.social_security_income
            + self.non_taxable_income
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxOutcome {
    /// Federal taxable income including the taxable share of Social Security
    pub taxable_income: f64,
    pub taxable_social_security: f64,
    pub deduction_used: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub total_tax: f64,
    pub net_after_tax_income: f64,
    pub effective_federal_rate: f64,
    pub effective_state_rate: f64,
    pub effective_rate: f64,
    pub notes: Vec<String>,
}

/// Taxable portion of Social Security benefits for a provisional income
pub fn taxable_social_security(status: FilingStatus, provisional: f64, benefits: f64) -> f64 {
    let (base, additional) = social_security_thresholds(status);
    if provisional > additional {
        (0.85 * benefits).min(0.5 * benefits + 0.85 * (provisional - additional))
    } else if provisional > base {
        (0.5 * benefits).min(0.5 * (provisional - base))
    } else {
        0.0
    }
}

pub fn calculate_tax(request: &TaxRequest) -> TaxOutcome {
    let Some(brackets) = federal_brackets(request.filing_status) else {
        log::warn!("tax requested for an unknown filing status");
        return TaxOutcome {
            notes: vec!["Unknown filing status".to_string()],
            ..Default::default()
        };
    };
    let mut notes = Vec::new();

    let standard = standard_deduction(request.filing_status, request.age, request.spouse_age);
    let deduction = if request.itemized_deductions > standard {
        notes.push("Itemized deductions exceed the standard deduction.".to_string());
        request.itemized_deductions
    } else {
        standard
    };

    let gross = request.pension_income + request.tsp_withdrawals + request.other_income;
    let mut taxable_income = (gross - deduction).max(0.0);

    let provisional =
        taxable_income + request.non_taxable_income + 0.5 * request.social_security_income;
    let taxable_ss = taxable_social_security(
        request.filing_status,
        provisional,
        request.social_security_income,
    );
    taxable_income += taxable_ss;

    let federal_tax =
        (bracket_tax(brackets, taxable_income) - request.federal_tax_credits).max(0.0);
    let state_tax = (taxable_income * request.state_income_tax_rate - request.state_tax_credits)
        .max(0.0);
    if request.state_income_tax_rate > 0.0 {
        let state = if request.state_of_residence.is_empty() {
            "state of residence"
        } else {
            request.state_of_residence.as_str()
        };
        notes.push(format!(
            "State tax estimated at {:.2}% for {}.",
            request.state_income_tax_rate * 100.0,
            state
        ));
    }

    let total_income = request.total_income();
    let total_tax = federal_tax + state_tax;
    let rate = |tax: f64| if total_income > 0.0 { tax / total_income } else { 0.0 };
    log::debug!(
        "tax: taxable {:.2} (SS {:.2}), federal {:.2}, state {:.2}",
        taxable_income,
        taxable_ss,
        federal_tax,
        state_tax
    );

    TaxOutcome {
        taxable_income,
        taxable_social_security: taxable_ss,
        deduction_used: deduction,
        federal_tax,
        state_tax,
        total_tax,
        net_after_tax_income: total_income - total_tax,
        effective_federal_rate: rate(federal_tax),
        effective_state_rate: rate(state_tax),
        effective_rate: rate(total_tax),
        notes,
    }
}
