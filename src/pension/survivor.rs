//! Survivor income projection after the retiree's death

use serde::{Deserialize, Serialize};

use super::policy::{ElectionTerms, SystemPolicy};
use super::{RetirementSystem, SurvivorElection};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurvivorRequest {
    pub pension_type: RetirementSystem,
    /// Retiree's annual annuity before the survivor reduction
    pub initial_annuity: f64,
    pub survivor_election: SurvivorElection,
    pub spouse_age: u32,
    pub retiree_age_at_death: u32,
    pub cola_rate: f64,
    pub years_to_project: u32,
    pub include_ss_survivor: bool,
    /// Annual SS survivor benefit
    pub ss_survivor_amount: f64,
    pub include_tsp: bool,
    pub tsp_balance_at_death: f64,
    pub other_survivor_income: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorOutcome {
    pub initial_survivor_annuity: f64,
    /// Total survivor income per projected year
    pub projected_annuities: Vec<f64>,
    pub total_survivor_income: f64,
    pub notes: Vec<String>,
}

fn election_note(
    policy: &SystemPolicy,
    election: SurvivorElection,
    terms: ElectionTerms,
) -> String {
    let kind = match election {
        SurvivorElection::Max => "max",
        SurvivorElection::Partial => "partial",
        SurvivorElection::None => return format!("{}: No survivor benefit elected", policy.label),
    };
    format!(
        "{} {}: {:.0}% to survivor, {:.0}% reduction",
        policy.label,
        kind,
        terms.survivor_share * 100.0,
        terms.retiree_reduction * 100.0
    )
}

pub fn calculate_survivor_benefit(request: &SurvivorRequest) -> SurvivorOutcome {
    let (terms, note) = match SystemPolicy::for_system(request.pension_type) {
        Some(policy) => {
            let terms = policy.election_terms(request.survivor_election);
            (terms, election_note(policy, request.survivor_election, terms))
        }
        None => (ElectionTerms::NONE, "Unknown pension type".to_string()),
    };

    let initial =
        request.initial_annuity * (1.0 - terms.retiree_reduction) * terms.survivor_share;

    let years = request.years_to_project as usize;
    let tsp_share = if request.include_tsp && request.tsp_balance_at_death > 0.0 && years > 0 {
        request.tsp_balance_at_death / years as f64
    } else {
        0.0
    };
    let ss_survivor = if request.include_ss_survivor {
        request.ss_survivor_amount
    } else {
        0.0
    };
    let other = request.other_survivor_income.max(0.0);

    let mut projected = Vec::with_capacity(years);
    let mut annuity = initial;
    for year in 0..years {
        if year > 0 {
            annuity *= 1.0 + request.cola_rate;
        }
        projected.push(annuity + ss_survivor + tsp_share + other);
    }
    let total = projected.iter().sum();

    SurvivorOutcome {
        initial_survivor_annuity: initial,
        projected_annuities: projected,
        total_survivor_income: total,
        notes: vec![note],
    }
}
