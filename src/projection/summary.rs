//! Single-call retirement summary
//!
//! Runs every component once on its own request and combines the first-year
//! figures into total and net income.

use serde::{Deserialize, Serialize};

use crate::cola::{calculate_cola, ColaOutcome, ColaRequest};
use crate::error::Result;
use crate::health::{calculate_health_premiums, HealthOutcome, HealthRequest};
use crate::monte_carlo::{run_monte_carlo, MonteCarloOutcome, MonteCarloRequest};
use crate::pension::{
    calculate_csrs, calculate_fers, calculate_srs, calculate_survivor_benefit, PensionOutcome,
    PensionRequest, SrsOutcome, SrsRequest, SurvivorOutcome, SurvivorRequest,
};
use crate::social_security::{
    calculate_social_security, SocialSecurityOutcome, SocialSecurityRequest,
};
use crate::tax::{calculate_tax, TaxOutcome, TaxRequest};
use crate::tsp::{project_tsp, TspOutcome, TspRequest};

/// One request per component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetirementRequest {
    pub fers: PensionRequest,
    pub csrs: PensionRequest,
    pub srs: SrsRequest,
    pub tsp: TspRequest,
    pub tax: TaxRequest,
    pub social_security: SocialSecurityRequest,
    pub cola: ColaRequest,
    pub survivor: SurvivorRequest,
    pub health: HealthRequest,
    /// Skipped unless `num_simulations` is positive
    pub monte_carlo: MonteCarloRequest,
}

impl RetirementRequest {
    pub fn validate(&self) -> Result<()> {
        self.fers.validate()?;
        self.csrs.validate()?;
        self.tsp.validate()?;
        self.social_security.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementOutcome {
    pub fers: PensionOutcome,
    pub csrs: PensionOutcome,
    pub srs: SrsOutcome,
    pub tsp: TspOutcome,
    pub tax: TaxOutcome,
    pub social_security: SocialSecurityOutcome,
    pub cola: ColaOutcome,
    pub survivor: SurvivorOutcome,
    pub health: HealthOutcome,
    pub monte_carlo: MonteCarloOutcome,

    /// Pensions, SRS, first TSP withdrawal and annual Social Security
    pub total_retirement_income: f64,
    /// Total income less first-year health premiums and taxes
    pub net_after_tax_income: f64,
    pub effective_tax_rate: f64,
    /// Component notes, newline separated, in component order
    pub notes: String,
}

fn join_notes(blocks: &[&[String]]) -> String {
    blocks
        .iter()
        .filter(|notes| !notes.is_empty())
        .map(|notes| notes.join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Calculate the retirement summary
pub fn calculate_retirement(request: &RetirementRequest) -> Result<RetirementOutcome> {
    request.validate()?;

    let fers = calculate_fers(&request.fers);
    let csrs = calculate_csrs(&request.csrs);
    let srs = calculate_srs(&request.srs);
    let tsp = project_tsp(&request.tsp);
    let tax = calculate_tax(&request.tax);
    let social_security = calculate_social_security(&request.social_security);
    let cola = calculate_cola(&request.cola);
    let survivor = calculate_survivor_benefit(&request.survivor);
    let health = calculate_health_premiums(&request.health);

    let monte_carlo = if request.monte_carlo.num_simulations > 0 {
        run_monte_carlo(&request.monte_carlo)?
    } else {
        MonteCarloOutcome::default()
    };

    let total_retirement_income = fers.annual_pension
        + csrs.annual_pension
        + srs.annual_srs
        + tsp.annual_withdrawal_income
        + social_security.annual_claiming_amount();
    let net_after_tax_income =
        total_retirement_income - health.first_year_premium() - tax.federal_tax - tax.state_tax;

    let notes = join_notes(&[
        &fers.notes,
        &csrs.notes,
        &srs.notes,
        &tsp.notes,
        &tax.notes,
        &social_security.notes,
        &cola.notes,
        &survivor.notes,
        &health.notes,
    ]);

    log::info!(
        "retirement summary: total {:.2}, net {:.2}",
        total_retirement_income,
        net_after_tax_income
    );

    Ok(RetirementOutcome {
        effective_tax_rate: tax.effective_rate,
        fers,
        csrs,
        srs,
        tsp,
        tax,
        social_security,
        cola,
        survivor,
        health,
        monte_carlo,
        total_retirement_income,
        net_after_tax_income,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::FilingStatus;
    use crate::cola::ColaPolicy;
    use crate::pension::{calculate_pension, RetirementSystem, SurvivorElection};
    use crate::projection::{ProjectionCola, ProjectionConfig, ProjectionEngine, ProjectionRequest};
    use crate::tsp::WithdrawalMethod;
    use approx::assert_relative_eq;

    fn fers_retiree() -> RetirementRequest {
        RetirementRequest {
            fers: PensionRequest {
                system: RetirementSystem::Fers,
                high3_salary: 90_000.0,
                years_of_service: 30.0,
                age_at_retirement: 62,
                survivor_election: SurvivorElection::Max,
                ..Default::default()
            },
            srs: SrsRequest {
                years_of_fers_service: 30.0,
                retirement_age: 62,
                is_immediate_unreduced_annuity: true,
                ..Default::default()
            },
            tsp: TspRequest {
                current_age: 62,
                retirement_age: 62,
                withdrawal_start_age: 62,
                current_balance: 500_000.0,
                withdrawal_method: WithdrawalMethod::Fixed,
                fixed_withdrawal_amount: 20_000.0,
                ..Default::default()
            },
            tax: TaxRequest {
                filing_status: FilingStatus::Single,
                age: 62,
                pension_income: 40_000.0,
                tsp_withdrawals: 20_000.0,
                ..Default::default()
            },
            social_security: SocialSecurityRequest {
                birth_year: 1963,
                current_age: 62,
                user_estimate_62: 1_800.0,
                user_estimate_fra: 2_400.0,
                user_estimate_70: 3_100.0,
                claim_age: 62,
                ..Default::default()
            },
            cola: ColaRequest {
                initial_amount: 40_000.0,
                cola_rate: 0.02,
                years: 5,
                policy: ColaPolicy::Fers,
                ..Default::default()
            },
            survivor: SurvivorRequest {
                pension_type: RetirementSystem::Fers,
                initial_annuity: 40_000.0,
                survivor_election: SurvivorElection::Max,
                cola_rate: 0.02,
                years_to_project: 5,
                ..Default::default()
            },
            health: HealthRequest {
                fehb_premium: 5_000.0,
                include_fehb: true,
                years_to_project: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_totals() {
        let outcome = calculate_retirement(&fers_retiree()).unwrap();

        // 90000 * 30 * 1.1% less 10% survivor reduction
        let fers = 90_000.0 * 30.0 * 0.011 * 0.9;
        assert_relative_eq!(outcome.fers.annual_pension, fers, epsilon = 1e-6);
        assert_eq!(outcome.csrs.annual_pension, 0.0);
        assert!(!outcome.srs.is_eligible);

        let total = fers + 20_000.0 + 1_800.0 * 12.0;
        assert_relative_eq!(outcome.total_retirement_income, total, epsilon = 1e-6);

        let net = total - 5_000.0 - outcome.tax.federal_tax - outcome.tax.state_tax;
        assert_relative_eq!(outcome.net_after_tax_income, net, epsilon = 1e-6);
        assert_eq!(outcome.effective_tax_rate, outcome.tax.effective_rate);
        assert!(outcome.monte_carlo.yearly_balances.is_empty());
    }

    #[test]
    fn test_notes_in_component_order() {
        let outcome = calculate_retirement(&fers_retiree()).unwrap();
        let lines: Vec<&str> = outcome.notes.lines().collect();
        let position = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();

        let fers = position("Maximum survivor benefit");
        let srs = position("Not eligible for SRS");
        let ss = position("SSA statement");
        let cola = position("FERS COLA cap");
        let survivor = position("FERS max: 50%");
        let health = position("FEHB included.");
        assert!(fers < srs && srs < ss && ss < cola && cola < survivor && survivor < health);
    }

    #[test]
    fn test_monte_carlo_only_when_requested() {
        let mut request = fers_retiree();
        request.monte_carlo = MonteCarloRequest {
            num_simulations: 10,
            years: 5,
            initial_balance: 500_000.0,
            annual_withdrawal: 20_000.0,
            expected_return: 0.05,
            seed: Some(3),
            ..Default::default()
        };
        let outcome = calculate_retirement(&request).unwrap();
        assert_eq!(outcome.monte_carlo.yearly_balances.len(), 10);
        assert_eq!(outcome.monte_carlo.success_rate, 1.0);
    }

    #[test]
    fn test_missing_tsp_section_is_not_depletion() {
        let mut request = fers_retiree();
        request.tsp = TspRequest::default();
        let outcome = calculate_retirement(&request).unwrap();
        assert!(outcome.tsp.depleted_at_age.is_none());
        assert!(!outcome.notes.contains("Balance depleted"));
        assert_eq!(outcome.tsp.annual_withdrawal_income, 0.0);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let mut request = fers_retiree();
        request.social_security.claim_age = 75;
        assert!(calculate_retirement(&request).is_err());
    }

    /// The summary's COLA table and the projection's pension growth are
    /// derived independently and are not expected to agree.
    #[test]
    fn test_summary_and_projection_pension_growth_diverge() {
        let mut summary_request = fers_retiree();
        summary_request.fers.age_at_retirement = 60;
        summary_request.cola = ColaRequest {
            initial_amount: 0.0,
            cola_rate: 0.025,
            years: 3,
            policy: ColaPolicy::Fers,
            retirement_age: Some(60),
            ..Default::default()
        };
        let summary = calculate_retirement(&summary_request).unwrap();
        let base = summary.fers.annual_pension;

        summary_request.cola.initial_amount = base;
        let cola_table = calculate_cola(&summary_request.cola);

        let projection_request = ProjectionRequest {
            pension: summary_request.fers.clone(),
            cola: ProjectionCola {
                inflation_rate: 0.025,
                apply_to_pension: true,
                apply_to_social_security: false,
            },
            end_age: 63,
            ..Default::default()
        };
        let pension = calculate_pension(&projection_request.pension);
        let projection = ProjectionEngine::new(ProjectionConfig::default())
            .project(&projection_request, &pension)
            .unwrap();

        // Summary path: no FERS COLA until 62. Projection path: full
        // inflation from the first year after retirement.
        assert_relative_eq!(cola_table.projected_amounts[0], base, epsilon = 1e-6);
        assert_relative_eq!(projection.rows[1].pension_income, base * 1.025, epsilon = 1e-6);
        assert!((cola_table.projected_amounts[0] - projection.rows[1].pension_income).abs() > 1.0);
    }
}
