//! Year-by-year retirement income projection
//!
//! Each year re-derives pension, Social Security, TSP and other income from
//! the request and runs the tax estimator on that year's figures. The TSP
//! balance is carried across years in a [`TspState`].

use serde::{Deserialize, Serialize};

use super::cashflows::{ProjectionResult, YearlyProjectionRow};
use crate::error::{EngineError, Result};
use crate::pension::{PensionOutcome, PensionRequest};
use crate::tax::{calculate_tax, TaxRequest};
use crate::tsp::{TspRequest, TspState};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// End age used when the request leaves it at 0
    pub default_end_age: u32,

    /// Keep every yearly row; totals are kept either way
    pub detailed_output: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_end_age: 95,
            detailed_output: true,
        }
    }
}

/// Social Security as a fixed benefit stream from a start age
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialSecurityStream {
    pub eligible: bool,
    pub start_age: u32,
    pub monthly_benefit: f64,
}

/// Inflation growth applied to each income stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionCola {
    /// Assumed annual CPI change
    pub inflation_rate: f64,
    pub apply_to_pension: bool,
    pub apply_to_social_security: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeFrequency {
    #[default]
    Annual,
    Monthly,
}

/// An additional income stream such as rent or part-time work
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherIncomeSource {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub frequency: IncomeFrequency,
    pub start_age: u32,
    /// Last age paid; open-ended when absent
    pub end_age: Option<u32>,
    pub apply_cola: bool,
}

impl OtherIncomeSource {
    /// Amount paid at an age, grown by inflation since the start age
    pub fn amount_at(&self, age: u32, inflation_rate: f64) -> f64 {
        if age < self.start_age || self.end_age.is_some_and(|end| age > end) {
            return 0.0;
        }
        let annual = match self.frequency {
            IncomeFrequency::Annual => self.amount,
            IncomeFrequency::Monthly => self.amount * 12.0,
        };
        if self.apply_cola {
            annual * growth_factor(inflation_rate, age - self.start_age)
        } else {
            annual
        }
    }
}

/// Everything needed to project retirement income year by year
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionRequest {
    pub pension: PensionRequest,
    pub social_security: SocialSecurityStream,
    pub tsp: TspRequest,
    /// Filing status, deductions, credits and state rate; income fields are
    /// filled per year
    pub tax: TaxRequest,
    pub cola: ProjectionCola,
    pub other_income: Vec<OtherIncomeSource>,
    /// 0 starts at the pension retirement age
    pub start_age: u32,
    /// 0 uses the configured default end age
    pub end_age: u32,
    /// Calendar year of the first row
    pub start_year: i32,
}

fn growth_factor(rate: f64, years: u32) -> f64 {
    (1.0 + rate).powi(years as i32)
}

/// Projection engine
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Resolve the (start, end) ages for a request
    pub fn age_range(&self, request: &ProjectionRequest) -> Result<(u32, u32)> {
        let start = if request.start_age == 0 {
            request.pension.age_at_retirement
        } else {
            request.start_age
        };
        let end = if request.end_age == 0 {
            self.config.default_end_age
        } else {
            request.end_age
        };
        if end < start {
            return Err(EngineError::validation(
                "endAge",
                format!("{} is before start age {}", end, start),
            ));
        }
        Ok((start, end))
    }

    /// Project a request; the pension outcome is computed by the caller
    pub fn project(
        &self,
        request: &ProjectionRequest,
        pension: &PensionOutcome,
    ) -> Result<ProjectionResult> {
        let (start_age, end_age) = self.age_range(request)?;
        log::info!(
            "projecting ages {}..={} from {}",
            start_age,
            end_age,
            request.start_year
        );

        let mut state = TspState::new(start_age, request.tsp.current_balance);
        let mut result = ProjectionResult::new(request.tsp.current_balance);

        for age in start_age..=end_age {
            let row = self.calculate_year(request, pension, age, start_age, &mut state);
            result.add_row(row, self.config.detailed_output);
        }

        if let Some(age) = state.depleted_at_age {
            result.notes.push(format!("TSP balance depleted at age {}.", age));
        }
        result.notes.extend(pension.notes.iter().cloned());
        Ok(result)
    }

    fn calculate_year(
        &self,
        request: &ProjectionRequest,
        pension: &PensionOutcome,
        age: u32,
        start_age: u32,
        state: &mut TspState,
    ) -> YearlyProjectionRow {
        let cola = &request.cola;
        let elapsed = age - start_age;

        let mut pension_income = pension.annual_pension;
        let retirement_age = request.pension.age_at_retirement;
        if cola.apply_to_pension && age > retirement_age {
            pension_income *= growth_factor(cola.inflation_rate, age - retirement_age);
        }

        let ss = &request.social_security;
        let mut social_security = 0.0;
        if ss.eligible && age >= ss.start_age {
            social_security = ss.monthly_benefit * 12.0;
            if cola.apply_to_social_security {
                social_security *= growth_factor(cola.inflation_rate, age - ss.start_age);
            }
        }

        let tsp_year = state.advance(&request.tsp);
        let tsp_withdrawal = tsp_year.withdrawal;

        let other_income: f64 = request
            .other_income
            .iter()
            .map(|source| source.amount_at(age, cola.inflation_rate))
            .sum();

        let spouse_age = if request.tax.spouse_age > 0 {
            request.tax.spouse_age + elapsed
        } else {
            0
        };
        let tax = calculate_tax(&TaxRequest {
            age,
            spouse_age,
            pension_income,
            tsp_withdrawals: tsp_withdrawal,
            other_income,
            social_security_income: social_security,
            ..request.tax.clone()
        });

        let total_gross_income = pension_income + social_security + tsp_withdrawal + other_income;
        YearlyProjectionRow {
            age,
            year: request.start_year + elapsed as i32,
            pension_income,
            social_security,
            tsp_withdrawal,
            other_income,
            total_gross_income,
            federal_tax: tax.federal_tax,
            state_tax: tax.state_tax,
            total_taxes: tax.total_tax,
            net_income: total_gross_income - tax.total_tax,
            tsp_balance: tsp_year.ending_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::FilingStatus;
    use crate::pension::{calculate_pension, RetirementSystem};
    use crate::tsp::WithdrawalMethod;
    use approx::assert_relative_eq;

    fn test_request() -> ProjectionRequest {
        ProjectionRequest {
            pension: PensionRequest {
                system: RetirementSystem::Fers,
                high3_salary: 100_000.0,
                years_of_service: 30.0,
                age_at_retirement: 62,
                ..Default::default()
            },
            social_security: SocialSecurityStream {
                eligible: true,
                start_age: 67,
                monthly_benefit: 2_000.0,
            },
            tsp: TspRequest {
                current_age: 62,
                retirement_age: 62,
                withdrawal_start_age: 62,
                current_balance: 500_000.0,
                expected_return_rate: 0.05,
                withdrawal_method: WithdrawalMethod::Fixed,
                fixed_withdrawal_amount: 20_000.0,
                ..Default::default()
            },
            tax: TaxRequest {
                filing_status: FilingStatus::Single,
                ..Default::default()
            },
            cola: ProjectionCola {
                inflation_rate: 0.04,
                apply_to_pension: true,
                apply_to_social_security: true,
            },
            other_income: vec![OtherIncomeSource {
                id: "rent".to_string(),
                name: "Rental".to_string(),
                amount: 1_000.0,
                frequency: IncomeFrequency::Monthly,
                start_age: 62,
                end_age: Some(64),
                apply_cola: false,
            }],
            start_age: 0,
            end_age: 70,
            start_year: 2030,
        }
    }

    fn project(request: &ProjectionRequest) -> ProjectionResult {
        let pension = calculate_pension(&request.pension);
        ProjectionEngine::new(ProjectionConfig::default())
            .project(request, &pension)
            .unwrap()
    }

    #[test]
    fn test_rows_span_start_to_end() {
        let result = project(&test_request());
        assert_eq!(result.rows.len(), 9);
        assert_eq!(result.rows[0].age, 62);
        assert_eq!(result.rows[0].year, 2030);
        assert_eq!(result.rows[8].age, 70);
        assert_eq!(result.rows[8].year, 2038);
    }

    #[test]
    fn test_pension_grows_with_inflation() {
        let result = project(&test_request());
        assert_relative_eq!(result.rows[0].pension_income, 33_000.0, epsilon = 1e-6);
        assert_relative_eq!(result.rows[1].pension_income, 34_320.0, epsilon = 1e-6);
        assert_relative_eq!(
            result.rows[2].pension_income,
            33_000.0 * 1.04 * 1.04,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_social_security_from_start_age() {
        let result = project(&test_request());
        assert_eq!(result.rows[4].social_security, 0.0);
        assert_relative_eq!(result.rows[5].social_security, 24_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.rows[6].social_security, 24_000.0 * 1.04, epsilon = 1e-9);
    }

    #[test]
    fn test_other_income_window() {
        let result = project(&test_request());
        assert_eq!(result.rows[0].other_income, 12_000.0);
        assert_eq!(result.rows[2].other_income, 12_000.0);
        assert_eq!(result.rows[3].other_income, 0.0);
    }

    #[test]
    fn test_tsp_balance_carried() {
        let result = project(&test_request());
        assert_relative_eq!(result.rows[0].tsp_withdrawal, 20_000.0);
        assert_relative_eq!(result.rows[0].tsp_balance, 480_000.0 * 1.05, epsilon = 1e-6);
        assert_relative_eq!(
            result.rows[1].tsp_balance,
            (504_000.0 - 20_000.0) * 1.05,
            epsilon = 1e-6
        );
        assert_eq!(result.final_tsp_balance, result.rows[8].tsp_balance);
    }

    #[test]
    fn test_row_identities() {
        let result = project(&test_request());
        for row in &result.rows {
            let gross =
                row.pension_income + row.social_security + row.tsp_withdrawal + row.other_income;
            assert_relative_eq!(row.total_gross_income, gross, epsilon = 1e-9);
            assert_relative_eq!(row.total_taxes, row.federal_tax + row.state_tax, epsilon = 1e-9);
            assert_relative_eq!(row.net_income, gross - row.total_taxes, epsilon = 1e-9);
            assert!(row.federal_tax > 0.0);
        }
        let taxes: f64 = result.rows.iter().map(|r| r.total_taxes).sum();
        assert_relative_eq!(result.total_taxes, taxes, epsilon = 1e-6);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let request = ProjectionRequest {
            start_age: 70,
            end_age: 65,
            ..test_request()
        };
        let pension = calculate_pension(&request.pension);
        let err = ProjectionEngine::new(ProjectionConfig::default())
            .project(&request, &pension)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { field: "endAge", .. }));
    }

    #[test]
    fn test_default_end_age_and_summary_only() {
        let request = ProjectionRequest {
            end_age: 0,
            ..test_request()
        };
        let pension = calculate_pension(&request.pension);
        let engine = ProjectionEngine::new(ProjectionConfig {
            detailed_output: false,
            ..Default::default()
        });
        let result = engine.project(&request, &pension).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.years_projected, 95 - 62 + 1);
    }

    #[test]
    fn test_depletion_note() {
        let mut request = test_request();
        request.tsp.current_balance = 30_000.0;
        request.tsp.expected_return_rate = 0.0;
        let result = project(&request);
        assert_eq!(result.rows[1].tsp_balance, 0.0);
        assert_eq!(result.rows[2].tsp_withdrawal, 0.0);
        assert_eq!(result.notes[0], "TSP balance depleted at age 63.");
    }
}
