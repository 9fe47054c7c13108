//! Monte Carlo simulation of withdrawal sustainability
//!
//! Each run draws independent normal returns and inflation for every year
//! and withdraws an inflation-grown amount until the balance runs out.
//!
//! Runs are independent and execute in parallel. Every run owns a
//! `ChaCha8Rng`; with a seed, run `i` is seeded from `seed + i`, so results
//! do not depend on scheduling. Statistics are computed once all runs have
//! been collected.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DEFAULT_SIMULATIONS: u32 = 1_000;
pub const DEFAULT_YEARS: u32 = 30;

/// Percentile ranks reported for final balances
pub const PERCENTILE_RANKS: [u32; 5] = [10, 25, 50, 75, 90];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonteCarloRequest {
    /// 0 means the default of 1000
    pub num_simulations: u32,
    /// 0 means the default of 30
    pub years: u32,
    pub initial_balance: f64,
    /// First-year withdrawal; grows with simulated inflation
    pub annual_withdrawal: f64,
    pub expected_return: f64,
    pub return_std_dev: f64,
    pub inflation_mean: f64,
    pub inflation_std_dev: f64,
    /// `None` or 0 draws a fresh seed from the OS
    pub seed: Option<u64>,
}

impl MonteCarloRequest {
    pub fn simulations(&self) -> u32 {
        if self.num_simulations == 0 {
            DEFAULT_SIMULATIONS
        } else {
            self.num_simulations
        }
    }

    pub fn horizon(&self) -> u32 {
        if self.years == 0 {
            DEFAULT_YEARS
        } else {
            self.years
        }
    }

    fn distributions(&self) -> Result<(Normal<f64>, Normal<f64>)> {
        let returns = normal("returnStdDev", self.expected_return, self.return_std_dev)?;
        let inflation = normal("inflationStdDev", self.inflation_mean, self.inflation_std_dev)?;
        Ok((returns, inflation))
    }
}

fn normal(field: &'static str, mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
        return Err(EngineError::validation(
            field,
            format!("needs a finite mean and non-negative deviation, got ({}, {})", mean, std_dev),
        ));
    }
    Normal::new(mean, std_dev).map_err(|e| EngineError::validation(field, e.to_string()))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloOutcome {
    /// Share of runs that end with money left
    pub success_rate: f64,
    /// Final balance at each rank in `PERCENTILE_RANKS`
    pub percentiles: BTreeMap<u32, f64>,
    /// `[run][year]` end-of-year balances
    pub yearly_balances: Vec<Vec<f64>>,
    /// Share of runs that first ran out of money in each year; not cumulative
    pub depletion_probability_by_year: Vec<f64>,
}

impl MonteCarloOutcome {
    pub fn median_final_balance(&self) -> f64 {
        self.percentiles.get(&50).copied().unwrap_or(0.0)
    }
}

/// Balance path of one simulated run
#[derive(Debug, Clone)]
struct RunPath {
    balances: Vec<f64>,
    depleted_in_year: Option<usize>,
}

impl RunPath {
    fn final_balance(&self) -> f64 {
        self.balances.last().copied().unwrap_or(0.0)
    }
}

fn simulate_run<R: Rng>(
    request: &MonteCarloRequest,
    years: usize,
    returns: &Normal<f64>,
    inflation: &Normal<f64>,
    rng: &mut R,
) -> RunPath {
    let mut balance = request.initial_balance;
    let mut balances = Vec::with_capacity(years);
    let mut depleted_in_year = None;

    for year in 0..years {
        // Draw every year so a run's stream does not depend on when it depletes
        let annual_return = rng.sample(returns);
        let annual_inflation = rng.sample(inflation);
        if depleted_in_year.is_none() {
            let withdrawal = request.annual_withdrawal * (1.0 + annual_inflation).powi(year as i32);
            balance = balance * (1.0 + annual_return) - withdrawal;
            if balance <= 0.0 {
                balance = 0.0;
                depleted_in_year = Some(year);
            }
        }
        balances.push(balance);
    }

    RunPath {
        balances,
        depleted_in_year,
    }
}

/// Nearest-rank percentile over ascending sorted values
pub fn percentile(sorted: &[f64], rank: u32) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (f64::from(rank) / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}

fn base_seed(seed: Option<u64>) -> Option<u64> {
    seed.filter(|&s| s != 0)
}

/// Run the simulation
pub fn run_monte_carlo(request: &MonteCarloRequest) -> Result<MonteCarloOutcome> {
    let (returns, inflation) = request.distributions()?;
    let simulations = request.simulations() as usize;
    let years = request.horizon() as usize;
    let seed = base_seed(request.seed);

    log::info!(
        "Monte Carlo: {} runs over {} years (seed {:?})",
        simulations,
        years,
        seed
    );

    let runs: Vec<RunPath> = (0..simulations)
        .into_par_iter()
        .map(|run_idx| {
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
                None => ChaCha8Rng::from_entropy(),
            };
            simulate_run(request, years, &returns, &inflation, &mut rng)
        })
        .collect();

    let mut finals: Vec<f64> = runs.iter().map(RunPath::final_balance).collect();
    finals.sort_by(|a, b| a.total_cmp(b));

    let successes = finals.iter().filter(|&&b| b > 0.0).count();
    let percentiles = PERCENTILE_RANKS
        .iter()
        .map(|&rank| (rank, percentile(&finals, rank)))
        .collect();

    let mut first_depletions = vec![0usize; years];
    for year in runs.iter().filter_map(|run| run.depleted_in_year) {
        first_depletions[year] += 1;
    }
    let depletion_probability_by_year = first_depletions
        .iter()
        .map(|&count| count as f64 / simulations as f64)
        .collect();

    let success_rate = successes as f64 / simulations as f64;
    log::debug!("Monte Carlo success rate {:.4}", success_rate);

    Ok(MonteCarloOutcome {
        success_rate,
        percentiles,
        yearly_balances: runs.into_iter().map(|run| run.balances).collect(),
        depletion_probability_by_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn request() -> MonteCarloRequest {
        MonteCarloRequest {
            num_simulations: 200,
            years: 30,
            initial_balance: 1_000_000.0,
            annual_withdrawal: 40_000.0,
            expected_return: 0.06,
            return_std_dev: 0.12,
            inflation_mean: 0.025,
            inflation_std_dev: 0.01,
            seed: Some(42),
        }
    }

    #[test]
    fn test_immediate_depletion() {
        let req = MonteCarloRequest {
            num_simulations: 50,
            years: 20,
            initial_balance: 50_000.0,
            annual_withdrawal: 50_000.0,
            expected_return: 0.0,
            return_std_dev: 0.0,
            inflation_mean: 0.0,
            inflation_std_dev: 0.0,
            seed: Some(7),
        };
        let outcome = run_monte_carlo(&req).unwrap();
        assert_eq!(outcome.success_rate, 0.0);
        assert_eq!(outcome.yearly_balances.len(), 50);
        for run in &outcome.yearly_balances {
            assert_eq!(run.len(), 20);
            assert_eq!(run[0], 0.0);
        }
        assert_eq!(outcome.depletion_probability_by_year[0], 1.0);
        assert!(outcome.depletion_probability_by_year[1..].iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_zero_variance_runs_identical() {
        let req = MonteCarloRequest {
            return_std_dev: 0.0,
            inflation_std_dev: 0.0,
            ..request()
        };
        let outcome = run_monte_carlo(&req).unwrap();
        let first = &outcome.yearly_balances[0];
        assert!(outcome.yearly_balances.iter().all(|run| run == first));
        // 1_000_000 * 1.06 - 40_000
        assert_relative_eq!(first[0], 1_020_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let a = run_monte_carlo(&request()).unwrap();
        let b = run_monte_carlo(&request()).unwrap();
        assert_eq!(a.yearly_balances, b.yearly_balances);
        assert_eq!(a.success_rate, b.success_rate);
        assert_eq!(a.percentiles, b.percentiles);
    }

    #[test]
    fn test_defaults_applied() {
        let req = MonteCarloRequest {
            num_simulations: 0,
            years: 0,
            initial_balance: 100.0,
            seed: Some(1),
            ..Default::default()
        };
        let outcome = run_monte_carlo(&req).unwrap();
        assert_eq!(outcome.yearly_balances.len(), 1_000);
        assert_eq!(outcome.depletion_probability_by_year.len(), 30);
        assert_eq!(outcome.success_rate, 1.0);
    }

    #[test]
    fn test_depletion_is_density() {
        let outcome = run_monte_carlo(&MonteCarloRequest {
            initial_balance: 300_000.0,
            ..request()
        })
        .unwrap();
        let total: f64 = outcome.depletion_probability_by_year.iter().sum();
        assert_relative_eq!(total, 1.0 - outcome.success_rate, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let req = MonteCarloRequest {
            return_std_dev: -0.1,
            ..request()
        };
        assert!(matches!(
            run_monte_carlo(&req),
            Err(EngineError::Validation { field: "returnStdDev", .. })
        ));
        let req = MonteCarloRequest {
            inflation_std_dev: f64::NAN,
            ..request()
        };
        assert!(run_monte_carlo(&req).is_err());
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let data: Vec<f64> = (0..11).map(f64::from).collect();
        assert_eq!(percentile(&data, 10), 1.0);
        assert_eq!(percentile(&data, 50), 5.0);
        assert_eq!(percentile(&data, 90), 9.0);
        assert_eq!(percentile(&[3.0], 75), 3.0);
        assert_eq!(percentile(&[], 50), 0.0);
        // index round(0.25 * 3) = 1
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 25), 2.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_success_rate_and_percentile_order(
            balance in 0.0f64..2_000_000.0,
            withdrawal in 0.0f64..150_000.0,
            mean in -0.05f64..0.12,
            sd in 0.0f64..0.3,
            seed in 1u64..u64::MAX,
        ) {
            let req = MonteCarloRequest {
                num_simulations: 40,
                years: 15,
                initial_balance: balance,
                annual_withdrawal: withdrawal,
                expected_return: mean,
                return_std_dev: sd,
                inflation_mean: 0.02,
                inflation_std_dev: 0.01,
                seed: Some(seed),
            };
            let outcome = run_monte_carlo(&req).unwrap();
            prop_assert!((0.0..=1.0).contains(&outcome.success_rate));
            let p = &outcome.percentiles;
            prop_assert!(p[&10] <= p[&25]);
            prop_assert!(p[&25] <= p[&50]);
            prop_assert!(p[&50] <= p[&75]);
            prop_assert!(p[&75] <= p[&90]);
        }

        #[test]
        fn prop_zero_variance_is_deterministic(
            mean in -0.05f64..0.1,
            seed in 1u64..1_000_000,
        ) {
            let req = MonteCarloRequest {
                num_simulations: 8,
                years: 10,
                initial_balance: 500_000.0,
                annual_withdrawal: 30_000.0,
                expected_return: mean,
                inflation_mean: 0.02,
                seed: Some(seed),
                ..Default::default()
            };
            let outcome = run_monte_carlo(&req).unwrap();
            let first = outcome.yearly_balances[0].clone();
            prop_assert!(outcome.yearly_balances.iter().all(|run| *run == first));
        }
    }
}
