//! Federal Retirement CLI
//!
//! Runs the retirement calculators on JSON request files

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use fed_retirement::assumptions::TAX_YEAR;
use fed_retirement::monte_carlo::{run_monte_carlo, MonteCarloRequest};
use fed_retirement::{
    calculate_pension, calculate_retirement, PensionRequest, ProjectionConfig, ProjectionRequest,
    RetirementRequest, ScenarioRunner, ScenarioStore,
};

#[derive(Parser)]
#[command(name = "fedret")]
#[command(about = "Retirement income for FERS and CSRS employees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot summary of every component
    Summary {
        /// Retirement request JSON
        input: PathBuf,
    },
    /// Year-by-year income projection
    Project {
        /// Projection request JSON
        input: PathBuf,

        /// Write the yearly rows to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// End age when the request leaves it unset
        #[arg(long, default_value_t = 95)]
        end_age: u32,
    },
    /// Monte Carlo simulation of TSP withdrawals
    MonteCarlo {
        /// Monte Carlo request JSON
        input: PathBuf,
    },
    /// FERS or CSRS annuity
    Pension {
        /// Pension request JSON
        input: PathBuf,
    },
    /// Saved scenario documents
    Scenarios {
        #[command(subcommand)]
        command: ScenarioCommands,

        /// Scenario directory (default ~/.fedret/scenarios)
        #[arg(long, global = true)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ScenarioCommands {
    /// List saved documents
    List,
    /// Run every scenario in a saved document
    Run { name: String },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn default_scenario_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home_dir.join(".fedret").join("scenarios"))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { input } => {
            let request: RetirementRequest = read_json(&input)?;
            let outcome = calculate_retirement(&request)?;
            println!("Total retirement income: ${:.2}", outcome.total_retirement_income);
            println!("Net after tax and health: ${:.2}", outcome.net_after_tax_income);
            println!(
                "Effective tax rate:      {:.2}% ({} tables)",
                outcome.effective_tax_rate * 100.0,
                TAX_YEAR
            );
            if !outcome.notes.is_empty() {
                println!("\nNotes:\n{}", outcome.notes);
            }
        }
        Commands::Project { input, csv, end_age } => {
            let mut request: ProjectionRequest = read_json(&input)?;
            if request.start_year == 0 {
                request.start_year = chrono::Local::now().year();
            }
            let runner = ScenarioRunner::new(ProjectionConfig {
                default_end_age: end_age,
                ..Default::default()
            });
            let result = runner.project(&request)?;

            println!(
                "{:>4} {:>5} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
                "Age", "Year", "Pension", "SocSec", "TSP", "Other", "Taxes", "Net", "TSP Balance"
            );
            println!("{}", "-".repeat(105));
            for row in &result.rows {
                println!(
                    "{:>4} {:>5} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                    row.age,
                    row.year,
                    row.pension_income,
                    row.social_security,
                    row.tsp_withdrawal,
                    row.other_income,
                    row.total_taxes,
                    row.net_income,
                    row.tsp_balance,
                );
            }

            println!("\nSummary:");
            println!("  Years projected: {}", result.years_projected);
            println!("  Total gross: ${:.2}", result.total_gross_income);
            println!("  Total net: ${:.2}", result.total_net_income);
            println!("  Average tax rate: {:.2}%", result.average_tax_rate() * 100.0);
            println!("  Max TSP balance: ${:.2}", result.max_tsp_balance);
            for note in &result.notes {
                println!("  {}", note);
            }

            if let Some(path) = csv {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                result.write_csv(file)?;
                println!("\nRows written to: {}", path.display());
            }
        }
        Commands::MonteCarlo { input } => {
            let request: MonteCarloRequest = read_json(&input)?;
            let outcome = run_monte_carlo(&request)?;
            println!("Success rate: {:.1}%", outcome.success_rate * 100.0);
            println!("Median final balance: ${:.2}", outcome.median_final_balance());
            for (rank, balance) in &outcome.percentiles {
                println!("  P{:<3} final balance: ${:.2}", rank, balance);
            }
        }
        Commands::Pension { input } => {
            let request: PensionRequest = read_json(&input)?;
            request.validate()?;
            let outcome = calculate_pension(&request);
            println!("Annual annuity:  ${:.2}", outcome.annual_pension);
            println!("Monthly annuity: ${:.2}", outcome.monthly_pension);
            if !outcome.notes.is_empty() {
                println!("\nNotes:\n{}", outcome.notes_text());
            }
        }
        Commands::Scenarios { command, dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => default_scenario_dir()?,
            };
            let store = ScenarioStore::new(dir);
            match command {
                ScenarioCommands::List => {
                    for name in store.list()? {
                        println!("{}", name);
                    }
                }
                ScenarioCommands::Run { name } => {
                    let scenarios = store.load(&name)?;
                    let runner = ScenarioRunner::default();
                    let mut results = Vec::with_capacity(scenarios.len());
                    for result in runner.run_batch(&scenarios) {
                        results.push(result?);
                    }
                    print_json(&results)?;
                }
            }
        }
    }

    Ok(())
}
