//! Run the projection for every scenario in a document
//!
//! Outputs per-age totals across all scenarios as CSV

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use fed_retirement::scenario::load_file;
use fed_retirement::{ProjectionConfig, ProjectionResult, ScenarioRunner};

#[derive(Parser)]
#[command(name = "scenario_batch")]
#[command(about = "Project every scenario in a file and aggregate by age", long_about = None)]
struct Args {
    /// Scenario document (`{"scenarios": [...]}`)
    input: PathBuf,

    #[arg(short, long, default_value = "scenario_batch_output.csv")]
    output: PathBuf,

    /// End age for projections that leave it unset
    #[arg(long, default_value_t = 95)]
    end_age: u32,
}

/// Aggregated results for one age across all scenarios
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AggregatedRow {
    age: u32,
    scenarios: u32,
    pension: f64,
    social_security: f64,
    tsp_withdrawal: f64,
    other_income: f64,
    gross_income: f64,
    taxes: f64,
    net_income: f64,
    tsp_balance: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading scenarios from {}...", args.input.display());
    let scenarios = load_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new(ProjectionConfig {
        default_end_age: args.end_age,
        detailed_output: true,
    });

    println!("Running projections...");
    let proj_start = Instant::now();

    // Run projections in parallel
    let results: Vec<ProjectionResult> = scenarios
        .par_iter()
        .filter_map(|scenario| scenario.data.projection.as_ref())
        .map(|request| runner.project(request))
        .collect::<fed_retirement::Result<_>>()?;

    println!(
        "{} projections complete in {:?}",
        results.len(),
        proj_start.elapsed()
    );

    let mut aggregated: BTreeMap<u32, AggregatedRow> = BTreeMap::new();
    for result in &results {
        for row in &result.rows {
            let agg = aggregated.entry(row.age).or_insert_with(|| AggregatedRow {
                age: row.age,
                ..Default::default()
            });
            agg.scenarios += 1;
            agg.pension += row.pension_income;
            agg.social_security += row.social_security;
            agg.tsp_withdrawal += row.tsp_withdrawal;
            agg.other_income += row.other_income;
            agg.gross_income += row.total_gross_income;
            agg.taxes += row.total_taxes;
            agg.net_income += row.net_income;
            agg.tsp_balance += row.tsp_balance;
        }
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in aggregated.values() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    let depleted = results
        .iter()
        .filter(|r| r.notes.iter().any(|n| n.starts_with("TSP balance depleted")))
        .count();
    println!("\nBatch Summary:");
    println!("  Scenarios projected: {}", results.len());
    println!("  TSP depleted in:     {}", depleted);
    if let Some(first) = aggregated.values().next() {
        println!(
            "  Age {}: gross=${:.0}, net=${:.0}",
            first.age, first.gross_income, first.net_income
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
