//! Run every loan scenario in a CSV file
//!
//! Outputs one summary row per scenario

use anyhow::{Context, Result};
use clap::Parser;
use loan_helper::loan::loader::load_scenarios;
use loan_helper::projection::{ProjectionConfig, ProjectionEngine, MAX_PERIODS};
use loan_helper::scenario::{write_reports_csv, ScenarioRunner};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_scenarios", about = "Batch loan amortization from a scenario CSV")]
struct Cli {
    /// Scenario CSV (name,principal,interest_rate,frequency,periods,payment,escrow,collateral_value,growth_rate)
    input: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "scenario_summary.csv")]
    output: PathBuf,

    /// Row cap per schedule, opening balance included
    #[arg(long, default_value_t = MAX_PERIODS)]
    max_periods: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let scenarios = load_scenarios(&cli.input)
        .with_context(|| format!("Failed to load scenarios from {}", cli.input.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new(ProjectionEngine::new(ProjectionConfig {
        max_periods: cli.max_periods,
    }));
    let reports = runner.run_all(&scenarios);

    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    write_reports_csv(&reports, BufWriter::new(file))?;
    println!("Output written to {}", cli.output.display());

    let completed = reports.iter().filter(|r| r.outcome.has_schedule()).count();
    println!("\nBatch Summary:");
    println!("  Scenarios with a schedule: {}/{}", completed, reports.len());
    for report in &reports {
        println!(
            "  {:<20} {:>10} payments={:<4} interest={:.0}",
            report.name,
            format!("{:?}", report.outcome),
            report.payments_made,
            report.total_interest
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
