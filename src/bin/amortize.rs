//! Solve and project a single loan
//!
//! Usage:
//!   amortize payment  --principal 200000 --rate 6 --periods 360
//!   amortize periods  --principal 200000 --rate 6 --payment 1500
//!   amortize schedule --params loan.json --output schedule.csv

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use loan_helper::loan::{load_parameters, Collateral};
use loan_helper::projection::{write_schedule_csv, ScheduleSummary};
use loan_helper::{Loan, LoanParameters, RateFrequency, SimulationOutcome};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "amortize", about = "Fixed-rate loan payment, term and equity calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the monthly payment from principal, rate and term
    Payment(LoanArgs),
    /// Solve the number of payments from principal, rate and payment
    Periods(LoanArgs),
    /// Simulate the loan period by period
    Schedule {
        #[command(flatten)]
        loan: LoanArgs,

        /// Write the schedule to this CSV file instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FrequencyArg {
    Annual,
    Monthly,
}

impl From<FrequencyArg> for RateFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Annual => RateFrequency::Annual,
            FrequencyArg::Monthly => RateFrequency::Monthly,
        }
    }
}

/// Loan inputs; flags override values loaded from `--params`
#[derive(Args, Debug)]
struct LoanArgs {
    /// JSON file with loan parameters
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long)]
    principal: Option<f64>,

    /// Nominal rate in percent
    #[arg(long)]
    rate: Option<f64>,

    #[arg(long, value_enum)]
    frequency: Option<FrequencyArg>,

    #[arg(long)]
    periods: Option<u32>,

    #[arg(long)]
    payment: Option<f64>,

    #[arg(long)]
    escrow: Option<f64>,

    /// Collateral value at period 0
    #[arg(long)]
    collateral: Option<f64>,

    /// Annual collateral growth in percent
    #[arg(long, requires = "collateral")]
    growth: Option<f64>,
}

impl LoanArgs {
    fn resolve(&self) -> Result<LoanParameters> {
        let mut params = match &self.params {
            Some(path) => load_parameters(path)
                .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
            None => LoanParameters::default(),
        };

        if let Some(principal) = self.principal {
            params.principal = principal;
        }
        if let Some(rate) = self.rate {
            params.interest_rate = rate;
        }
        if let Some(frequency) = self.frequency {
            params.frequency = frequency.into();
        }
        if let Some(periods) = self.periods {
            params.periods = periods;
        }
        if let Some(payment) = self.payment {
            params.payment = payment;
        }
        if let Some(escrow) = self.escrow {
            params.escrow = escrow;
        }
        if let Some(value) = self.collateral {
            params.collateral = Some(Collateral {
                value,
                annual_growth_rate: self.growth.unwrap_or(0.0),
            });
        }
        Ok(params)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Payment(args) => {
            let params = args.resolve()?;
            params.validate_for_payment()?;
            let mut loan = Loan::new(params);
            match loan.solve_payment() {
                Some(payment) => println!("Monthly payment: {payment:.2}"),
                None => bail!("No payment solves this loan"),
            }
        }
        Command::Periods(args) => {
            let params = args.resolve()?;
            params.validate_for_periods()?;
            let mut loan = Loan::new(params);
            match loan.solve_periods() {
                Some(periods) => println!("Payments required: {periods}"),
                None => bail!("Payment of {:.2} never covers the interest", loan.params().payment),
            }
        }
        Command::Schedule { loan: args, output } => {
            let mut loan = Loan::new(args.resolve()?);
            if loan.params().payment <= 0.0 && loan.solve_payment().is_none() {
                bail!("Give either --payment or a valid --periods");
            }
            loan.params().validate_for_simulation()?;

            let outcome = loan.simulate();
            match outcome {
                SimulationOutcome::Diverged => {
                    bail!("Payment of {:.2} does not cover interest plus escrow", loan.params().payment)
                }
                SimulationOutcome::Rejected => bail!("Loan parameters are incomplete"),
                SimulationOutcome::Truncated => {
                    log::warn!("Schedule stopped at {} rows before payoff", loan.schedule().len())
                }
                SimulationOutcome::Completed => {}
            }

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_schedule_csv(loan.schedule(), BufWriter::new(file))?;
                    println!("Schedule written to {}", path.display());
                }
                None => write_schedule_csv(loan.schedule(), std::io::stdout().lock())?,
            }

            let summary = ScheduleSummary::from_schedule(loan.params(), outcome, loan.schedule());
            eprintln!("\nLoan Summary:");
            eprintln!("  Payment:        {:.2}", summary.payment);
            eprintln!("  Payments:       {}", summary.payments);
            eprintln!("  Total interest: {:.2}", summary.total_interest);
            eprintln!("  Total escrow:   {:.2}", summary.total_escrow);
            eprintln!("  Total paid:     {:.2}", summary.total_paid);
            if let Some(equity) = summary.final_equity {
                eprintln!("  Final equity:   {:.2}", equity);
            }
        }
    }

    Ok(())
}
