//! Batch runner for independent loan scenarios
//!
//! Each scenario gets its own [`Loan`], so runs share no state and can be
//! spread across threads.

use crate::error::LoanResult;
use crate::loan::{Loan, LoanParameters};
use crate::projection::{ProjectionEngine, ScheduleSummary, SimulationOutcome};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Named parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub params: LoanParameters,
}

/// Which unknown was filled in before simulating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolvedFor {
    Payment,
    Periods,
    Nothing,
}

/// One line of batch output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub solved_for: SolvedFor,
    pub outcome: SimulationOutcome,
    pub payment: f64,
    pub periods: u32,
    pub payments_made: u32,
    pub total_interest: f64,
    pub total_escrow: f64,
    pub total_paid: f64,
    pub final_equity: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(engine: ProjectionEngine) -> Self {
        Self { engine }
    }

    /// Fill in the missing payment or term, then simulate
    ///
    /// A payment of 0 is solved from the term; a term of 0 from the payment.
    /// If both are set they are used as given.
    pub fn run(&self, scenario: &Scenario) -> ScenarioReport {
        let mut loan = Loan::new(scenario.params.clone()).with_engine(self.engine.clone());

        let needs_payment = loan.params().payment <= 0.0;
        let needs_periods = loan.params().periods == 0;
        let solved_for = match (needs_payment, needs_periods) {
            (true, false) if loan.solve_payment().is_some() => SolvedFor::Payment,
            (false, true) if loan.solve_periods().is_some() => SolvedFor::Periods,
            _ => SolvedFor::Nothing,
        };

        let outcome = loan.simulate();
        if !outcome.has_schedule() {
            log::info!("scenario '{}' produced no schedule ({:?})", scenario.name, outcome);
        }

        let summary = ScheduleSummary::from_schedule(loan.params(), outcome, loan.schedule());
        ScenarioReport {
            name: scenario.name.clone(),
            solved_for,
            outcome,
            payment: loan.params().payment,
            periods: loan.params().periods,
            payments_made: summary.payments,
            total_interest: summary.total_interest,
            total_escrow: summary.total_escrow,
            total_paid: summary.total_paid,
            final_equity: summary.final_equity,
        }
    }

    /// Run every scenario in parallel, preserving input order
    pub fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        scenarios.par_iter().map(|scenario| self.run(scenario)).collect()
    }
}

/// Write batch reports as CSV with a header row
pub fn write_reports_csv<W: Write>(reports: &[ScenarioReport], writer: W) -> LoanResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for report in reports {
        csv_writer.serialize(report)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{Collateral, RateFrequency};
    use approx::assert_abs_diff_eq;

    fn scenario(name: &str, payment: f64, periods: u32, escrow: f64) -> Scenario {
        Scenario {
            name: name.to_string(),
            params: LoanParameters {
                principal: 200_000.0,
                interest_rate: 6.0,
                frequency: RateFrequency::Annual,
                periods,
                payment,
                escrow,
                collateral: Some(Collateral { value: 250_000.0, annual_growth_rate: 2.0 }),
            },
        }
    }

    #[test]
    fn test_solves_payment_when_missing() {
        let report = ScenarioRunner::default().run(&scenario("solve_payment", 0.0, 360, 100.0));
        assert_eq!(report.solved_for, SolvedFor::Payment);
        assert_abs_diff_eq!(report.payment, 1199.10, epsilon = 0.01);
        assert_eq!(report.periods, 360);
        // Escrow comes out of the payment, so payoff takes longer than the solved term
        assert_eq!(report.outcome, SimulationOutcome::Completed);
        assert!(report.payments_made > 360);
    }

    #[test]
    fn test_solves_periods_when_missing() {
        let report = ScenarioRunner::default().run(&scenario("solve_periods", 1800.0, 0, 200.0));
        assert_eq!(report.solved_for, SolvedFor::Periods);
        assert!(report.periods > 0);
        assert_eq!(report.outcome, SimulationOutcome::Completed);
        assert!(report.final_equity.unwrap() > 250_000.0);
    }

    #[test]
    fn test_rejected_scenario() {
        let report = ScenarioRunner::default().run(&scenario("no_escrow", 1800.0, 360, 0.0));
        assert_eq!(report.solved_for, SolvedFor::Nothing);
        assert_eq!(report.outcome, SimulationOutcome::Rejected);
        assert_eq!(report.payments_made, 0);
    }

    #[test]
    fn test_run_all_preserves_order() {
        let scenarios: Vec<Scenario> = (0..20)
            .map(|i| scenario(&format!("s{i}"), 1500.0 + 50.0 * i as f64, 0, 150.0))
            .collect();
        let reports = ScenarioRunner::default().run_all(&scenarios);
        assert_eq!(reports.len(), 20);
        for (scenario, report) in scenarios.iter().zip(&reports) {
            assert_eq!(scenario.name, report.name);
        }
        // Larger payments pay off sooner
        assert!(reports.windows(2).all(|w| w[1].payments_made <= w[0].payments_made));
    }

    #[test]
    fn test_reports_csv_header() {
        let reports = vec![ScenarioRunner::default().run(&scenario("one", 1800.0, 0, 200.0))];
        let mut buffer = Vec::new();
        write_reports_csv(&reports, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with(
            "name,solved_for,outcome,payment,periods,payments_made,total_interest,total_escrow,total_paid,final_equity\n"
        ));
        assert!(text.lines().nth(1).unwrap().starts_with("one,periods,completed,"));
    }
}
