//! Core amortization and equity projection loop

use super::schedule::Schedule;
use super::state::PeriodState;
use super::MAX_PERIODS;
use crate::error::{LoanError, LoanResult};
use crate::loan::{LoanParameters, PeriodRates};
use serde::{Deserialize, Serialize};

/// How a projection run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// Principal reached zero; final balance floored to exactly 0
    Completed,
    /// Hit the period cap before the loan was paid off
    Truncated,
    /// Principal grew past the amount borrowed; schedule cleared
    Diverged,
    /// Inputs failed validation; the previous schedule was kept
    Rejected,
}

impl SimulationOutcome {
    /// Whether the run produced a schedule worth displaying
    pub fn has_schedule(self) -> bool {
        matches!(self, SimulationOutcome::Completed | SimulationOutcome::Truncated)
    }
}

/// Projection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Maximum number of rows, opening balance included
    pub max_periods: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_periods: MAX_PERIODS,
        }
    }
}

/// Result of a single projection
#[derive(Debug, Clone)]
pub struct ProjectionResult {
    pub outcome: SimulationOutcome,
    pub schedule: Schedule,
}

/// Period-by-period loan and collateral projection
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project a loan until it is paid off, diverges or hits the period cap
    ///
    /// Returns an error only for invalid inputs. Divergence comes back as an
    /// empty schedule with [`SimulationOutcome::Diverged`].
    pub fn project(&self, params: &LoanParameters, rates: PeriodRates) -> LoanResult<ProjectionResult> {
        if self.config.max_periods == 0 {
            return Err(LoanError::invalid("max_periods", "period cap must allow the opening row"));
        }
        params.validate_for_simulation()?;
        if !rates.interest.is_finite() || rates.interest < 0.0 {
            return Err(LoanError::invalid("interest_rate", "period rate must not be negative"));
        }
        if !rates.growth.is_finite() || rates.growth < 0.0 {
            return Err(LoanError::invalid("collateral.annual_growth_rate", "growth rate must not be negative"));
        }

        let original_principal = params.principal;
        let mut periods = Vec::with_capacity(self.initial_capacity(params, rates.interest));
        let mut current = PeriodState::opening(original_principal, params.collateral.map(|c| c.value));
        periods.push(current);

        loop {
            if current.loan.principal <= 0.0 {
                break;
            }
            if periods.len() >= self.config.max_periods {
                log::warn!(
                    "projection truncated at {} periods with {:.2} principal outstanding",
                    periods.len(),
                    current.loan.principal
                );
                return Ok(ProjectionResult {
                    outcome: SimulationOutcome::Truncated,
                    schedule: Schedule::new(periods),
                });
            }

            current = current.advance(params.payment, params.escrow, rates.interest, rates.growth);
            if current.loan.principal > original_principal {
                log::warn!(
                    "projection diverged at period {}: principal {:.2} exceeds {:.2} borrowed",
                    current.loan.period,
                    current.loan.principal,
                    original_principal
                );
                return Ok(ProjectionResult {
                    outcome: SimulationOutcome::Diverged,
                    schedule: Schedule::default(),
                });
            }
            periods.push(current);
        }

        if let Some(last) = periods.last_mut() {
            last.close_out();
        }
        log::debug!("projection completed after {} payments", periods.len() - 1);

        Ok(ProjectionResult {
            outcome: SimulationOutcome::Completed,
            schedule: Schedule::new(periods),
        })
    }

    /// Closed-form term estimate used to size the row buffer
    ///
    /// Never above [`MAX_PERIODS`]; longer caps grow the buffer as rows arrive.
    fn initial_capacity(&self, params: &LoanParameters, interest_rate: f64) -> usize {
        let net_payment = params.payment - params.escrow;
        crate::loan::solver::period_count(params.principal, net_payment, interest_rate)
            .map(|n| n as usize + 1)
            .unwrap_or(MAX_PERIODS)
            .min(self.config.max_periods)
            .min(MAX_PERIODS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{Collateral, RateFrequency};
    use approx::assert_relative_eq;

    fn params(principal: f64, payment: f64, escrow: f64, monthly_rate: f64) -> LoanParameters {
        LoanParameters {
            principal,
            interest_rate: monthly_rate,
            frequency: RateFrequency::Monthly,
            periods: 0,
            payment,
            escrow,
            collateral: None,
        }
    }

    fn run(params: &LoanParameters) -> ProjectionResult {
        ProjectionEngine::default()
            .project(params, PeriodRates::from_params(params))
            .expect("valid inputs")
    }

    #[test]
    fn test_first_period() {
        let result = run(&params(100_000.0, 1000.0, 200.0, 0.5));
        assert_eq!(result.outcome, SimulationOutcome::Completed);

        let first = result.schedule.periods()[1].loan;
        assert_eq!(first.period, 1);
        assert_relative_eq!(first.interest, 500.0, epsilon = 1e-9);
        assert_relative_eq!(first.principal, 99_700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_completion_floors_final_principal() {
        let result = run(&params(10_000.0, 1100.0, 100.0, 1.0));
        assert_eq!(result.outcome, SimulationOutcome::Completed);

        let schedule = &result.schedule;
        assert_eq!(schedule.last().unwrap().loan.principal, 0.0);
        // Every earlier balance is still outstanding
        let balances: Vec<f64> = schedule.loan_states().map(|s| s.principal).collect();
        assert!(balances[..balances.len() - 1].iter().all(|&p| p > 0.0));
        for (i, state) in schedule.loan_states().enumerate() {
            assert_eq!(state.period as usize, i);
        }
    }

    #[test]
    fn test_payment_below_interest_and_escrow_diverges() {
        // First period needs 500 interest + 200 escrow
        let result = run(&params(100_000.0, 650.0, 200.0, 0.5));
        assert_eq!(result.outcome, SimulationOutcome::Diverged);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_interest_only_payment_truncates_at_cap() {
        // Principal never moves: neither grows nor shrinks
        let result = run(&params(100_000.0, 700.0, 200.0, 0.5));
        assert_eq!(result.outcome, SimulationOutcome::Truncated);
        assert_eq!(result.schedule.len(), MAX_PERIODS);
        assert!(result.schedule.last().unwrap().loan.principal > 0.0);
    }

    #[test]
    fn test_custom_cap() {
        let engine = ProjectionEngine::new(ProjectionConfig { max_periods: 24 });
        let p = params(200_000.0, 1500.0, 100.0, 0.5);
        let result = engine.project(&p, PeriodRates::from_params(&p)).unwrap();
        assert_eq!(result.outcome, SimulationOutcome::Truncated);
        assert_eq!(result.schedule.len(), 24);
    }

    #[test]
    fn test_unbounded_cap_diverges_without_preallocating() {
        let engine = ProjectionEngine::new(ProjectionConfig { max_periods: usize::MAX });
        let p = params(100_000.0, 650.0, 200.0, 0.5);
        let result = engine.project(&p, PeriodRates::from_params(&p)).unwrap();
        assert_eq!(result.outcome, SimulationOutcome::Diverged);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_large_cap_runs_past_default() {
        let engine = ProjectionEngine::new(ProjectionConfig { max_periods: 1_000_000_000 });
        // Paydown starts at 1 per month and compounds: about 1250 payments
        let p = params(100_000.0, 701.0, 200.0, 0.5);
        let result = engine.project(&p, PeriodRates::from_params(&p)).unwrap();
        assert_eq!(result.outcome, SimulationOutcome::Completed);
        assert!(result.schedule.len() > MAX_PERIODS);
        assert_eq!(result.schedule.last().unwrap().loan.principal, 0.0);
    }

    #[test]
    fn test_zero_cap_rejected() {
        let engine = ProjectionEngine::new(ProjectionConfig { max_periods: 0 });
        let p = params(100_000.0, 1000.0, 200.0, 0.5);
        assert!(engine.project(&p, PeriodRates::from_params(&p)).is_err());
    }

    #[test]
    fn test_invalid_inputs_error() {
        let engine = ProjectionEngine::default();
        let zero_escrow = params(100_000.0, 1000.0, 0.0, 0.5);
        assert!(engine.project(&zero_escrow, PeriodRates::from_params(&zero_escrow)).is_err());

        let no_payment = params(100_000.0, 0.0, 100.0, 0.5);
        assert!(engine.project(&no_payment, PeriodRates::from_params(&no_payment)).is_err());
    }

    #[test]
    fn test_equity_runs_in_lock_step() {
        let p = LoanParameters {
            collateral: Some(Collateral { value: 300_000.0, annual_growth_rate: 3.0 }),
            ..params(250_000.0, 2500.0, 300.0, 0.4)
        };
        let result = run(&p);
        assert_eq!(result.outcome, SimulationOutcome::Completed);

        let schedule = &result.schedule;
        assert!(schedule.has_equity());
        assert_eq!(schedule.equity_states().count(), schedule.loan_states().count());
        for row in schedule.periods() {
            let equity = row.equity.unwrap();
            assert_eq!(equity.period, row.loan.period);
            assert_relative_eq!(equity.equity, equity.collateral_value - row.loan.principal);
        }

        let values: Vec<f64> = schedule.equity_states().map(|e| e.collateral_value).collect();
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_zero_rate_loan() {
        let result = run(&params(12_000.0, 1100.0, 100.0, 0.0));
        assert_eq!(result.outcome, SimulationOutcome::Completed);
        assert_eq!(result.schedule.payment_count(), 12);
        assert_eq!(result.schedule.total_interest_paid(), 0.0);
    }
}
