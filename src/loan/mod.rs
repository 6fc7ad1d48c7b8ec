//! Loan inputs, rate conversion, closed-form solvers and the stateful loan

mod params;
pub mod rate;
pub mod solver;
pub mod loader;

pub use params::{LoanParameters, RateFrequency, Collateral};
pub use rate::PeriodRates;
pub use loader::{load_parameters, load_parameters_from_reader};

use crate::projection::{ProjectionEngine, Schedule, SimulationOutcome};
use std::cell::Cell;

/// A loan together with its most recent schedule
///
/// Derived rates are cached until a field they depend on is written.
/// Solver and simulation calls with unusable inputs leave everything as it was.
/// Caches use interior mutability, so a `Loan` is not `Sync`; share one across
/// threads only behind a lock.
#[derive(Debug, Clone, Default)]
pub struct Loan {
    params: LoanParameters,
    period_rate: Cell<Option<f64>>,
    growth_rate: Cell<Option<f64>>,
    schedule: Schedule,
    engine: ProjectionEngine,
}

impl Loan {
    pub fn new(params: LoanParameters) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Use a non-default projection engine (e.g. a different period cap)
    pub fn with_engine(mut self, engine: ProjectionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn params(&self) -> &LoanParameters {
        &self.params
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    pub fn set_principal(&mut self, principal: f64) {
        self.params.principal = principal;
    }

    pub fn set_interest_rate(&mut self, interest_rate: f64) {
        self.params.interest_rate = interest_rate;
        self.period_rate.set(None);
    }

    /// Relabel the rate frequency without rescaling the rate
    pub fn set_frequency(&mut self, frequency: RateFrequency) {
        self.params.frequency = frequency;
        self.period_rate.set(None);
    }

    /// Switch frequency and rescale the nominal rate to match
    ///
    /// 6% annual becomes 0.5% monthly and back. No-op for the current frequency.
    pub fn change_frequency(&mut self, frequency: RateFrequency) {
        if frequency == self.params.frequency {
            return;
        }
        self.params.interest_rate = rate::change_frequency(self.params.interest_rate, self.params.frequency);
        self.params.frequency = frequency;
        self.period_rate.set(None);
    }

    pub fn set_periods(&mut self, periods: u32) {
        self.params.periods = periods;
    }

    pub fn set_payment(&mut self, payment: f64) {
        self.params.payment = payment;
    }

    pub fn set_escrow(&mut self, escrow: f64) {
        self.params.escrow = escrow;
    }

    pub fn set_collateral(&mut self, collateral: Option<Collateral>) {
        self.params.collateral = collateral;
        self.growth_rate.set(None);
    }

    // ------------------------------------------------------------------
    // Derived rates
    // ------------------------------------------------------------------

    /// Decimal interest rate per monthly period
    pub fn period_rate(&self) -> f64 {
        if let Some(rate) = self.period_rate.get() {
            return rate;
        }
        let rate = rate::period_rate(self.params.interest_rate, self.params.frequency);
        self.period_rate.set(Some(rate));
        rate
    }

    /// Decimal collateral growth per monthly period (0 without collateral)
    pub fn monthly_growth_rate(&self) -> f64 {
        if let Some(rate) = self.growth_rate.get() {
            return rate;
        }
        let rate = self
            .params
            .collateral
            .map(|c| rate::monthly_growth_rate(c.annual_growth_rate))
            .unwrap_or(0.0);
        self.growth_rate.set(Some(rate));
        rate
    }

    pub fn rates(&self) -> PeriodRates {
        PeriodRates {
            interest: self.period_rate(),
            growth: self.monthly_growth_rate(),
        }
    }

    // ------------------------------------------------------------------
    // Solvers
    // ------------------------------------------------------------------

    /// Solve and store the payment from principal, rate and periods
    ///
    /// Returns `None` and keeps the current payment if inputs are unusable.
    pub fn solve_payment(&mut self) -> Option<f64> {
        if self.params.validate_for_payment().is_err() {
            return None;
        }
        let payment = solver::payment_amount(self.params.principal, self.period_rate(), self.params.periods)?;
        self.params.payment = payment;
        Some(payment)
    }

    /// Solve and store the number of periods from principal, rate and payment
    ///
    /// Returns `None` and keeps the current period count if inputs are
    /// unusable or the payment never covers the interest.
    pub fn solve_periods(&mut self) -> Option<u32> {
        if self.params.validate_for_periods().is_err() {
            return None;
        }
        let periods = solver::period_count(self.params.principal, self.params.payment, self.period_rate())?;
        self.params.periods = periods;
        Some(periods)
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Rebuild the schedule from the current inputs
    ///
    /// On [`SimulationOutcome::Rejected`] the previous schedule is untouched.
    /// On [`SimulationOutcome::Diverged`] the schedule is empty.
    pub fn simulate(&mut self) -> SimulationOutcome {
        match self.engine.project(&self.params, self.rates()) {
            Ok(result) => {
                self.schedule = result.schedule;
                result.outcome
            }
            Err(err) => {
                log::debug!("simulation skipped: {err}");
                SimulationOutcome::Rejected
            }
        }
    }

    /// Interest over the current schedule, cached until the next simulation
    pub fn total_interest_paid(&self) -> f64 {
        self.schedule.total_interest_paid()
    }
}
