//! Generated amortization schedule

use super::state::{EquityState, LoanState, PeriodState};
use std::cell::Cell;

/// Ordered period-by-period history of one simulation run
///
/// Built once and never appended to. Totals are computed on first use and
/// cached for the life of the schedule; a new run produces a new schedule.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    periods: Vec<PeriodState>,
    total_interest: Cell<Option<f64>>,
}

impl Schedule {
    pub(crate) fn new(periods: Vec<PeriodState>) -> Self {
        Self {
            periods,
            total_interest: Cell::new(None),
        }
    }

    pub fn periods(&self) -> &[PeriodState] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Empty means the loan could not be amortized, not a zero-length loan
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Number of payments made (rows after the opening balance)
    pub fn payment_count(&self) -> u32 {
        self.periods.len().saturating_sub(1) as u32
    }

    pub fn loan_states(&self) -> impl Iterator<Item = &LoanState> + '_ {
        self.periods.iter().map(|p| &p.loan)
    }

    pub fn equity_states(&self) -> impl Iterator<Item = &EquityState> + '_ {
        self.periods.iter().filter_map(|p| p.equity.as_ref())
    }

    pub fn has_equity(&self) -> bool {
        self.periods.first().is_some_and(|p| p.equity.is_some())
    }

    pub fn opening(&self) -> Option<&PeriodState> {
        self.periods.first()
    }

    pub fn last(&self) -> Option<&PeriodState> {
        self.periods.last()
    }

    /// Sum of interest charged over every period
    pub fn total_interest_paid(&self) -> f64 {
        if let Some(total) = self.total_interest.get() {
            return total;
        }
        let total = self.periods.iter().map(|p| p.loan.interest).sum();
        self.total_interest.set(Some(total));
        total
    }
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.periods == other.periods
    }
}
