//! Rate normalization
//!
//! Every formula in the engine works on a decimal per-period rate. Nominal
//! rates are entered in percent, either per year or per month.

use super::params::{LoanParameters, RateFrequency};

/// Months in a year; annual rates are divided evenly across them
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Convert a nominal percent rate to the decimal rate for one monthly period
pub fn period_rate(nominal_rate: f64, frequency: RateFrequency) -> f64 {
    match frequency {
        RateFrequency::Annual => (nominal_rate / 100.0) / PERIODS_PER_YEAR,
        RateFrequency::Monthly => nominal_rate / 100.0,
    }
}

/// Rescale a nominal rate when its frequency label is switched away from `from`
///
/// Annual to monthly divides by 12, monthly to annual multiplies by 12.
/// A zero rate is returned unchanged.
pub fn change_frequency(current_rate: f64, from: RateFrequency) -> f64 {
    if current_rate == 0.0 {
        return current_rate;
    }
    match from {
        RateFrequency::Annual => current_rate / PERIODS_PER_YEAR,
        RateFrequency::Monthly => current_rate * PERIODS_PER_YEAR,
    }
}

/// Monthly collateral growth from an annual percent rate
///
/// Always monthly, independent of the loan's own rate frequency.
pub fn monthly_growth_rate(annual_growth_percent: f64) -> f64 {
    (annual_growth_percent / 100.0) / PERIODS_PER_YEAR
}

/// Decimal rates consumed by the projection engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodRates {
    /// Loan interest per period
    pub interest: f64,
    /// Collateral appreciation per period
    pub growth: f64,
}

impl PeriodRates {
    pub fn from_params(params: &LoanParameters) -> Self {
        Self {
            interest: period_rate(params.interest_rate, params.frequency),
            growth: params
                .collateral
                .map(|c| monthly_growth_rate(c.annual_growth_rate))
                .unwrap_or(0.0),
        }
    }
}
