//! Per-period state records

use serde::Serialize;

/// Loan balance after a period's payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanState {
    /// 0 is the opening balance before any payment
    pub period: u32,
    /// Principal still owed, floored to exactly 0 on the final payment
    pub principal: f64,
    /// Interest charged this period on the previous balance
    pub interest: f64,
}

/// Collateral value and owner equity at the same period as its [`LoanState`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquityState {
    pub period: u32,
    pub collateral_value: f64,
    /// Collateral value less outstanding principal
    pub equity: f64,
}

/// One row of the schedule
///
/// Loan and equity are stored together so the two histories can never
/// differ in length. `equity` is `Some` on every row or on none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodState {
    pub loan: LoanState,
    pub equity: Option<EquityState>,
}

impl PeriodState {
    pub fn period(&self) -> u32 {
        self.loan.period
    }

    /// Opening row: full principal, no interest yet
    pub(crate) fn opening(principal: f64, collateral_value: Option<f64>) -> Self {
        Self {
            loan: LoanState {
                period: 0,
                principal,
                interest: 0.0,
            },
            equity: collateral_value.map(|value| EquityState {
                period: 0,
                collateral_value: value,
                equity: value - principal,
            }),
        }
    }

    /// Roll forward one payment
    pub(crate) fn advance(&self, payment: f64, escrow: f64, interest_rate: f64, growth_rate: f64) -> Self {
        let interest = self.loan.principal * interest_rate;
        let loan = LoanState {
            period: self.loan.period + 1,
            principal: self.loan.principal - (payment - interest - escrow),
            interest,
        };
        let equity = self.equity.map(|prev| {
            let collateral_value = prev.collateral_value * (1.0 + growth_rate);
            EquityState {
                period: loan.period,
                collateral_value,
                equity: collateral_value - loan.principal,
            }
        });
        Self { loan, equity }
    }

    /// Absorb the final payment's overshoot
    pub(crate) fn close_out(&mut self) {
        self.loan.principal = 0.0;
        if let Some(equity) = self.equity.as_mut() {
            equity.equity = equity.collateral_value;
        }
    }
}
