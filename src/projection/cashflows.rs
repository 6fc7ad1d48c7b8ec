//! Flat schedule rows and summary figures for export

use super::engine::SimulationOutcome;
use super::schedule::Schedule;
use crate::error::LoanResult;
use crate::loan::LoanParameters;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One exported schedule line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub principal: f64,
    pub interest: f64,
    /// Blank when the loan has no collateral
    pub collateral_value: Option<f64>,
    pub equity: Option<f64>,
}

impl ScheduleRow {
    pub fn rows(schedule: &Schedule) -> impl Iterator<Item = ScheduleRow> + '_ {
        schedule.periods().iter().map(|p| ScheduleRow {
            period: p.loan.period,
            principal: p.loan.principal,
            interest: p.loan.interest,
            collateral_value: p.equity.map(|e| e.collateral_value),
            equity: p.equity.map(|e| e.equity),
        })
    }
}

/// Totals over a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub outcome: SimulationOutcome,
    pub payments: u32,
    pub payment: f64,
    pub total_interest: f64,
    pub total_escrow: f64,
    /// Principal retired plus interest plus escrow; the last payment is only
    /// what was needed to close the loan
    pub total_paid: f64,
    pub final_principal: f64,
    pub final_equity: Option<f64>,
}

impl ScheduleSummary {
    pub fn from_schedule(params: &LoanParameters, outcome: SimulationOutcome, schedule: &Schedule) -> Self {
        let payments = schedule.payment_count();
        let total_interest = schedule.total_interest_paid();
        let total_escrow = params.escrow * f64::from(payments);

        let opening_principal = schedule.opening().map(|p| p.loan.principal).unwrap_or(0.0);
        let final_principal = schedule.last().map(|p| p.loan.principal).unwrap_or(0.0);
        let retired = opening_principal - final_principal;

        Self {
            outcome,
            payments,
            payment: params.payment,
            total_interest,
            total_escrow,
            total_paid: retired + total_interest + total_escrow,
            final_principal,
            final_equity: schedule.last().and_then(|p| p.equity).map(|e| e.equity),
        }
    }
}

/// Write the schedule as CSV with a header row
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, writer: W) -> LoanResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in ScheduleRow::rows(schedule) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
