//! Projection engine for loan amortization and collateral equity

mod state;
mod schedule;
mod engine;
mod cashflows;

pub use state::{LoanState, EquityState, PeriodState};
pub use schedule::Schedule;
pub use engine::{ProjectionEngine, ProjectionConfig, ProjectionResult, SimulationOutcome};
pub use cashflows::{ScheduleRow, ScheduleSummary, write_schedule_csv};

// ============================================================================
// Termination
// ============================================================================
// A schedule stops when the balance reaches zero, when the balance grows past
// the amount borrowed, or when it reaches MAX_PERIODS rows. The cap is the
// only bound on inputs whose payment barely exceeds the interest.

/// Hard cap on schedule rows, opening balance included
pub const MAX_PERIODS: usize = 1000;
