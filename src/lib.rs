//! Loan Helper - amortization and equity projection for fixed-rate loans
//!
//! This library provides:
//! - Period rate normalization for annual or monthly nominal rates
//! - Closed-form payment and term solvers
//! - Period-by-period amortization with divergence and runaway guards
//! - Collateral appreciation and owner equity tracking
//! - CSV/JSON loading and schedule export

pub mod error;
pub mod loan;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoanError, LoanResult};
pub use loan::{Loan, LoanParameters, RateFrequency};
pub use projection::{EquityState, LoanState, PeriodState, ProjectionEngine, Schedule, SimulationOutcome};
pub use scenario::{Scenario, ScenarioRunner};
