//! Loan input parameters
//!
//! Parameters are plain data populated by a form, a JSON file or a CSV row.
//! Nothing here is derived; see [`super::rate`] for the period-rate conversions.

use crate::error::{LoanError, LoanResult};
use serde::{Deserialize, Serialize};

/// How the nominal interest rate is quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateFrequency {
    /// Nominal annual rate, divided by 12 for each monthly period
    #[default]
    Annual,
    /// Rate already quoted per monthly period
    Monthly,
}

/// Appreciating asset securing the loan (e.g. the house under a mortgage)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Collateral {
    /// Asset value at period 0
    pub value: f64,

    /// Annual appreciation in percent (3.0 = 3% per year)
    #[serde(default)]
    pub annual_growth_rate: f64,
}

/// Inputs for a single fixed-rate loan
///
/// Either `payment` or `periods` may be left at 0 and solved for from the other.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanParameters {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal interest rate in percent (6.0 = 6%)
    pub interest_rate: f64,

    /// Whether `interest_rate` is annual or monthly
    pub frequency: RateFrequency,

    /// Number of monthly payments
    pub periods: u32,

    /// Total monthly payment, escrow included
    pub payment: f64,

    /// Portion of each payment held for taxes and insurance
    pub escrow: f64,

    /// Optional collateral for equity tracking
    pub collateral: Option<Collateral>,
}

impl LoanParameters {
    /// Check inputs needed to solve for the payment amount
    pub fn validate_for_payment(&self) -> LoanResult<()> {
        require_positive("principal", self.principal)?;
        if self.periods == 0 {
            return Err(LoanError::invalid("periods", "must be greater than zero"));
        }
        require_non_negative("interest_rate", self.interest_rate)
    }

    /// Check inputs needed to solve for the number of periods
    pub fn validate_for_periods(&self) -> LoanResult<()> {
        require_positive("principal", self.principal)?;
        require_positive("payment", self.payment)?;
        require_non_negative("interest_rate", self.interest_rate)
    }

    /// Check inputs needed to run the amortization and equity simulation
    ///
    /// Escrow must be strictly positive; a zero-escrow loan is rejected.
    pub fn validate_for_simulation(&self) -> LoanResult<()> {
        require_positive("principal", self.principal)?;
        require_positive("payment", self.payment)?;
        require_non_negative("interest_rate", self.interest_rate)?;
        require_positive("escrow", self.escrow)?;
        if let Some(collateral) = &self.collateral {
            require_non_negative("collateral.value", collateral.value)?;
            require_non_negative("collateral.annual_growth_rate", collateral.annual_growth_rate)?;
        }
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f64) -> LoanResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LoanError::invalid(field, format!("must be a positive number, got {value}")));
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> LoanResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LoanError::invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mortgage() -> LoanParameters {
        LoanParameters {
            principal: 200_000.0,
            interest_rate: 6.0,
            frequency: RateFrequency::Annual,
            periods: 360,
            payment: 1_500.0,
            escrow: 300.0,
            collateral: None,
        }
    }

    #[test]
    fn test_valid_mortgage_passes_all_checks() {
        let params = mortgage();
        assert!(params.validate_for_payment().is_ok());
        assert!(params.validate_for_periods().is_ok());
        assert!(params.validate_for_simulation().is_ok());
    }

    #[test]
    fn test_zero_escrow_rejected_for_simulation_only() {
        let params = LoanParameters { escrow: 0.0, ..mortgage() };
        assert!(params.validate_for_payment().is_ok());
        match params.validate_for_simulation() {
            Err(LoanError::InvalidInput { field, .. }) => assert_eq!(field, "escrow"),
            other => panic!("expected escrow rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rate_and_nan_principal_rejected() {
        let params = LoanParameters { interest_rate: -1.0, ..mortgage() };
        assert!(params.validate_for_periods().is_err());

        let params = LoanParameters { principal: f64::NAN, ..mortgage() };
        assert!(params.validate_for_payment().is_err());
    }

    #[test]
    fn test_negative_growth_rejected() {
        let params = LoanParameters {
            collateral: Some(Collateral { value: 300_000.0, annual_growth_rate: -2.0 }),
            ..mortgage()
        };
        assert!(params.validate_for_simulation().is_err());
    }

    #[test]
    fn test_json_defaults() {
        let params: LoanParameters =
            serde_json::from_str(r#"{"principal": 1000.0, "frequency": "monthly"}"#).unwrap();
        assert_eq!(params.principal, 1000.0);
        assert_eq!(params.frequency, RateFrequency::Monthly);
        assert_eq!(params.periods, 0);
        assert!(params.collateral.is_none());
    }
}
