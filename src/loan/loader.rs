//! Load loan parameters from JSON and scenario batches from CSV

use super::params::{Collateral, LoanParameters, RateFrequency};
use crate::error::LoanResult;
use crate::scenario::Scenario;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load a single parameter set from a JSON file
pub fn load_parameters<P: AsRef<Path>>(path: P) -> LoanResult<LoanParameters> {
    let file = File::open(path)?;
    load_parameters_from_reader(BufReader::new(file))
}

/// Load a single parameter set from any JSON reader
pub fn load_parameters_from_reader<R: Read>(reader: R) -> LoanResult<LoanParameters> {
    Ok(serde_json::from_reader(reader)?)
}

/// Raw CSV row, one scenario per line
///
/// Leave `payment` or `periods` blank to have it solved.
/// Leave `collateral_value` blank to skip equity tracking.
#[derive(Debug, Deserialize)]
struct ScenarioRecord {
    name: String,
    principal: f64,
    interest_rate: f64,
    #[serde(default)]
    frequency: RateFrequency,
    periods: Option<u32>,
    payment: Option<f64>,
    escrow: f64,
    collateral_value: Option<f64>,
    growth_rate: Option<f64>,
}

impl From<ScenarioRecord> for Scenario {
    fn from(record: ScenarioRecord) -> Self {
        let collateral = record.collateral_value.map(|value| Collateral {
            value,
            annual_growth_rate: record.growth_rate.unwrap_or(0.0),
        });
        Scenario {
            name: record.name,
            params: LoanParameters {
                principal: record.principal,
                interest_rate: record.interest_rate,
                frequency: record.frequency,
                periods: record.periods.unwrap_or(0),
                payment: record.payment.unwrap_or(0.0),
                escrow: record.escrow,
                collateral,
            },
        }
    }
}

/// Load scenarios from a CSV file with a header row
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> LoanResult<Vec<Scenario>> {
    let file = File::open(path)?;
    load_scenarios_from_reader(BufReader::new(file))
}

/// Load scenarios from any CSV reader with a header row
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> LoanResult<Vec<Scenario>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut scenarios = Vec::new();
    for result in csv_reader.deserialize::<ScenarioRecord>() {
        scenarios.push(result?.into());
    }
    Ok(scenarios)
}
