//! Core error types for the performance engine.
//!
//! Missing market data is not an error here: it is absorbed by the calculators and
//! surfaced through `has_errors` flags on positions and snapshots. Only conditions that
//! indicate a logic defect or unusable input reach callers as `Err`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::activities::ActivityError;
use crate::fx::FxError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the performance engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Activity error: {0}")]
    Activity(#[from] ActivityError),

    #[error("Performance calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),
}

/// Errors raised while folding activities into metrics.
///
/// Every variant here is fatal for the whole snapshot computation.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("No accumulator found for symbol {symbol} on {date}")]
    MissingSymbolAccumulator { symbol: String, date: NaiveDate },

    #[error("Boundary order '{marker}' missing from order sequence of {symbol}")]
    MissingBoundaryOrder { symbol: String, marker: String },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}
