//! Error types for each pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn the source markup into bank records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("No table body found in the source markup")]
    NoTable,

    #[error("Row {row} is malformed: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Row {row} has an invalid {field} value: '{value}'")]
    BadNumber {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

/// Failure to load the exchange rate table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateLoadError {
    #[error("Unable to read exchange rates from {origin}: {reason}")]
    Unreadable { origin: String, reason: String },

    #[error("Currency {code} appears twice with conflicting rates ({first} and {second})")]
    DuplicateCode {
        code: String,
        first: f64,
        second: f64,
    },
}

/// A currency required by the conversion is absent from the rate table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Exchange rate for {code} is missing")]
pub struct MissingRateError {
    pub code: String,
}

/// Failure writing to a sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to write {}: {cause}", .path.display())]
pub struct IoError {
    pub path: PathBuf,
    pub cause: String,
}

impl IoError {
    pub fn new(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        Self {
            path: path.into(),
            cause: cause.to_string(),
        }
    }
}

/// Failure running a read-only query against the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid query: {0}")]
    Syntax(String),

    #[error("Database connection is closed")]
    ConnectionClosed,

    #[error("Query is not read-only: {0}")]
    NotReadOnly(String),

    #[error("Query failed: {0}")]
    Execution(String),
}
