//! Core business types and abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod record;
pub mod source;

// Re-export main types for cleaner imports
pub use error::{ExtractionError, IoError, MissingRateError, QueryError, RateLoadError};
pub use record::{BankRecord, Dataset, EnrichedBankRecord};
pub use source::PageSource;
