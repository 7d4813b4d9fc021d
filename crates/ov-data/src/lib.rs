//! Olympic data ingestion and aggregation
//!
//! Builds read-only per-country aggregates from four header-keyed tables
//! (alias/team, land-area stats, population, participation/medals). No
//! row-level error ever aborts ingestion: anomalies are logged and the
//! offending value or row is skipped or coerced, so the system always
//! produces a (possibly empty) dataset.

pub mod ingest;
pub mod model;
pub mod schema;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use ingest::{DataIngestion, OlympicsDataset};
pub use model::{AthleteRecord, CountryAggregate, Medal};
pub use schema::{Row, Table};
pub use sources::CsvTableSource;

/// Errors that can occur loading source tables.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
