//! Error types for loading, schema validation and pipeline runs.
//!
//! Row-level validation failures are not errors: they are counted in a
//! [`FilterReport`](crate::data::filter::FilterReport) and the row is skipped.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The CSV resource could not be fetched or parsed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("remote sources are not supported, download {0} first")]
    Remote(String),
    #[error("failed to read CSV header")]
    Header(#[source] csv::Error),
    #[error("CSV input has no header row")]
    NoHeader,
    #[error("malformed CSV record {record}")]
    Record {
        record: usize,
        #[source]
        source: csv::Error,
    },
}

/// The field translation table or role assignment is inconsistent.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("schema has no columns")]
    Empty,
    #[error("source column '{0}' is mapped more than once")]
    DuplicateSource(String),
    #[error("canonical field '{0}' is produced by more than one column")]
    DuplicateName(String),
    #[error("{role} field '{field}' is not defined in the schema")]
    UnknownField { role: &'static str, field: String },
    #[error("{role} field '{field}' must be parsed as a number")]
    NotNumeric { role: &'static str, field: String },
    #[error("year range is empty: {min} > {max}")]
    InvalidYearRange { min: f64, max: f64 },
    #[error("stacked layout and series targets need a series field")]
    MissingSeries,
    #[error("year bounds need a year field")]
    MissingYear,
}

/// A pipeline run ended without producing chart data.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid schema")]
    Schema(#[from] SchemaError),
    #[error("no data left to chart ({read} rows read, {kept} kept)")]
    NoData { read: usize, kept: usize },
}
