use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a spreadsheet into a [`crate::data::model::Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open workbook: {0}")]
    Workbook(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("no data rows found")]
    NoData,

    #[error("missing required columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
}

/// Precondition failures of the statistics pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("column `{0}` is not a numeric measurement")]
    InvalidColumn(String),

    #[error("dataset has no usable readings")]
    EmptyDataset,

    #[error("spike window has {found} points, a cubic spline needs at least {required}")]
    InsufficientPoints { found: usize, required: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
