//! Error types for bench-report

use thiserror::Error;

/// Result type alias for bench-report operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bench-report
#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate measurement for benchmark '{name}' (label '{label}') in series '{series}'")]
    DuplicateMeasurement {
        series: String,
        name: String,
        label: String,
    },

    #[error("series disagree on value direction for benchmark '{name}' (label '{label}')")]
    DirectionMismatch { name: String, label: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),
}
