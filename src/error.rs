//! Error types for propval.
//!
//! Each stage of the prediction path has its own error type so callers can
//! tell a broken deployment (artifact or dataset) apart from a bad request
//! (feature values) and from a model fault (inference).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for prediction operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The model artifact could not be loaded.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported artifact format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Incompatible artifact version {found} (supported: {supported})")]
    IncompatibleVersion { found: u64, supported: u64 },

    #[error("Artifact columns {found:?} do not match expected {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// The reference dataset could not be loaded.
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("Failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset has no {0:?} column")]
    MissingColumn(String),

    #[error("Dataset contains no {0:?} values")]
    NoValues(String),
}

/// A feature record was rejected before inference.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidFeatureError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("Unknown suburb: {0}")]
    UnknownSuburb(String),
}

/// The model failed to produce a prediction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Input columns {found:?} do not match model columns {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Row has {found} cells but the model expects {expected}")]
    RowWidth { expected: usize, found: usize },

    #[error("Column {column} expects a {expected} value")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("Column {0} has no value and no fill")]
    MissingValue(String),

    #[error("Model produced no output")]
    EmptyOutput,

    #[error("Model produced a non-finite value: {0}")]
    NonFinite(f64),
}

/// Any error surfaced by the prediction service.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),

    #[error(transparent)]
    DatasetLoad(#[from] DatasetLoadError),

    #[error(transparent)]
    InvalidFeature(#[from] InvalidFeatureError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the deployment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFeature(_))
    }
}
