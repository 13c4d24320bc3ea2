//! Error types shared by the training utility and the inference service.

use std::io;

/// Errors raised while reading or writing serialized artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Unsupported artifact format: {0}")]
    UnsupportedFormat(String),

    #[error("Artifact is not fitted: {0}")]
    NotFitted(String),
}

/// Errors raised by fitted components at transform/predict time.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Feature mismatch: expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Operation not supported by this model: {0}")]
    NotSupported(&'static str),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not fitted: {0}")]
    NotFitted(String),
}

/// Errors raised while loading a labeled dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),
}

/// Fatal errors of an offline training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("output directory {0} is locked by another training run")]
    OutputLocked(String),
}

/// Per-request failures of the inference service.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The selected mode lacks artifacts it needs; the message names them.
    #[error("{0}")]
    MissingArtifacts(String),

    #[error("Inference failed: {0}")]
    Model(#[from] ModelError),
}
