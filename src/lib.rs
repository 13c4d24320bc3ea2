//! Spam/ham text classification: an offline training utility and an HTTP
//! inference service sharing one artifact format.
//!
//! Training ([`training::run`]) fits a TF-IDF vectorizer ([`text`]) and a
//! linear classifier ([`model`]) and writes three [`artifact`] files: the
//! vectorizer, the classifier and a [`pipeline`] wrapping both. The service
//! resolves those files once at startup ([`inference::resolve`]) and serves
//! predictions over HTTP ([`server`]).

pub mod artifact;
pub mod config;
pub mod error;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod serialization;
pub mod server;
pub mod telemetry;
pub mod text;
pub mod training;

pub use error::{ArtifactError, DatasetError, InferenceError, ModelError, TrainingError};
pub use inference::{InferenceMode, ModelState, Prediction};
pub use model::{Fitted, Unfitted};
pub use pipeline::SpamPipeline;
