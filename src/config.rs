//! Command-line and environment configuration of both binaries.

use crate::inference::ArtifactPaths;
use crate::server::{BodyLimit, DEFAULT_BODY_LIMIT};
use crate::training::{ClassifierKind, TrainingOptions};
use clap::Parser;
use std::path::PathBuf;

/// Spam classifier inference service.
#[derive(Debug, Clone, Parser)]
#[clap(name = "spamserve")]
pub struct ServiceConfig {
    /// Fitted TF-IDF vectorizer artifact
    #[clap(long, env = "VECT_PATH", default_value = "models/tfidf_vectorizer.bin")]
    pub vect_path: PathBuf,

    /// Fitted classifier artifact
    #[clap(long, env = "MODEL_PATH", default_value = "models/logistic_model.bin")]
    pub model_path: PathBuf,

    /// Combined pipeline artifact; preferred when usable
    #[clap(long, env = "PIPELINE_PATH", default_value = "models/pipeline.bin")]
    pub pipeline_path: PathBuf,

    #[clap(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[clap(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Largest accepted /predict body, in bytes
    #[clap(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_BODY_LIMIT)]
    pub max_body_bytes: usize,
}

impl ServiceConfig {
    pub fn body_limit(&self) -> BodyLimit {
        BodyLimit(self.max_body_bytes)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            vectorizer: self.vect_path.clone(),
            classifier: self.model_path.clone(),
            pipeline: self.pipeline_path.clone(),
        }
    }
}

/// Fit a TF-IDF vectorizer and a linear classifier on a labeled CSV and save
/// the vectorizer, the classifier and a combined pipeline.
#[derive(Debug, Clone, Parser)]
#[clap(name = "train-and-save")]
pub struct TrainConfig {
    /// CSV with label (ham/spam) and text in its first two columns
    #[clap(long, default_value = "spam.csv")]
    pub csv_path: PathBuf,

    /// Output directory for the artifacts
    #[clap(long, default_value = "models")]
    pub outdir: PathBuf,

    #[clap(long, value_enum, default_value_t = ClassifierKind::Logistic)]
    pub classifier: ClassifierKind,

    /// Vocabulary size limit
    #[clap(long, default_value_t = 5000)]
    pub max_features: usize,

    #[clap(long, default_value_t = 30)]
    pub epochs: usize,

    /// Seed of the train/test split
    #[clap(long, default_value_t = 42)]
    pub seed: u64,

    /// Use 1 + ln(count) as the term frequency
    #[clap(long)]
    pub sublinear_tf: bool,
}

impl TrainConfig {
    pub fn options(&self) -> TrainingOptions {
        TrainingOptions::new(&self.csv_path, &self.outdir)
            .classifier(self.classifier)
            .max_features(self.max_features)
            .epochs(self.epochs)
            .seed(self.seed)
            .sublinear_tf(self.sublinear_tf)
    }
}
