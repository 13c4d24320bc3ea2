//! Combined text classifier: a fitted vectorizer feeding a fitted classifier.

use crate::error::{ArtifactError, ModelError};
use crate::model::{ClassifierParams, FittedClassifier, ProbabilityProvider};
use crate::text::{FittedTfidfVectorizer, FittedTransformer, TfidfVectorizerParams};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    pub vectorizer: TfidfVectorizerParams,
    pub classifier: ClassifierParams,
}

/// Raw text in, labels and scores out.
///
/// The classifier's feature space always matches the vectorizer's output
/// width.
#[derive(Clone, Debug)]
pub struct SpamPipeline {
    vectorizer: FittedTfidfVectorizer,
    classifier: FittedClassifier,
}

impl SpamPipeline {
    pub fn new(
        vectorizer: FittedTfidfVectorizer,
        classifier: FittedClassifier,
    ) -> Result<Self, ModelError> {
        let expected = classifier.n_features_in();
        let got = vectorizer.n_features_out();
        if expected != got {
            return Err(ModelError::FeatureMismatch { expected, got });
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    pub fn vectorizer(&self) -> &FittedTfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &FittedClassifier {
        &self.classifier
    }

    pub fn probability_provider(&self) -> ProbabilityProvider {
        self.classifier.probability_provider()
    }

    pub fn predict(&self, texts: &[String]) -> Result<Vec<i64>, ModelError> {
        self.classifier.predict(&self.vectorizer.transform(texts)?)
    }

    /// Positive-class probability per text.
    pub fn predict_proba(&self, texts: &[String]) -> Result<Vec<f64>, ModelError> {
        self.classifier
            .predict_proba(&self.vectorizer.transform(texts)?)
    }

    pub fn decision_function(&self, texts: &[String]) -> Result<Vec<f64>, ModelError> {
        self.classifier
            .decision_function(&self.vectorizer.transform(texts)?)
    }

    pub fn extract_params(&self) -> PipelineParams {
        PipelineParams {
            vectorizer: self.vectorizer.extract_params(),
            classifier: self.classifier.extract_params(),
        }
    }

    /// Rebuilds a pipeline, refusing an unfitted vectorizer or mismatched
    /// feature spaces.
    pub fn from_params(params: PipelineParams) -> Result<Self, ArtifactError> {
        let vectorizer = FittedTfidfVectorizer::from_params(params.vectorizer)?;
        let classifier = FittedClassifier::from_params(params.classifier)?;
        Self::new(vectorizer, classifier)
            .map_err(|e| ArtifactError::UnsupportedFormat(format!("inconsistent pipeline: {}", e)))
    }
}
