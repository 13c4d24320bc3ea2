use crate::error::InferenceError;
use crate::inference::scoring::{round4, score, Scores};
use crate::inference::Prediction;
use crate::model::FittedClassifier;
use crate::pipeline::SpamPipeline;
use crate::text::{FittedTfidfVectorizer, FittedTransformer};
use serde::Serialize;

/// How predictions are computed; fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InferenceMode {
    UsingCombinedPipeline,
    UsingSeparateComponents,
}

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub using_pipeline: bool,
    pub vectorizer_loaded: bool,
    pub model_loaded: bool,
    pub pipeline_loaded: bool,
}

/// Models resolved at startup. Never mutated afterwards.
///
/// Component mode may hold zero, one or both components; predictions then
/// fail with a message naming what is missing.
#[derive(Clone, Debug)]
pub struct ModelState {
    mode: InferenceMode,
    pipeline: Option<SpamPipeline>,
    vectorizer: Option<FittedTfidfVectorizer>,
    classifier: Option<FittedClassifier>,
}

const REMEDY: &str = "Run train-and-save to fit and save the artifacts, \
or point VECT_PATH, MODEL_PATH and PIPELINE_PATH at existing files.";

impl ModelState {
    pub fn with_pipeline(pipeline: SpamPipeline) -> Self {
        Self {
            mode: InferenceMode::UsingCombinedPipeline,
            pipeline: Some(pipeline),
            vectorizer: None,
            classifier: None,
        }
    }

    pub fn with_components(
        vectorizer: Option<FittedTfidfVectorizer>,
        classifier: Option<FittedClassifier>,
    ) -> Self {
        Self {
            mode: InferenceMode::UsingSeparateComponents,
            pipeline: None,
            vectorizer,
            classifier,
        }
    }

    /// Component mode with nothing loaded.
    pub fn empty() -> Self {
        Self::with_components(None, None)
    }

    pub fn mode(&self) -> InferenceMode {
        self.mode
    }

    pub fn health(&self) -> Health {
        let using_pipeline = self.mode == InferenceMode::UsingCombinedPipeline;
        let pipeline_loaded = self.pipeline.is_some();
        Health {
            status: "ok",
            using_pipeline,
            vectorizer_loaded: self.vectorizer.is_some() || (using_pipeline && pipeline_loaded),
            model_loaded: self.classifier.is_some() || (using_pipeline && pipeline_loaded),
            pipeline_loaded,
        }
    }

    /// Fails when the selected mode lacks an artifact it needs.
    pub fn ensure_ready(&self) -> Result<(), InferenceError> {
        match self.mode {
            InferenceMode::UsingCombinedPipeline if self.pipeline.is_none() => {
                Err(InferenceError::MissingArtifacts(format!(
                    "Pipeline expected but not loaded. {}",
                    REMEDY
                )))
            }
            InferenceMode::UsingCombinedPipeline => Ok(()),
            InferenceMode::UsingSeparateComponents => {
                let mut missing = Vec::new();
                if self.vectorizer.is_none() {
                    missing.push("vectorizer (VECT_PATH)");
                }
                if self.classifier.is_none() {
                    missing.push("model (MODEL_PATH)");
                }
                if missing.is_empty() {
                    return Ok(());
                }
                Err(InferenceError::MissingArtifacts(format!(
                    "Required artifacts not loaded: {}. The files are missing, unreadable, \
                     or the vectorizer was saved before it was fitted. {}",
                    missing.join(", "),
                    REMEDY
                )))
            }
        }
    }

    fn scores(&self, texts: &[String]) -> Result<Scores, InferenceError> {
        match (&self.pipeline, &self.vectorizer, &self.classifier) {
            (Some(pipeline), _, _) if self.mode == InferenceMode::UsingCombinedPipeline => {
                Ok(score(pipeline, texts)?)
            }
            (_, Some(vectorizer), Some(classifier))
                if self.mode == InferenceMode::UsingSeparateComponents =>
            {
                let x = vectorizer.transform(texts)?;
                Ok(score(classifier, &x)?)
            }
            _ => {
                self.ensure_ready()?;
                Err(InferenceError::MissingArtifacts(REMEDY.to_string()))
            }
        }
    }

    /// One prediction per text, in input order.
    pub fn predict(&self, texts: &[String]) -> Result<Vec<Prediction>, InferenceError> {
        let Scores {
            labels,
            probabilities,
        } = self.scores(texts)?;
        Ok(texts
            .iter()
            .zip(labels)
            .zip(probabilities)
            .map(|((text, label), p)| Prediction::new(text.clone(), label, round4(p)))
            .collect())
    }
}
