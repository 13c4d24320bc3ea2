//! Artifact-level classifier wrapper.

use crate::error::{ArtifactError, ModelError};
use crate::model::{
    Fitted, InferenceModel, LinearClassifier, ProbabilityProvider, SerializableLinearParams,
};
use crate::text::SparseMatrix;
use serde::{Deserialize, Serialize};

/// Serializable state of any classifier the service can load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClassifierParams {
    Linear(SerializableLinearParams),
    /// Always predicts `label`. Produced when training data holds one class.
    Constant { label: i64, n_features: usize },
}

#[derive(Clone, Debug)]
enum Inner {
    Linear(LinearClassifier<Fitted>),
    Constant { label: i64, n_features: usize },
}

/// A fitted binary classifier together with its scoring capability.
#[derive(Clone, Debug)]
pub struct FittedClassifier {
    inner: Inner,
    provider: ProbabilityProvider,
}

impl FittedClassifier {
    pub fn constant(label: i64, n_features: usize) -> Self {
        Self {
            inner: Inner::Constant { label, n_features },
            provider: ProbabilityProvider::LabelOnly,
        }
    }

    pub fn probability_provider(&self) -> ProbabilityProvider {
        self.provider
    }

    /// Width of the feature space the classifier was trained on.
    pub fn n_features_in(&self) -> usize {
        match &self.inner {
            Inner::Linear(m) => m.n_features(),
            Inner::Constant { n_features, .. } => *n_features,
        }
    }

    fn check_width(&self, x: &SparseMatrix) -> Result<(), ModelError> {
        let expected = self.n_features_in();
        if x.n_cols() != expected {
            return Err(ModelError::FeatureMismatch {
                expected,
                got: x.n_cols(),
            });
        }
        Ok(())
    }

    pub fn predict(&self, x: &SparseMatrix) -> Result<Vec<i64>, ModelError> {
        match &self.inner {
            Inner::Linear(m) => m.predict(x),
            Inner::Constant { label, .. } => {
                self.check_width(x)?;
                Ok(vec![*label; x.n_rows()])
            }
        }
    }

    /// Positive-class probability per row.
    pub fn predict_proba(&self, x: &SparseMatrix) -> Result<Vec<f64>, ModelError> {
        match &self.inner {
            Inner::Linear(m) => Ok(m.predict_proba(x)?.into_iter().map(|p| p[1]).collect()),
            Inner::Constant { .. } => Err(ModelError::NotSupported("predict_proba")),
        }
    }

    pub fn decision_function(&self, x: &SparseMatrix) -> Result<Vec<f64>, ModelError> {
        match &self.inner {
            Inner::Linear(m) => m.decision_function(x),
            Inner::Constant { .. } => Err(ModelError::NotSupported("decision_function")),
        }
    }

    pub fn extract_params(&self) -> ClassifierParams {
        match &self.inner {
            Inner::Linear(m) => ClassifierParams::Linear(m.extract_params()),
            Inner::Constant { label, n_features } => ClassifierParams::Constant {
                label: *label,
                n_features: *n_features,
            },
        }
    }

    pub fn from_params(params: ClassifierParams) -> Result<Self, ArtifactError> {
        match params {
            ClassifierParams::Linear(p) => Ok(LinearClassifier::<Fitted>::from_params(p)?.into()),
            ClassifierParams::Constant { label, n_features } => {
                if label != 0 && label != 1 {
                    return Err(ArtifactError::UnsupportedFormat(format!(
                        "constant classifier label {} is not binary",
                        label
                    )));
                }
                if n_features == 0 {
                    return Err(ArtifactError::NotFitted(
                        "constant classifier has an empty feature space".to_string(),
                    ));
                }
                Ok(Self::constant(label, n_features))
            }
        }
    }
}

impl From<LinearClassifier<Fitted>> for FittedClassifier {
    fn from(model: LinearClassifier<Fitted>) -> Self {
        Self {
            provider: model.link().probability_provider(),
            inner: Inner::Linear(model),
        }
    }
}
