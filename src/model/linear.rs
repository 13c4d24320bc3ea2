//! Linear binary classifiers over sparse features.
//!
//! One model type covers both linear classifiers the training utility can
//! produce; they differ only in how the raw score `w^T x + b` is read:
//! - [`Link::Logistic`]: logistic regression; the score is a logit and
//!   `sigmoid(score)` is the positive-class probability.
//! - [`Link::Margin`]: linear SVM; the score is an uncalibrated margin.
//!
//! In both cases the predicted label is `1` iff the score is positive.

use crate::error::{ArtifactError, ModelError};
use crate::model::{Fitted, InferenceModel, ParamOps, ProbabilityProvider, TrainableModel, Unfitted};
use crate::text::SparseMatrix;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// How the raw linear score is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Link {
    Logistic,
    Margin,
}

impl Link {
    pub fn probability_provider(self) -> ProbabilityProvider {
        match self {
            Link::Logistic => ProbabilityProvider::HasProbability,
            Link::Margin => ProbabilityProvider::HasDecisionMargin,
        }
    }
}

/// Trainable parameters of a linear model: weights and bias.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearParams {
    pub fn zeros(n_features: usize) -> Self {
        Self {
            weights: vec![0.0; n_features],
            bias: 0.0,
        }
    }
}

impl ParamOps for LinearParams {
    fn add(&self, other: &Self) -> Self {
        let weights = self
            .weights
            .iter()
            .zip(&other.weights)
            .map(|(a, b)| a + b)
            .collect();
        Self {
            weights,
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: f64) -> Self {
        Self {
            weights: self.weights.iter().map(|w| w * scalar).collect(),
            bias: self.bias * scalar,
        }
    }
}

/// Serializable representation of a fitted linear classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub link: Link,
}

/// A linear classifier with its training state encoded at the type level.
#[derive(Clone, Debug)]
pub struct LinearClassifier<S> {
    params: LinearParams,
    link: Link,
    _state: PhantomData<S>,
}

impl<S> LinearClassifier<S> {
    pub fn link(&self) -> Link {
        self.link
    }

    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

impl LinearClassifier<Unfitted> {
    /// Zero-initialized logistic regression over `n_features` inputs.
    pub fn logistic(n_features: usize) -> Self {
        Self::from_params(LinearParams::zeros(n_features), Link::Logistic)
    }

    /// Zero-initialized linear SVM over `n_features` inputs.
    pub fn svm(n_features: usize) -> Self {
        Self::from_params(LinearParams::zeros(n_features), Link::Margin)
    }

    /// Constructs a model from explicit parameters (warm start, tests).
    pub fn from_params(params: LinearParams, link: Link) -> Self {
        Self {
            params,
            link,
            _state: PhantomData,
        }
    }
}

impl TrainableModel for LinearClassifier<Unfitted> {
    type Input = SparseMatrix;
    type Prediction = Vec<f64>;
    type Params = LinearParams;
    type Gradients = LinearParams;
    type Output = LinearClassifier<Fitted>;

    fn forward(&self, x: &SparseMatrix) -> Result<Vec<f64>, ModelError> {
        let mut scores = x.dot(&self.params.weights)?;
        for s in &mut scores {
            *s += self.params.bias;
        }
        Ok(scores)
    }

    fn backward(&self, x: &SparseMatrix, grad_output: &Vec<f64>) -> LinearParams {
        LinearParams {
            weights: x.tdot(grad_output),
            bias: grad_output.iter().sum(),
        }
    }

    fn params(&self) -> &LinearParams {
        &self.params
    }

    fn update_params(&mut self, params: &LinearParams) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearClassifier<Fitted> {
        LinearClassifier::<Fitted>::new(self.params, self.link)
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LinearClassifier<Fitted> {
    pub fn new(params: LinearParams, link: Link) -> Self {
        Self {
            params,
            link,
            _state: PhantomData,
        }
    }

    /// Raw scores `X @ w + b`.
    pub fn decision_function(&self, x: &SparseMatrix) -> Result<Vec<f64>, ModelError> {
        let mut scores = x.dot(&self.params.weights)?;
        for s in &mut scores {
            *s += self.params.bias;
        }
        Ok(scores)
    }

    pub fn predict(&self, x: &SparseMatrix) -> Result<Vec<i64>, ModelError> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|s| i64::from(s > 0.0))
            .collect())
    }

    /// `[P(label=0), P(label=1)]` per row. Only logistic models are calibrated.
    pub fn predict_proba(&self, x: &SparseMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        if self.link != Link::Logistic {
            return Err(ModelError::NotSupported("predict_proba"));
        }
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|z| {
                let p = sigmoid(z);
                [1.0 - p, p]
            })
            .collect())
    }
}

impl InferenceModel for LinearClassifier<Fitted> {
    type ParamsRepr = SerializableLinearParams;

    fn extract_params(&self) -> SerializableLinearParams {
        SerializableLinearParams {
            weights: self.params.weights.clone(),
            bias: self.params.bias,
            link: self.link,
        }
    }

    fn from_params(params: SerializableLinearParams) -> Result<Self, ArtifactError> {
        if params.weights.is_empty() {
            return Err(ArtifactError::NotFitted(
                "linear classifier has no weights".to_string(),
            ));
        }
        if !params.bias.is_finite() || params.weights.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::UnsupportedFormat(
                "linear classifier has non-finite parameters".to_string(),
            ));
        }
        Ok(Self::new(
            LinearParams {
                weights: params.weights,
                bias: params.bias,
            },
            params.link,
        ))
    }
}
