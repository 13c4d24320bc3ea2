//! Binary classifiers with compile-time training state.
//!
//! Models follow a two-state life cycle encoded in the type system:
//! `Model<Unfitted>` implements [`TrainableModel`] (forward/backward passes
//! driven by a trainer) and converts via `into_fitted` into `Model<Fitted>`,
//! which implements [`InferenceModel`] and is serializable.
//!
//! [`FittedClassifier`] is the artifact-level wrapper used by the service: it
//! erases the concrete model type and records, once, which scoring
//! capability ([`ProbabilityProvider`]) the model offers.

pub mod classifier;
pub mod linear;
pub mod state;

pub use classifier::{ClassifierParams, FittedClassifier};
pub use linear::{LinearClassifier, LinearParams, Link, SerializableLinearParams};
pub use state::{Fitted, Unfitted};

use crate::error::{ArtifactError, ModelError};

/// Training-time interface of a model.
pub trait TrainableModel {
    type Input: ?Sized;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    /// Raw model outputs (logits or margins) for a batch.
    fn forward(&self, input: &Self::Input) -> Result<Self::Prediction, ModelError>;

    /// Gradients of the loss w.r.t. parameters, given its gradient w.r.t. the outputs.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic needed by optimizers and regularizers on parameter sets.
pub trait ParamOps: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: f64) -> Self;
}

/// Inference-time interface of a trained model.
pub trait InferenceModel {
    type ParamsRepr;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self, ArtifactError>
    where
        Self: Sized;
}

/// Which scoring operation a classifier offers besides label prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbabilityProvider {
    /// Calibrated two-class probabilities.
    HasProbability,
    /// Signed distance from the decision boundary only.
    HasDecisionMargin,
    /// Neither; only labels.
    LabelOnly,
}
