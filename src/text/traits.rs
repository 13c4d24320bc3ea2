//! Core traits for text transformers.
//!
//! - [`Transformer`]: holds hyperparameters and learns from a corpus.
//! - [`FittedTransformer`]: holds learned state, transforms new text and
//!   round-trips through a serializable params struct.

use crate::error::{ArtifactError, ModelError};
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Example
/// ```
/// use spamserve::text::{FittedTransformer, TfidfVectorizer, Transformer};
///
/// let corpus = vec!["free cash now".to_string(), "see you at lunch".to_string()];
/// let fitted = TfidfVectorizer::new().fit(&corpus).unwrap();
/// let x = fitted.transform(&corpus).unwrap();
/// assert_eq!(x.n_rows(), 2);
/// ```
pub trait Transformer: Clone {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Learn parameters from the training data.
    ///
    /// # Errors
    /// Returns [`ModelError`] if the data is empty or yields no features.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, ModelError>;

    /// Fit, then transform the same data.
    fn fit_transform(
        &self,
        data: &Self::Input,
    ) -> Result<(Self::Fitted, Self::Output), ModelError> {
        let fitted = self.fit(data)?;
        let out = fitted.transform(data)?;
        Ok((fitted, out))
    }
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `from_params()` refuses params that do not describe a fitted state.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, ModelError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    ///
    /// # Errors
    /// Returns [`ArtifactError::NotFitted`] when the params describe an
    /// unfitted transformer.
    fn from_params(params: Self::Params) -> Result<Self, ArtifactError>
    where
        Self: Sized;

    /// Number of output features.
    fn n_features_out(&self) -> usize;
}
