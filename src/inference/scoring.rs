//! Uniform label + probability scoring over models with different
//! capabilities.
//!
//! The probability policy, applied identically to a pipeline (raw texts) and
//! to a standalone classifier (vectorized rows):
//! - [`ProbabilityProvider::HasProbability`]: positive-class probability.
//! - [`ProbabilityProvider::HasDecisionMargin`]: margins min-max scaled to
//!   `[0, 1]` over the batch; a batch of equal margins scores 0 everywhere.
//! - [`ProbabilityProvider::LabelOnly`]: 0 everywhere.

use crate::error::ModelError;
use crate::model::{FittedClassifier, ProbabilityProvider};
use crate::pipeline::SpamPipeline;
use crate::text::SparseMatrix;

/// A fitted model the service can score a batch with.
pub trait ScoringModel {
    type Input: ?Sized;

    /// Capability recorded when the model was built.
    fn provider(&self) -> ProbabilityProvider;

    fn labels(&self, input: &Self::Input) -> Result<Vec<i64>, ModelError>;

    fn positive_proba(&self, input: &Self::Input) -> Result<Vec<f64>, ModelError>;

    fn margins(&self, input: &Self::Input) -> Result<Vec<f64>, ModelError>;
}

impl ScoringModel for FittedClassifier {
    type Input = SparseMatrix;

    fn provider(&self) -> ProbabilityProvider {
        self.probability_provider()
    }

    fn labels(&self, x: &SparseMatrix) -> Result<Vec<i64>, ModelError> {
        self.predict(x)
    }

    fn positive_proba(&self, x: &SparseMatrix) -> Result<Vec<f64>, ModelError> {
        self.predict_proba(x)
    }

    fn margins(&self, x: &SparseMatrix) -> Result<Vec<f64>, ModelError> {
        self.decision_function(x)
    }
}

impl ScoringModel for SpamPipeline {
    type Input = [String];

    fn provider(&self) -> ProbabilityProvider {
        self.probability_provider()
    }

    fn labels(&self, texts: &[String]) -> Result<Vec<i64>, ModelError> {
        self.predict(texts)
    }

    fn positive_proba(&self, texts: &[String]) -> Result<Vec<f64>, ModelError> {
        self.predict_proba(texts)
    }

    fn margins(&self, texts: &[String]) -> Result<Vec<f64>, ModelError> {
        self.decision_function(texts)
    }
}

/// Labels and positive-class probabilities, one per input row.
#[derive(Clone, Debug, PartialEq)]
pub struct Scores {
    pub labels: Vec<i64>,
    pub probabilities: Vec<f64>,
}

pub fn score<M: ScoringModel + ?Sized>(model: &M, input: &M::Input) -> Result<Scores, ModelError> {
    let labels = model.labels(input)?;
    let probabilities = match model.provider() {
        ProbabilityProvider::HasProbability => model.positive_proba(input)?,
        ProbabilityProvider::HasDecisionMargin => min_max_normalize(&model.margins(input)?),
        ProbabilityProvider::LabelOnly => vec![0.0; labels.len()],
    };
    Ok(Scores {
        labels,
        probabilities,
    })
}

/// Scales values linearly onto `[0, 1]`; a constant input maps to all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Rounds a probability to 4 decimals, clamped to `[0, 1]`.
pub fn round4(p: f64) -> f64 {
    if p.is_nan() {
        return 0.0;
    }
    (p.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fitted, LinearClassifier, LinearParams, Link};
    use crate::text::SparseRow;

    fn x() -> SparseMatrix {
        SparseMatrix::new(
            vec![
                SparseRow::from_pairs(vec![(0, 1.0)]),
                SparseRow::from_pairs(vec![(1, 1.0)]),
                SparseRow::default(),
            ],
            2,
        )
        .unwrap()
    }

    fn linear(link: Link, weights: Vec<f64>) -> FittedClassifier {
        LinearClassifier::<Fitted>::new(LinearParams { weights, bias: 0.0 }, link).into()
    }

    #[test]
    fn test_probability_provider_uses_positive_class() {
        let scores = score(&linear(Link::Logistic, vec![2.0, -2.0]), &x()).unwrap();
        assert_eq!(scores.labels, vec![1, 0, 0]);
        assert!((scores.probabilities[0] - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
        assert!((scores.probabilities[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_margin_provider_is_min_max_scaled() {
        // margins [4, -2, 0] -> [1, 0, 1/3]
        let scores = score(&linear(Link::Margin, vec![4.0, -2.0]), &x()).unwrap();
        assert_eq!(scores.labels, vec![1, 0, 0]);
        assert_eq!(scores.probabilities[0], 1.0);
        assert_eq!(scores.probabilities[1], 0.0);
        assert!((scores.probabilities[2] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_equal_margins_score_zero() {
        let scores = score(&linear(Link::Margin, vec![0.0, 0.0]), &x()).unwrap();
        assert_eq!(scores.probabilities, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_label_only_scores_zero() {
        let scores = score(&FittedClassifier::constant(1, 2), &x()).unwrap();
        assert_eq!(scores.labels, vec![1, 1, 1]);
        assert_eq!(scores.probabilities, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_model_faults_propagate() {
        let wide = linear(Link::Logistic, vec![1.0, 1.0, 1.0]);
        assert!(matches!(
            score(&wide, &x()),
            Err(ModelError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_min_max_normalize_edge_cases() {
        assert!(min_max_normalize(&[]).is_empty());
        assert_eq!(min_max_normalize(&[3.5]), vec![0.0]);
        assert_eq!(min_max_normalize(&[-1.0, 1.0]), vec![0.0, 1.0]);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(0.99999), 1.0);
        assert_eq!(round4(1.5), 1.0);
        assert_eq!(round4(-0.2), 0.0);
        assert_eq!(round4(f64::NAN), 0.0);
    }
}
