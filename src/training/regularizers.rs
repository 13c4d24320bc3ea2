use crate::model::{LinearClassifier, LinearParams, TrainableModel, Unfitted};

/// Parameter penalty added to the training loss.
pub trait Regularizer<M: TrainableModel> {
    /// Returns the penalty value and its gradient w.r.t. the model params.
    fn regularizer_penalty_grad(&self, model: &M) -> (f64, M::Gradients);
}

/// Ridge penalty `λ·‖w‖²`. The bias is not penalized.
#[derive(Clone, Copy, Debug)]
pub struct L2 {
    lambda: f64,
}

impl L2 {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl Regularizer<LinearClassifier<Unfitted>> for L2 {
    fn regularizer_penalty_grad(&self, model: &LinearClassifier<Unfitted>) -> (f64, LinearParams) {
        let weights = &model.params().weights;
        let penalty = self.lambda * weights.iter().map(|w| w * w).sum::<f64>();
        let grad = LinearParams {
            weights: weights.iter().map(|w| 2.0 * self.lambda * w).collect(),
            bias: 0.0,
        };
        (penalty, grad)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoRegularizer;

impl Regularizer<LinearClassifier<Unfitted>> for NoRegularizer {
    fn regularizer_penalty_grad(&self, model: &LinearClassifier<Unfitted>) -> (f64, LinearParams) {
        (0.0, LinearParams::zeros(model.n_features()))
    }
}
