use crate::model::ParamOps;

/// Trait for gradient-based optimizers.
///
/// Training logic ([`Trainer`](super::Trainer)) is decoupled from the
/// parameter update rule, so any model can be paired with any optimizer.
///
/// # Example
/// ```rust
/// use spamserve::model::LinearParams;
/// use spamserve::training::{Optimizer, SGD};
///
/// let params = LinearParams { weights: vec![1.0, 2.0], bias: 0.5 };
/// let grads = LinearParams { weights: vec![0.5, -1.0], bias: 1.0 };
/// let updated = SGD::new(0.1).step(&params, &grads);
/// assert!((updated.bias - 0.4).abs() < 1e-12);
/// ```
pub trait Optimizer<P> {
    /// Returns `params - learning_rate * gradients` without mutating inputs.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Stochastic Gradient Descent: `θ ← θ - η · ∇L(θ)`.
///
/// Stateless (no momentum).
#[derive(Clone, Copy, Debug)]
pub struct SGD {
    lr: f64,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl<P: ParamOps> Optimizer<P> for SGD {
    fn step(&self, params: &P, gradients: &P) -> P {
        params.add(&gradients.scale(-self.lr))
    }
}
