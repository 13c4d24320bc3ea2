/// A trait for differentiable loss functions used during model training.
///
/// Implementors define:
/// - How to compute the scalar loss value (for logging).
/// - How to compute the gradient of the loss w.r.t. the model's raw outputs.
///
/// Targets are binary labels encoded as `0.0`/`1.0`. The gradient is passed
/// to the model's `backward()` method.
pub trait Loss {
    /// Mean loss over the batch.
    fn loss(&self, prediction: &[f64], target: &[f64]) -> f64;

    /// Computes `∂L/∂pred`, already divided by the batch size.
    fn grad_wrt_prediction(&self, prediction: &[f64], target: &[f64]) -> Vec<f64>;
}

/// Binary Cross-Entropy loss with logits input (numerically stable).
///
/// Computes: `L = -(t * log(σ(z)) + (1-t) * log(1 - σ(z)))`
/// using the stable formulation: `max(z,0) - z*t + log(1 + exp(-|z|))`
///
/// Gradient w.r.t. logits: `∂L/∂z = (σ(z) - t) / n`
#[derive(Clone, Copy, Debug, Default)]
pub struct BCEWithLogitsLoss;

impl Loss for BCEWithLogitsLoss {
    fn loss(&self, logits: &[f64], targets: &[f64]) -> f64 {
        if logits.is_empty() {
            return 0.0;
        }
        let total: f64 = logits
            .iter()
            .zip(targets)
            .map(|(&z, &t)| z.max(0.0) - z * t + (-z.abs()).exp().ln_1p())
            .sum();
        total / logits.len() as f64
    }

    fn grad_wrt_prediction(&self, logits: &[f64], targets: &[f64]) -> Vec<f64> {
        let n = logits.len().max(1) as f64;
        logits
            .iter()
            .zip(targets)
            .map(|(&z, &t)| (crate::model::linear::sigmoid(z) - t) / n)
            .collect()
    }
}

/// Hinge loss for margin classifiers: `L = max(0, 1 - y·z)` with `y = 2t - 1`.
///
/// Subgradient w.r.t. margins: `-y / n` where the margin is violated, else 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct HingeLoss;

fn signed(t: f64) -> f64 {
    if t > 0.5 {
        1.0
    } else {
        -1.0
    }
}

impl Loss for HingeLoss {
    fn loss(&self, margins: &[f64], targets: &[f64]) -> f64 {
        if margins.is_empty() {
            return 0.0;
        }
        let total: f64 = margins
            .iter()
            .zip(targets)
            .map(|(&z, &t)| (1.0 - signed(t) * z).max(0.0))
            .sum();
        total / margins.len() as f64
    }

    fn grad_wrt_prediction(&self, margins: &[f64], targets: &[f64]) -> Vec<f64> {
        let n = margins.len().max(1) as f64;
        margins
            .iter()
            .zip(targets)
            .map(|(&z, &t)| {
                let y = signed(t);
                if y * z < 1.0 {
                    -y / n
                } else {
                    0.0
                }
            })
            .collect()
    }
}
