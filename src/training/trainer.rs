use crate::error::ModelError;
use crate::model::{ParamOps, TrainableModel};
use crate::text::SparseMatrix;
use crate::training::dataset::Dataset;
use crate::training::loss::Loss;
use crate::training::optimizer::Optimizer;
use crate::training::regularizers::Regularizer;
use std::marker::PhantomData;
use tracing::debug;

/// Mini-batch gradient descent driver. Immutable once built.
pub struct Trainer<L, O, M, R> {
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    pub(crate) regularizer: R,
    _phantom_model: PhantomData<M>,
}

pub struct TrainerBuilder<L, O, M, R> {
    batch_size: usize,
    max_epochs: usize,
    verbose: bool,
    loss_fn: L,
    optimizer: O,
    regularizer: R,
    _phantom_model: PhantomData<M>,
}

impl<L, O, M, R> TrainerBuilder<L, O, M, R>
where
    L: Loss,
    M: TrainableModel,
    O: Optimizer<M::Params>,
    R: Regularizer<M>,
{
    pub fn new(loss_fn: L, optimizer: O, regularizer: R) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 1000,
            verbose: true,
            loss_fn,
            optimizer,
            regularizer,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Log the mean loss of every epoch at debug level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Trainer<L, O, M, R> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            regularizer: self.regularizer,
            _phantom_model: PhantomData,
        }
    }
}

impl<L, O, M, P, R> Trainer<L, O, M, R>
where
    L: Loss,
    M: TrainableModel<Input = SparseMatrix, Prediction = Vec<f64>, Params = P, Gradients = P>,
    O: Optimizer<P>,
    R: Regularizer<M>,
    P: ParamOps,
{
    pub fn builder(loss_fn: L, optimizer: O, regularizer: R) -> TrainerBuilder<L, O, M, R> {
        TrainerBuilder::new(loss_fn, optimizer, regularizer)
    }

    /// Runs `max_epochs` passes over `dataset` and returns the fitted model.
    ///
    /// # Errors
    /// Returns [`ModelError`] for an empty dataset, a zero batch size, a
    /// feature-width mismatch, or a data error raised by the dataset.
    pub fn fit<D: Dataset>(&self, mut model: M, dataset: &D) -> Result<M::Output, ModelError> {
        if self.batch_size == 0 {
            return Err(ModelError::InvalidParameter(
                "batch_size must be positive".to_string(),
            ));
        }
        let n_total = dataset
            .len()
            .ok_or_else(|| ModelError::InvalidParameter("dataset length unknown".to_string()))?;
        if n_total == 0 {
            return Err(ModelError::EmptyData("dataset is empty".to_string()));
        }

        for epoch in 0..self.max_epochs {
            let mut total_loss = 0.0;
            let mut n_batches = 0usize;
            for batch_result in dataset.batches(self.batch_size) {
                let (batch_x, batch_y) = batch_result
                    .map_err(|e| ModelError::InvalidParameter(format!("data error: {:?}", e)))?;
                let preds = model.forward(&batch_x)?;
                let (reg_penalty, reg_grad) = self.regularizer.regularizer_penalty_grad(&model);
                total_loss += self.loss_fn.loss(&preds, &batch_y) + reg_penalty;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let total_grads = grads.add(&reg_grad);
                let new_params = self.optimizer.step(model.params(), &total_grads);
                model.update_params(&new_params);
                n_batches += 1;
            }

            if self.verbose {
                let avg_loss = total_loss / n_batches.max(1) as f64;
                debug!(epoch, loss = avg_loss, "epoch finished");
            }
        }

        Ok(model.into_fitted())
    }
}
