use crate::error::DatasetError;
use crate::text::SparseMatrix;
use crate::training::dataset::Dataset;
use std::ops::Range;

/// Vectorized rows with `0.0`/`1.0` targets, held in memory.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: SparseMatrix,
    y: Vec<f64>,
}

impl InMemoryDataset {
    pub fn new(x: SparseMatrix, y: Vec<f64>) -> Result<Self, DatasetError> {
        if x.n_rows() != y.len() {
            return Err(DatasetError::LengthMismatch {
                features: x.n_rows(),
                labels: y.len(),
            });
        }
        if y.is_empty() {
            return Err(DatasetError::EmptyData("dataset has no rows".to_string()));
        }
        Ok(Self { x, y })
    }

    /// Builds a dataset from integer class labels.
    pub fn from_labels(x: SparseMatrix, labels: &[i64]) -> Result<Self, DatasetError> {
        Self::new(x, labels.iter().map(|&l| l as f64).collect())
    }

    pub fn features(&self) -> &SparseMatrix {
        &self.x
    }
}

impl Dataset for InMemoryDataset {
    type Error = std::convert::Infallible;

    fn len(&self) -> Option<usize> {
        Some(self.y.len())
    }

    fn get_batch(&self, range: Range<usize>) -> Result<(SparseMatrix, Vec<f64>), Self::Error> {
        let y = self.y[range.clone()].to_vec();
        Ok((self.x.slice_rows(range), y))
    }
}
