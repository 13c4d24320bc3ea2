//! Training data: batch iteration over vectorized rows and the labeled text
//! corpus they are built from.

use crate::text::SparseMatrix;
use std::fmt::Debug;
use std::ops::Range;

pub mod labeled;
pub mod memory;

pub use self::labeled::{stratified_split, LabeledTexts, Split};
pub use self::memory::InMemoryDataset;

pub trait Dataset {
    type Error: Debug;

    /// Total number of samples, if known.
    fn len(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Iterates over consecutive batches of at most `batch_size` samples.
    fn batches(&self, batch_size: usize) -> DatasetBatchIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
        }
    }

    fn get_batch(&self, range: Range<usize>) -> Result<(SparseMatrix, Vec<f64>), Self::Error>;
}

pub struct DatasetBatchIter<'a, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    current: usize,
}

impl<'a, D: Dataset> Iterator for DatasetBatchIter<'a, D> {
    type Item = Result<(SparseMatrix, Vec<f64>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total || self.batch_size == 0 {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch(range))
    }
}
