//! Row-oriented sparse matrices for bag-of-words features.
//!
//! TF-IDF rows are overwhelmingly zero, so each row stores only its non-zero
//! entries as parallel `indices`/`values` vectors with strictly increasing
//! indices, all below the matrix column count.

use crate::error::ModelError;
use std::ops::Range;

/// A single sparse feature vector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseRow {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseRow {
    /// Builds a row from `(index, value)` pairs, sorting by index.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_unstable_by_key(|&(idx, _)| idx);
        let (indices, values) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Dot product with a dense vector. Caller guarantees every index is in bounds.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(&idx, &v)| v * dense[idx])
            .sum()
    }

    /// Scale the row to unit euclidean norm. Zero rows are left untouched.
    pub fn l2_normalize(&mut self) {
        let norm = self.values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }
}

/// A batch of sparse rows sharing one column space.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix {
    rows: Vec<SparseRow>,
    n_cols: usize,
}

impl SparseMatrix {
    /// Creates a matrix, rejecting rows that reference columns outside `n_cols`.
    pub fn new(rows: Vec<SparseRow>, n_cols: usize) -> Result<Self, ModelError> {
        if let Some(bad) = rows
            .iter()
            .filter_map(SparseRow::max_index)
            .find(|&idx| idx >= n_cols)
        {
            return Err(ModelError::InvalidParameter(format!(
                "column index {} out of bounds for {} columns",
                bad, n_cols
            )));
        }
        Ok(Self { rows, n_cols })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_cols)
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// Computes `X @ w` for a dense weight vector.
    pub fn dot(&self, weights: &[f64]) -> Result<Vec<f64>, ModelError> {
        if weights.len() != self.n_cols {
            return Err(ModelError::FeatureMismatch {
                expected: weights.len(),
                got: self.n_cols,
            });
        }
        Ok(self.rows.iter().map(|row| row.dot(weights)).collect())
    }

    /// Computes `X^T @ g` where `g` has one entry per row.
    pub fn tdot(&self, grad: &[f64]) -> Vec<f64> {
        debug_assert_eq!(grad.len(), self.rows.len());
        let mut out = vec![0.0; self.n_cols];
        for (row, &g) in self.rows.iter().zip(grad) {
            for (&idx, &v) in row.indices.iter().zip(&row.values) {
                out[idx] += v * g;
            }
        }
        out
    }

    /// Contiguous sub-matrix of rows.
    pub fn slice_rows(&self, range: Range<usize>) -> Self {
        Self {
            rows: self.rows[range].to_vec(),
            n_cols: self.n_cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrix {
        // [[1, 0, 2],
        //  [0, 3, 0]]
        SparseMatrix::new(
            vec![
                SparseRow::from_pairs(vec![(2, 2.0), (0, 1.0)]),
                SparseRow::from_pairs(vec![(1, 3.0)]),
            ],
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_from_pairs_sorts_indices() {
        let row = SparseRow::from_pairs(vec![(4, 1.0), (1, 2.0)]);
        assert_eq!(row.indices, vec![1, 4]);
        assert_eq!(row.values, vec![2.0, 1.0]);
    }

    #[test]
    fn test_dot() {
        let x = sample();
        assert_eq!(x.dot(&[1.0, 1.0, 1.0]).unwrap(), vec![3.0, 3.0]);
        assert_eq!(x.dot(&[0.5, 2.0, -1.0]).unwrap(), vec![-1.5, 6.0]);
    }

    #[test]
    fn test_dot_feature_mismatch() {
        let x = sample();
        let err = x.dot(&[1.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_tdot() {
        // X^T @ [1, 2] = [1, 6, 2]
        let x = sample();
        assert_eq!(x.tdot(&[1.0, 2.0]), vec![1.0, 6.0, 2.0]);
    }

    #[test]
    fn test_new_rejects_out_of_bounds_column() {
        let rows = vec![SparseRow::from_pairs(vec![(5, 1.0)])];
        assert!(SparseMatrix::new(rows, 3).is_err());
    }

    #[test]
    fn test_l2_normalize() {
        let mut row = SparseRow::from_pairs(vec![(0, 3.0), (1, 4.0)]);
        row.l2_normalize();
        assert!((row.values[0] - 0.6).abs() < 1e-12);
        assert!((row.values[1] - 0.8).abs() < 1e-12);

        let mut empty = SparseRow::default();
        empty.l2_normalize();
        assert_eq!(empty.nnz(), 0);
    }

    #[test]
    fn test_slice_rows() {
        let x = sample();
        let tail = x.slice_rows(1..2);
        assert_eq!(tail.shape(), (1, 3));
        assert_eq!(tail.rows()[0].indices, vec![1]);
    }
}
