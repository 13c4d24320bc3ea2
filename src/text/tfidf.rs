//! TF-IDF bag-of-words vectorizer.
//!
//! [`TfidfVectorizer`] holds hyperparameters only. Fitting it on a corpus
//! produces a [`FittedTfidfVectorizer`] with a vocabulary (term → column)
//! and, when IDF weighting is enabled, one IDF weight per column.
//!
//! Defaults match a conventional text classifier setup: lowercasing,
//! unigrams + bigrams, 5000 most frequent terms, smoothed IDF, L2-normalized
//! rows.

use super::sparse::{SparseMatrix, SparseRow};
use super::tokenize;
use super::traits::{FittedTransformer, Transformer};
use crate::error::{ArtifactError, ModelError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Hyperparameters of a TF-IDF vectorizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfidfConfig {
    pub lowercase: bool,
    /// Inclusive `(min_n, max_n)` n-gram range.
    pub ngram_range: (usize, usize),
    /// Keep only the most frequent terms across the corpus.
    pub max_features: Option<usize>,
    pub use_idf: bool,
    /// Add one to document frequencies as if an extra document held every term.
    pub smooth_idf: bool,
    /// Replace raw term counts with `1 + ln(count)`.
    pub sublinear_tf: bool,
    /// Scale every row to unit L2 norm.
    pub l2_norm: bool,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            ngram_range: (1, 2),
            max_features: Some(5000),
            use_idf: true,
            smooth_idf: true,
            sublinear_tf: false,
            l2_norm: true,
        }
    }
}

/// Serializable state of a vectorizer, fitted or not.
///
/// Params are what an artifact file stores, so they may describe a vectorizer
/// that was never fitted. [`TfidfVectorizerParams::check_fitted`] tells the
/// two apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizerParams {
    pub config: TfidfConfig,
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Option<Vec<f64>>,
}

impl TfidfVectorizerParams {
    /// Params of a vectorizer that has not seen any data.
    pub fn unfitted(config: TfidfConfig) -> Self {
        Self {
            config,
            vocabulary: BTreeMap::new(),
            idf: None,
        }
    }

    /// Verifies the fitted invariant: a non-empty vocabulary whose indices
    /// cover `0..len` and, under IDF weighting, one IDF weight per term.
    pub fn check_fitted(&self) -> Result<(), String> {
        let n = self.vocabulary.len();
        if n == 0 {
            return Err("vocabulary is empty".to_string());
        }
        let mut seen = vec![false; n];
        for (term, &idx) in &self.vocabulary {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(format!("vocabulary index {} for {:?} is invalid", idx, term)),
            }
        }
        if self.config.use_idf {
            match &self.idf {
                None => return Err("idf vector is not fitted".to_string()),
                Some(idf) if idf.len() != n => {
                    return Err(format!(
                        "idf vector has {} weights for {} terms",
                        idf.len(),
                        n
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.check_fitted().is_ok()
    }
}

/// Unfitted TF-IDF vectorizer.
#[derive(Clone, Debug, Default)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.config.max_features = max_features;
        self
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.config.ngram_range = (min_n, max_n);
        self
    }

    /// Use `1 + ln(count)` instead of raw counts.
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.config.sublinear_tf = sublinear_tf;
        self
    }
}

fn analyze(config: &TfidfConfig, doc: &str) -> Vec<String> {
    tokenize::ngrams(&tokenize::words(doc, config.lowercase), config.ngram_range)
}

impl Transformer for TfidfVectorizer {
    type Input = [String];
    type Output = SparseMatrix;
    type Params = TfidfVectorizerParams;
    type Fitted = FittedTfidfVectorizer;

    fn fit(&self, docs: &[String]) -> Result<FittedTfidfVectorizer, ModelError> {
        if docs.is_empty() {
            return Err(ModelError::EmptyData(
                "Cannot fit TfidfVectorizer on an empty corpus".to_string(),
            ));
        }

        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in docs {
            let terms = analyze(&self.config, doc);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_freq.entry(term).or_insert(0) += 1;
            }
        }

        if term_freq.is_empty() {
            return Err(ModelError::EmptyData(
                "empty vocabulary; the documents contain no tokens".to_string(),
            ));
        }

        // Most frequent first, alphabetical among ties.
        let mut terms: Vec<(String, usize)> = term_freq.into_iter().collect();
        if let Some(limit) = self.config.max_features {
            if terms.len() > limit {
                terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                terms.truncate(limit);
            }
        }
        let mut kept: Vec<String> = terms.into_iter().map(|(t, _)| t).collect();
        kept.sort();

        let n_docs = docs.len() as f64;
        let smooth = if self.config.smooth_idf { 1.0 } else { 0.0 };
        let idf: Option<Vec<f64>> = self.config.use_idf.then(|| {
            kept.iter()
                .map(|t| {
                    let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                    ((n_docs + smooth) / (df + smooth)).ln() + 1.0
                })
                .collect()
        });

        let vocabulary = kept.into_iter().enumerate().map(|(i, t)| (t, i)).collect();

        Ok(FittedTfidfVectorizer {
            config: self.config.clone(),
            vocabulary,
            idf,
        })
    }
}

/// TF-IDF vectorizer with a learned vocabulary.
#[derive(Clone, Debug)]
pub struct FittedTfidfVectorizer {
    config: TfidfConfig,
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
}

impl FittedTfidfVectorizer {
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of a term, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    fn transform_one(&self, doc: &str) -> SparseRow {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in analyze(&self.config, doc) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(idx, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                let w = self.idf.as_ref().map_or(1.0, |idf| idf[idx]);
                (idx, tf * w)
            })
            .collect();

        let mut row = SparseRow::from_pairs(pairs);
        if self.config.l2_norm {
            row.l2_normalize();
        }
        row
    }
}

impl FittedTransformer for FittedTfidfVectorizer {
    type Input = [String];
    type Output = SparseMatrix;
    type Params = TfidfVectorizerParams;

    fn transform(&self, docs: &[String]) -> Result<SparseMatrix, ModelError> {
        let rows = docs.iter().map(|d| self.transform_one(d)).collect();
        SparseMatrix::new(rows, self.vocabulary.len())
    }

    fn extract_params(&self) -> TfidfVectorizerParams {
        TfidfVectorizerParams {
            config: self.config.clone(),
            vocabulary: self
                .vocabulary
                .iter()
                .map(|(t, &i)| (t.clone(), i))
                .collect(),
            idf: self.idf.clone(),
        }
    }

    fn from_params(params: TfidfVectorizerParams) -> Result<Self, ArtifactError> {
        params.check_fitted().map_err(ArtifactError::NotFitted)?;
        Ok(Self {
            config: params.config,
            vocabulary: params.vocabulary.into_iter().collect(),
            idf: params.idf,
        })
    }

    fn n_features_out(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        ["free cash now", "free entry win cash", "see you at lunch"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let fitted = TfidfVectorizer::new()
            .with_ngram_range(1, 1)
            .fit(&corpus())
            .unwrap();

        // at, see, you, lunch, free, cash, now, entry, win
        assert_eq!(fitted.vocabulary_size(), 9);
        assert_eq!(fitted.index_of("at"), Some(0));
        assert_eq!(fitted.index_of("you"), Some(8));
        assert_eq!(fitted.index_of("zzz"), None);
    }

    #[test]
    fn test_fit_includes_bigrams() {
        let fitted = TfidfVectorizer::new().fit(&corpus()).unwrap();
        assert!(fitted.index_of("free cash").is_some());
        assert!(fitted.index_of("cash now").is_some());
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let fitted = TfidfVectorizer::new()
            .with_ngram_range(1, 1)
            .with_max_features(Some(2))
            .fit(&corpus())
            .unwrap();

        // "free" and "cash" each occur twice; everything else once.
        assert_eq!(fitted.vocabulary_size(), 2);
        assert_eq!(fitted.index_of("cash"), Some(0));
        assert_eq!(fitted.index_of("free"), Some(1));
    }

    #[test]
    fn test_smoothed_idf_values() {
        let fitted = TfidfVectorizer::new()
            .with_ngram_range(1, 1)
            .fit(&corpus())
            .unwrap();
        let params = fitted.extract_params();
        let idf = params.idf.unwrap();

        // df("free") = 2 of 3 docs: ln(4/3) + 1
        let free = idf[fitted.index_of("free").unwrap()];
        assert!((free - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        // df("lunch") = 1: ln(4/2) + 1
        let lunch = idf[fitted.index_of("lunch").unwrap()];
        assert!((lunch - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_rows_are_unit_norm() {
        let fitted = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let x = fitted.transform(&corpus()).unwrap();
        assert_eq!(x.shape(), (3, fitted.vocabulary_size()));
        for row in x.rows() {
            let norm: f64 = row.values.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sublinear_tf_dampens_repeats() {
        let docs: Vec<String> = vec!["cash cash free".to_string(), "lunch".to_string()];
        let ratio = |sublinear: bool| {
            let fitted = TfidfVectorizer::new()
                .with_ngram_range(1, 1)
                .with_sublinear_tf(sublinear)
                .fit(&docs)
                .unwrap();
            let x = fitted.transform(&docs[..1]).unwrap();
            let row = &x.rows()[0];
            let value = |term: &str| {
                let idx = fitted.index_of(term).unwrap();
                let pos = row.indices.iter().position(|&i| i == idx).unwrap();
                row.values[pos]
            };
            value("cash") / value("free")
        };
        assert!((ratio(false) - 2.0).abs() < 1e-12);
        assert!((ratio(true) - (1.0 + 2.0f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_transform_unknown_text_is_empty_row() {
        let fitted = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let x = fitted
            .transform(&["qwerty zxcvb".to_string(), String::new()])
            .unwrap();
        assert_eq!(x.rows()[0].nnz(), 0);
        assert_eq!(x.rows()[1].nnz(), 0);
    }

    #[test]
    fn test_fit_empty_corpus_fails() {
        assert!(matches!(
            TfidfVectorizer::new().fit(&[]),
            Err(ModelError::EmptyData(_))
        ));
        assert!(matches!(
            TfidfVectorizer::new().fit(&["a ! b".to_string()]),
            Err(ModelError::EmptyData(_))
        ));
    }

    #[test]
    fn test_params_roundtrip_preserves_transform() {
        let fitted = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let restored = FittedTfidfVectorizer::from_params(fitted.extract_params()).unwrap();
        assert_eq!(
            fitted.transform(&corpus()).unwrap(),
            restored.transform(&corpus()).unwrap()
        );
    }

    #[test]
    fn test_unfitted_params_are_rejected() {
        let params = TfidfVectorizerParams::unfitted(TfidfConfig::default());
        assert!(!params.is_fitted());
        assert!(matches!(
            FittedTfidfVectorizer::from_params(params),
            Err(ArtifactError::NotFitted(_))
        ));
    }

    #[test]
    fn test_missing_idf_is_not_fitted() {
        let fitted = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let mut params = fitted.extract_params();
        params.idf = None;
        assert_eq!(
            params.check_fitted().unwrap_err(),
            "idf vector is not fitted"
        );

        // Without IDF weighting the vocabulary alone is enough.
        params.config.use_idf = false;
        assert!(params.is_fitted());
    }

    #[test]
    fn test_duplicate_vocabulary_index_is_not_fitted() {
        let mut params = TfidfVectorizerParams::unfitted(TfidfConfig::default());
        params.config.use_idf = false;
        params.vocabulary.insert("free".to_string(), 0);
        params.vocabulary.insert("cash".to_string(), 0);
        assert!(!params.is_fitted());
    }
}
