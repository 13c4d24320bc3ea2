//! Text feature extraction: tokenization, TF-IDF vectorization and the
//! sparse matrices they produce.

pub mod sparse;
pub mod tfidf;
pub mod tokenize;
pub mod traits;

pub use sparse::{SparseMatrix, SparseRow};
pub use tfidf::{FittedTfidfVectorizer, TfidfConfig, TfidfVectorizer, TfidfVectorizerParams};
pub use traits::{FittedTransformer, Transformer};
