use crate::error::DatasetError;
use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Labeled SMS-style corpus: `(label, text)` pairs with `ham`→0, `spam`→1.
///
/// The CSV layout is positional: column 0 holds the label and column 1 the
/// text, whatever the header calls them. Extra columns are ignored. Bytes are
/// decoded as Latin-1, so any input decodes.
#[derive(Debug, Clone, Default)]
pub struct LabeledTexts {
    texts: Vec<String>,
    labels: Vec<i64>,
    skipped_labels: usize,
    dropped_texts: usize,
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn label_num(label: &[u8]) -> Option<i64> {
    match label {
        b"ham" => Some(0),
        b"spam" => Some(1),
        _ => None,
    }
}

impl LabeledTexts {
    /// Load a labeled corpus from a CSV file with a header row.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let n_columns = rdr.byte_headers()?.len();
        if n_columns < 2 {
            let missing = if n_columns == 0 { "label" } else { "text" };
            return Err(DatasetError::MissingColumn(missing.to_string()));
        }

        let mut out = Self::default();
        for result in rdr.byte_records() {
            let record = result?;
            let text = match record.get(1) {
                Some(t) if !t.is_empty() => latin1(t),
                _ => {
                    out.dropped_texts += 1;
                    continue;
                }
            };
            let raw_label = record.get(0).unwrap_or_default();
            match label_num(raw_label) {
                Some(label) => {
                    out.texts.push(text);
                    out.labels.push(label);
                }
                None => {
                    out.skipped_labels += 1;
                    debug!(label = %latin1(raw_label), "skipping row with unknown label");
                }
            }
        }

        if out.skipped_labels > 0 {
            warn!(
                skipped = out.skipped_labels,
                "rows with labels other than 'ham'/'spam' were skipped"
            );
        }
        if out.texts.is_empty() {
            return Err(DatasetError::EmptyData(
                "no rows labeled 'ham' or 'spam' with non-empty text".to_string(),
            ));
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Rows dropped because their label was neither `ham` nor `spam`.
    pub fn skipped_labels(&self) -> usize {
        self.skipped_labels
    }

    /// Rows dropped because their text was missing or empty.
    pub fn dropped_texts(&self) -> usize {
        self.dropped_texts
    }

    /// Texts and labels of the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> (Vec<String>, Vec<i64>) {
        indices
            .iter()
            .map(|&i| (self.texts[i].clone(), self.labels[i]))
            .unzip()
    }
}

/// Row indices of a train/test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffled split that keeps each class's share roughly equal in both parts.
///
/// A class with at least two rows always contributes one row to each side.
/// The result depends only on `labels`, `test_ratio` and `seed`.
pub fn stratified_split(labels: &[i64], test_ratio: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for (_, mut rows) in by_class {
        rows.shuffle(&mut rng);
        let n = rows.len();
        let mut n_test = (n as f64 * test_ratio).round() as usize;
        if n >= 2 {
            n_test = n_test.clamp(1, n - 1);
        } else {
            n_test = 0;
        }
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Split { train, test }
}
