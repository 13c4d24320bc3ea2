//! Offline training: CSV corpus in, three artifact files out.
//!
//! [`run`] loads the labeled corpus, splits it (stratified, seeded), fits the
//! TF-IDF vectorizer on the training texts, trains a linear classifier with
//! the mini-batch [`Trainer`], reports held-out accuracy and writes the
//! vectorizer, the classifier and a pipeline wrapping both.

pub mod dataset;
pub mod loss;
pub mod optimizer;
pub mod regularizers;
pub mod trainer;

pub use dataset::{stratified_split, Dataset, InMemoryDataset, LabeledTexts, Split};
pub use loss::{BCEWithLogitsLoss, HingeLoss, Loss};
pub use optimizer::{Optimizer, SGD};
pub use regularizers::{NoRegularizer, Regularizer, L2};
pub use trainer::{Trainer, TrainerBuilder};

use crate::artifact::{save_artifact, Artifact};
use crate::error::{ModelError, TrainingError};
use crate::model::{Fitted, FittedClassifier, LinearClassifier};
use crate::pipeline::SpamPipeline;
use crate::text::{FittedTfidfVectorizer, FittedTransformer, TfidfVectorizer, Transformer};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.bin";
pub const CLASSIFIER_FILE: &str = "logistic_model.bin";
pub const PIPELINE_FILE: &str = "pipeline.bin";
const LOCK_FILE: &str = ".train.lock";

/// Which linear classifier to fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ClassifierKind {
    /// Logistic regression; artifacts expose probabilities.
    Logistic,
    /// Linear SVM; artifacts expose decision margins only.
    Svm,
}

/// Settings of one training run.
#[derive(Clone, Debug)]
pub struct TrainingOptions {
    pub csv_path: PathBuf,
    pub outdir: PathBuf,
    pub classifier: ClassifierKind,
    pub max_features: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub test_ratio: f64,
    pub seed: u64,
    /// Log-scaled term counts in the vectorizer.
    pub sublinear_tf: bool,
}

impl TrainingOptions {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(csv_path: P, outdir: Q) -> Self {
        Self {
            csv_path: csv_path.into(),
            outdir: outdir.into(),
            classifier: ClassifierKind::Logistic,
            max_features: 5000,
            epochs: 30,
            batch_size: 32,
            learning_rate: 1.0,
            l2: 1e-4,
            test_ratio: 0.2,
            seed: 42,
            sublinear_tf: false,
        }
    }

    pub fn classifier(mut self, kind: ClassifierKind) -> Self {
        self.classifier = kind;
        self
    }

    pub fn max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.outdir.join(VECTORIZER_FILE)
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.outdir.join(CLASSIFIER_FILE)
    }

    pub fn pipeline_path(&self) -> PathBuf {
        self.outdir.join(PIPELINE_FILE)
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug)]
pub struct TrainingReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub skipped_labels: usize,
    pub dropped_texts: usize,
    pub vocabulary_size: usize,
    /// Accuracy on the held-out split; `None` when the split is empty.
    pub test_accuracy: Option<f64>,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    pub pipeline_path: PathBuf,
}

/// Exclusive advisory lock on an output directory.
///
/// The lock lives on the open `.train.lock` handle, so the OS drops it when
/// the process exits for any reason. A lock file left behind by a killed run
/// is simply locked again.
pub(crate) struct OutputLock {
    file: File,
    path: PathBuf,
}

impl OutputLock {
    pub(crate) fn acquire(outdir: &Path) -> Result<Self, TrainingError> {
        let path = outdir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                return Err(TrainingError::OutputLocked(outdir.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        // Owner pid, for whoever finds the file while a run is active.
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        Ok(Self { file, path })
    }
}

impl Drop for OutputLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "failed to release lock file");
        }
    }
}

/// Fits the vectorizer on `texts` and a classifier on the vectorized texts.
///
/// Training data holding a single class yields a constant classifier.
pub fn fit_components(
    texts: &[String],
    labels: &[i64],
    options: &TrainingOptions,
) -> Result<(FittedTfidfVectorizer, FittedClassifier), TrainingError> {
    let (vectorizer, x) = TfidfVectorizer::new()
        .with_max_features(Some(options.max_features))
        .with_sublinear_tf(options.sublinear_tf)
        .fit_transform(texts)?;
    info!(vocabulary_size = vectorizer.vocabulary_size(), "vectorizer fitted");

    let n_features = vectorizer.n_features_out();
    let first = labels
        .first()
        .copied()
        .ok_or_else(|| ModelError::EmptyData("no training labels".to_string()))?;
    if labels.iter().all(|&l| l == first) {
        warn!(label = first, "training data holds a single class; using a constant classifier");
        return Ok((vectorizer, FittedClassifier::constant(first, n_features)));
    }

    let data = InMemoryDataset::from_labels(x, labels)?;
    let sgd = SGD::new(options.learning_rate);
    let classifier: FittedClassifier = match options.classifier {
        ClassifierKind::Logistic => {
            let trainer = Trainer::builder(BCEWithLogitsLoss, sgd, L2::new(options.l2))
                .batch_size(options.batch_size)
                .max_epochs(options.epochs)
                .build();
            let model: LinearClassifier<Fitted> =
                trainer.fit(LinearClassifier::logistic(n_features), &data)?;
            model.into()
        }
        ClassifierKind::Svm => {
            let trainer = Trainer::builder(HingeLoss, sgd, L2::new(options.l2))
                .batch_size(options.batch_size)
                .max_epochs(options.epochs)
                .build();
            let model: LinearClassifier<Fitted> =
                trainer.fit(LinearClassifier::svm(n_features), &data)?;
            model.into()
        }
    };
    info!(kind = ?options.classifier, "classifier trained");
    Ok((vectorizer, classifier))
}

/// Fraction of `texts` the pipeline labels correctly.
pub fn accuracy(
    pipeline: &SpamPipeline,
    texts: &[String],
    labels: &[i64],
) -> Result<Option<f64>, ModelError> {
    if texts.is_empty() {
        return Ok(None);
    }
    let predicted = pipeline.predict(texts)?;
    let correct = predicted.iter().zip(labels).filter(|(p, l)| p == l).count();
    Ok(Some(correct as f64 / texts.len() as f64))
}

/// Runs a full training job and writes the three artifacts.
///
/// # Errors
/// Fails when the CSV cannot be read or has fewer than two columns, when no
/// usable rows remain, or when another run holds the output directory.
pub fn run(options: &TrainingOptions) -> Result<TrainingReport, TrainingError> {
    fs::create_dir_all(&options.outdir)?;
    let _lock = OutputLock::acquire(&options.outdir)?;

    info!(path = %options.csv_path.display(), "loading CSV");
    let corpus = LabeledTexts::load(&options.csv_path)?;
    info!(
        rows = corpus.len(),
        skipped_labels = corpus.skipped_labels(),
        dropped_texts = corpus.dropped_texts(),
        "dataset loaded"
    );

    let split = stratified_split(corpus.labels(), options.test_ratio, options.seed);
    let (train_texts, train_labels) = corpus.select(&split.train);
    let (test_texts, test_labels) = corpus.select(&split.test);

    let (vectorizer, classifier) = fit_components(&train_texts, &train_labels, options)?;
    let pipeline = SpamPipeline::new(vectorizer, classifier)?;

    let test_accuracy = accuracy(&pipeline, &test_texts, &test_labels)?;
    if let Some(acc) = test_accuracy {
        info!(accuracy = acc, n_test = test_texts.len(), "held-out evaluation");
    }

    let report = TrainingReport {
        n_rows: corpus.len(),
        n_train: train_texts.len(),
        n_test: test_texts.len(),
        skipped_labels: corpus.skipped_labels(),
        dropped_texts: corpus.dropped_texts(),
        vocabulary_size: pipeline.vectorizer().vocabulary_size(),
        test_accuracy,
        vectorizer_path: options.vectorizer_path(),
        classifier_path: options.classifier_path(),
        pipeline_path: options.pipeline_path(),
    };

    save_artifact(
        &report.vectorizer_path,
        &Artifact::Vectorizer(pipeline.vectorizer().extract_params()),
    )?;
    save_artifact(
        &report.classifier_path,
        &Artifact::Classifier(pipeline.classifier().extract_params()),
    )?;
    info!(dir = %options.outdir.display(), "saved vectorizer and classifier");

    save_artifact(&report.pipeline_path, &Artifact::Pipeline(pipeline.extract_params()))?;
    info!(path = %report.pipeline_path.display(), "saved pipeline");

    Ok(report)
}
