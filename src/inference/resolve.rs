//! Startup artifact discovery.
//!
//! Priority, first success wins:
//! 1. a pipeline at the pipeline path;
//! 2. otherwise the vectorizer and classifier paths, loaded independently;
//! 3. a pipeline found at the classifier path is promoted to pipeline mode;
//! 4. a vectorizer that fails its fitted check is discarded.
//!
//! Nothing here is fatal: unreadable, undecodable or misplaced artifacts are
//! logged and treated as absent.

use crate::artifact::{load_artifact, LoadedArtifact};
use crate::error::ArtifactError;
use crate::inference::state::ModelState;
use crate::model::{ClassifierParams, FittedClassifier};
use crate::pipeline::{PipelineParams, SpamPipeline};
use crate::text::{FittedTfidfVectorizer, FittedTransformer, TfidfVectorizerParams};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Where the service looks for its artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
    pub pipeline: PathBuf,
}

impl ArtifactPaths {
    /// The three standard file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join(crate::training::VECTORIZER_FILE),
            classifier: dir.join(crate::training::CLASSIFIER_FILE),
            pipeline: dir.join(crate::training::PIPELINE_FILE),
        }
    }
}

fn try_load(path: &Path) -> Option<LoadedArtifact> {
    if !path.exists() {
        info!(path = %path.display(), "artifact not found");
        return None;
    }
    match load_artifact(path) {
        Ok(LoadedArtifact::Unknown { format_version }) => {
            warn!(
                path = %path.display(),
                format_version,
                "artifact format version not supported by this build; ignoring it"
            );
            None
        }
        Ok(artifact) => {
            info!(path = %path.display(), kind = artifact.kind(), "loaded artifact");
            Some(artifact)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed loading artifact");
            None
        }
    }
}

fn log_unfitted_vectorizer(path: &Path, reason: &str) {
    error!(
        path = %path.display(),
        reason,
        "loaded vectorizer appears to be UNFITTED; it was most likely serialized before \
         fitting. Re-run train-and-save to fit and save it, or save a pipeline"
    );
}

fn build_pipeline(params: PipelineParams, path: &Path) -> Option<SpamPipeline> {
    match SpamPipeline::from_params(params) {
        Ok(pipeline) => Some(pipeline),
        Err(ArtifactError::NotFitted(reason)) => {
            log_unfitted_vectorizer(path, &reason);
            None
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "pipeline artifact is unusable");
            None
        }
    }
}

fn build_classifier(params: ClassifierParams, path: &Path) -> Option<FittedClassifier> {
    match FittedClassifier::from_params(params) {
        Ok(classifier) => Some(classifier),
        Err(e) => {
            error!(path = %path.display(), error = %e, "classifier artifact is unusable");
            None
        }
    }
}

fn build_vectorizer(params: TfidfVectorizerParams, path: &Path) -> Option<FittedTfidfVectorizer> {
    match FittedTfidfVectorizer::from_params(params) {
        Ok(vectorizer) => Some(vectorizer),
        Err(ArtifactError::NotFitted(reason)) => {
            log_unfitted_vectorizer(path, &reason);
            None
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "vectorizer artifact is unusable");
            None
        }
    }
}

fn misplaced(path: &Path, found: &LoadedArtifact, expected: &str) {
    warn!(
        path = %path.display(),
        found = found.kind(),
        expected,
        "artifact has the wrong shape for this path; treating it as absent"
    );
}

/// Loads and validates artifacts, then picks the inference mode.
pub fn resolve(paths: &ArtifactPaths) -> ModelState {
    match try_load(&paths.pipeline) {
        Some(LoadedArtifact::CombinedPipeline(params)) => {
            if let Some(pipeline) = build_pipeline(params, &paths.pipeline) {
                info!("using combined pipeline for inference");
                return ModelState::with_pipeline(pipeline);
            }
        }
        Some(other) => misplaced(&paths.pipeline, &other, "pipeline"),
        None => {}
    }

    let vectorizer = try_load(&paths.vectorizer);
    let mut classifier = None;
    match try_load(&paths.classifier) {
        Some(LoadedArtifact::CombinedPipeline(params)) => {
            if let Some(pipeline) = build_pipeline(params, &paths.classifier) {
                info!("model file holds a pipeline; using it for inference");
                return ModelState::with_pipeline(pipeline);
            }
        }
        Some(LoadedArtifact::Classifier(params)) => {
            classifier = build_classifier(params, &paths.classifier);
        }
        Some(other) => misplaced(&paths.classifier, &other, "classifier"),
        None => {}
    }

    let vectorizer = match vectorizer {
        Some(LoadedArtifact::Vectorizer(params)) => build_vectorizer(params, &paths.vectorizer),
        Some(other) => {
            misplaced(&paths.vectorizer, &other, "vectorizer");
            None
        }
        None => None,
    };

    let state = ModelState::with_components(vectorizer, classifier);
    let health = state.health();
    if health.vectorizer_loaded && health.model_loaded {
        info!("using separate vectorizer and classifier for inference");
    } else {
        warn!(
            vectorizer_loaded = health.vectorizer_loaded,
            model_loaded = health.model_loaded,
            "separate components incomplete; predictions will fail until artifacts are provided"
        );
    }
    state
}
