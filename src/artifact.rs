//! On-disk artifact files.
//!
//! Every file is one bincode-encoded [`Envelope`]: a magic tag, a format
//! version and a tagged [`Artifact`]. Loading reads the header first, so a
//! file written by a newer format is recognized as an artifact even when its
//! payload cannot be decoded.

use crate::error::ArtifactError;
use crate::model::ClassifierParams;
use crate::pipeline::PipelineParams;
use crate::serialization::{write_atomic, SerializableParams};
use crate::text::TfidfVectorizerParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MAGIC: [u8; 4] = *b"SPAM";
pub const FORMAT_VERSION: u32 = 1;

/// Payload of an artifact file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Artifact {
    Vectorizer(TfidfVectorizerParams),
    Classifier(ClassifierParams),
    Pipeline(PipelineParams),
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    magic: [u8; 4],
    format_version: u32,
    artifact: Artifact,
}

#[derive(Deserialize)]
struct Header {
    magic: [u8; 4],
    format_version: u32,
}

/// What a file turned out to contain, decided once at load time.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadedArtifact {
    CombinedPipeline(PipelineParams),
    Classifier(ClassifierParams),
    Vectorizer(TfidfVectorizerParams),
    /// A well-formed envelope of a format version this build cannot read.
    Unknown { format_version: u32 },
}

impl LoadedArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            LoadedArtifact::CombinedPipeline(_) => "pipeline",
            LoadedArtifact::Classifier(_) => "classifier",
            LoadedArtifact::Vectorizer(_) => "vectorizer",
            LoadedArtifact::Unknown { .. } => "unknown",
        }
    }
}

impl From<Artifact> for LoadedArtifact {
    fn from(artifact: Artifact) -> Self {
        match artifact {
            Artifact::Vectorizer(p) => LoadedArtifact::Vectorizer(p),
            Artifact::Classifier(p) => LoadedArtifact::Classifier(p),
            Artifact::Pipeline(p) => LoadedArtifact::CombinedPipeline(p),
        }
    }
}

pub fn encode(artifact: &Artifact) -> Result<Vec<u8>, ArtifactError> {
    let envelope = Envelope {
        magic: MAGIC,
        format_version: FORMAT_VERSION,
        artifact: artifact.clone(),
    };
    Ok(envelope.to_bytes()?)
}

pub fn decode(bytes: &[u8]) -> Result<LoadedArtifact, ArtifactError> {
    let header: Header = bincode::deserialize(bytes)?;
    if header.magic != MAGIC {
        return Err(ArtifactError::UnsupportedFormat(
            "missing artifact magic tag".to_string(),
        ));
    }
    if header.format_version != FORMAT_VERSION {
        return Ok(LoadedArtifact::Unknown {
            format_version: header.format_version,
        });
    }
    let envelope = Envelope::from_bytes(bytes)?;
    Ok(envelope.artifact.into())
}

/// Writes an artifact atomically, replacing any existing file.
pub fn save_artifact<P: AsRef<Path>>(path: P, artifact: &Artifact) -> Result<(), ArtifactError> {
    let bytes = encode(artifact)?;
    write_atomic(path, &bytes)?;
    Ok(())
}

pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<LoadedArtifact, ArtifactError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TfidfConfig;
    use tempfile::tempdir;

    fn classifier() -> Artifact {
        Artifact::Classifier(ClassifierParams::Constant {
            label: 1,
            n_features: 3,
        })
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        save_artifact(&path, &classifier()).unwrap();

        let loaded = load_artifact(&path).unwrap();
        assert_eq!(
            loaded,
            LoadedArtifact::Classifier(ClassifierParams::Constant {
                label: 1,
                n_features: 3
            })
        );
        assert_eq!(loaded.kind(), "classifier");
        assert!(!dir.path().join("model.bin.tmp").exists());
    }

    #[test]
    fn test_unfitted_vectorizer_still_loads() {
        let params = TfidfVectorizerParams::unfitted(TfidfConfig::default());
        let bytes = encode(&Artifact::Vectorizer(params.clone())).unwrap();
        assert_eq!(decode(&bytes).unwrap(), LoadedArtifact::Vectorizer(params));
    }

    #[test]
    fn test_newer_format_version_is_unknown() {
        let mut bytes = bincode::serialize(&MAGIC).unwrap();
        bytes.extend(bincode::serialize(&7u32).unwrap());
        bytes.extend([0xde, 0xad]);
        assert_eq!(
            decode(&bytes).unwrap(),
            LoadedArtifact::Unknown { format_version: 7 }
        );
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let mut bytes = encode(&classifier()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            decode(&bytes),
            Err(ArtifactError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_garbage_and_truncation_rejected() {
        assert!(decode(b"no").is_err());
        let bytes = encode(&classifier()).unwrap();
        assert!(decode(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_artifact(dir.path().join("absent.bin")),
            Err(ArtifactError::Io(_))
        ));
    }
}
