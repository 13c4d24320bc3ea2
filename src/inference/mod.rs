//! The inference side of the service: startup resolution of artifacts into
//! an immutable [`ModelState`], request parsing, and scoring.

pub mod request;
pub mod resolve;
pub mod scoring;
pub mod state;

pub use request::{collect_texts, is_json_content_type, parse_body, RequestError};
pub use resolve::{resolve, ArtifactPaths};
pub use scoring::{score, ScoringModel, Scores};
pub use state::{Health, InferenceMode, ModelState};

use serde::{Deserialize, Serialize};

pub const SPAM: &str = "SPAM";
pub const NOT_SPAM: &str = "NOT SPAM";

/// One entry of a `/predict` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub text: String,
    pub label: String,
    pub label_num: i64,
    pub probability: f64,
}

impl Prediction {
    pub fn new(text: String, label_num: i64, probability: f64) -> Self {
        let label = if label_num == 1 { SPAM } else { NOT_SPAM };
        Self {
            text,
            label: label.to_string(),
            label_num,
            probability,
        }
    }
}
