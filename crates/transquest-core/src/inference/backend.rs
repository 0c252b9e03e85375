//! The capability every loaded quality model exposes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::alignment::QualityLabel;
use crate::error::Result;
use crate::model::ModelKind;

/// One source sentence with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    pub source: String,
    pub target: String,
}

impl SentencePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Raw prediction for a batch of pairs
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Sentence-level models: one score per pair
    Scores {
        scores: Vec<f64>,
        raw_outputs: serde_json::Value,
    },
    /// Word-level models: one tag sequence per pair and side
    Tags {
        source_tags: Vec<Vec<QualityLabel>>,
        target_tags: Vec<Vec<QualityLabel>>,
    },
}

/// Everything the inference runtime needs to locate and build a checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub kind: ModelKind,
    pub model_type: String,
    pub model_path: PathBuf,
    pub use_cuda: bool,
    pub cuda_device: i32,
}

/// A loaded, read-only quality estimation model
pub trait QualityModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Run inference on a batch of pairs
    fn predict(&self, pairs: &[SentencePair]) -> Result<ModelOutput>;
}

/// Builds a `QualityModel` from a resolved checkpoint
pub trait ModelLoader: Send + Sync {
    fn load(&self, descriptor: ModelDescriptor) -> Result<Arc<dyn QualityModel>>;
}
