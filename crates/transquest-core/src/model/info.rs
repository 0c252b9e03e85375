//! Model information and metadata

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pretrained TransQuest checkpoints with a known remote archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelVariant {
    /// English-German word-level tagger (MicroTransQuest)
    #[serde(rename = "en_de")]
    MicroEnDe,
    /// English-Chinese word-level tagger (MicroTransQuest)
    #[serde(rename = "en_zh")]
    MicroEnZh,
    /// English-German HTER regressor (MonoTransQuest)
    #[serde(rename = "en_de_hter")]
    MonoEnDeHter,
    /// English-German direct assessment regressor (MonoTransQuest)
    #[serde(rename = "en_de_da")]
    MonoEnDeDa,
}

/// What a checkpoint predicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Per-position OK/BAD tags for source words and target words/gaps
    Word,
    /// One scalar score per sentence pair
    Sentence,
}

impl ModelVariant {
    /// Logical name, also used as the cache directory name
    pub fn name(&self) -> &'static str {
        match self {
            Self::MicroEnDe => "en_de",
            Self::MicroEnZh => "en_zh",
            Self::MonoEnDeHter => "en_de_hter",
            Self::MonoEnDeDa => "en_de_da",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MicroEnDe => "MicroTransQuest en-de (word level)",
            Self::MicroEnZh => "MicroTransQuest en-zh (word level)",
            Self::MonoEnDeHter => "MonoTransQuest en-de HTER",
            Self::MonoEnDeDa => "MonoTransQuest en-de DA",
        }
    }

    /// Transformer architecture the checkpoint was trained with
    pub fn backend_type(&self) -> &'static str {
        "xlmroberta"
    }

    /// Google Drive file id of the zipped checkpoint
    pub fn archive_id(&self) -> &'static str {
        match self {
            Self::MicroEnDe | Self::MicroEnZh => "108feANZ_VTaAjJMwR85DPzzN6TLdLjvd",
            Self::MonoEnDeHter => "1YYL2qCtceHa1ufrLwF-iBlrYugAF2lE1",
            Self::MonoEnDeDa => "1byzONzC1t1Qc0m76c4TOEGvC0yMBWnMU",
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::MicroEnDe | Self::MicroEnZh => ModelKind::Word,
            Self::MonoEnDeHter | Self::MonoEnDeDa => ModelKind::Sentence,
        }
    }

    /// Get all available variants
    pub fn all() -> &'static [ModelVariant] {
        &[
            Self::MicroEnDe,
            Self::MicroEnZh,
            Self::MonoEnDeHter,
            Self::MonoEnDeDa,
        ]
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Word => write!(f, "word"),
            Self::Sentence => write!(f, "sentence"),
        }
    }
}

/// Model download/load status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// Cache directory missing or empty
    NotDownloaded,
    /// Unpacked in the cache
    Downloaded,
    /// Loaded by the inference daemon
    Ready,
    /// Last download or load attempt failed
    Error,
}

/// Complete model information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub variant: ModelVariant,
    pub name: String,
    pub kind: ModelKind,
    pub status: ModelStatus,
    pub local_path: Option<PathBuf>,
    pub size_bytes: Option<u64>,
    pub error_message: Option<String>,
}

impl ModelInfo {
    pub fn new(variant: ModelVariant) -> Self {
        Self {
            variant,
            name: variant.name().to_string(),
            kind: variant.kind(),
            status: ModelStatus::NotDownloaded,
            local_path: None,
            size_bytes: None,
            error_message: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.local_path = Some(path);
        self.status = ModelStatus::Downloaded;
        self
    }
}
