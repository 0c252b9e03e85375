//! TransQuest Core - translation quality estimation service internals
//!
//! This crate wires pretrained TransQuest checkpoints into a small serving
//! stack. The transformer inference itself runs in the Python model library
//! behind [`inference::PythonBridge`]; this crate owns everything around it:
//!
//! - the model catalog and direction table ([`catalog`])
//! - the checkpoint cache and archive download ([`model`])
//! - word/gap alignment of tag sequences ([`alignment`])
//! - colors and inline markup for display ([`render`])
//! - the per-direction model registry and request service
//!
//! # Example
//!
//! ```ignore
//! use transquest_core::model::GoogleDriveFetcher;
//! use transquest_core::{EngineConfig, LanguageDirection, QualityService};
//!
//! let service = QualityService::from_config(EngineConfig::default(), GoogleDriveFetcher::new()?)?;
//! let report = service.estimate(LanguageDirection::EnDe, "Welcome", "Herzlich willkommen")?;
//! println!("HTER {}", report.hter_display());
//! ```

pub mod alignment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod inference;
pub mod model;
pub mod registry;
pub mod render;
pub mod service;

pub use alignment::{align, PredictedToken, QualityLabel, GAP_TOKEN};
pub use catalog::{
    parse_model_variant, DirectionModelRefs, LanguageDirection, ModelInfo, ModelKind, ModelRef,
    ModelStatus, ModelVariant, DEFAULT_SOURCE_TEXT,
};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use inference::{ModelOutput, QualityModel, SentencePair};
pub use model::ModelManager;
pub use registry::{DirectionModels, ModelRegistry};
pub use render::{color_for, format_score, render_inline};
pub use service::{QualityReport, QualityReportView, QualityService};
