//! Model catalog surface.
//!
//! Canonical place for model metadata, identifier parsing and the
//! direction-to-model table.

mod direction;
mod variant;

pub use crate::model::{ModelInfo, ModelKind, ModelStatus, ModelVariant};
pub use direction::{DirectionModelRefs, LanguageDirection, ModelRef, DEFAULT_SOURCE_TEXT};
pub use variant::{parse_model_variant, resolve_model_source, ModelSource, ParseModelVariantError};
