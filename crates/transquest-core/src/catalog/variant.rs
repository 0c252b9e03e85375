//! Model identifier parsing and source resolution.

use std::fmt;
use std::path::PathBuf;

use crate::model::ModelVariant;

#[derive(Debug, Clone)]
pub struct ParseModelVariantError {
    input: String,
}

impl ParseModelVariantError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

impl fmt::Display for ParseModelVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trimmed = self.input.trim();
        write!(
            f,
            "Unknown TransQuest model: {}",
            if trimmed.is_empty() { "<empty>" } else { trimmed }
        )
    }
}

impl std::error::Error for ParseModelVariantError {}

/// Where the checkpoint for a configured model name comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A known logical name, cached under the TransQuest cache directory
    Catalog(ModelVariant),
    /// Anything else, handed to the model library unchanged
    Direct {
        path: PathBuf,
        model_type: Option<String>,
    },
}

impl ModelSource {
    /// Architecture passed to the model library. Catalog entries always
    /// know theirs; direct paths need it from configuration.
    pub fn model_type(&self) -> Option<&str> {
        match self {
            Self::Catalog(variant) => Some(variant.backend_type()),
            Self::Direct { model_type, .. } => model_type.as_deref(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Catalog(variant) => variant.name().to_string(),
            Self::Direct { path, .. } => path.display().to_string(),
        }
    }
}

/// Parse a logical model name.
///
/// Accepts the canonical name (`en_de_hter`) as well as dash and case
/// variations (`EN-DE-HTER`).
pub fn parse_model_variant(input: &str) -> Result<ModelVariant, ParseModelVariantError> {
    let normalized = normalize_identifier(input);
    if normalized.is_empty() {
        return Err(ParseModelVariantError::new(input));
    }

    ModelVariant::all()
        .iter()
        .copied()
        .find(|variant| variant.name() == normalized)
        .ok_or_else(|| ParseModelVariantError::new(input))
}

/// Resolve a configured name to a catalog entry, or a direct path when the
/// name is not exactly a known logical identifier. Unlike
/// `parse_model_variant`, no case or dash folding is applied, so a directory
/// called `en-de` stays a path.
pub fn resolve_model_source(name: &str, model_type: Option<&str>) -> ModelSource {
    match ModelVariant::all().iter().find(|variant| variant.name() == name) {
        Some(variant) => ModelSource::Catalog(*variant),
        None => ModelSource::Direct {
            path: PathBuf::from(name),
            model_type: model_type.map(str::to_string),
        },
    }
}

fn normalize_identifier(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace('-', "_")
}
