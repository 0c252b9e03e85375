//! Supported translation directions and the model triple each one uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Default source sentence shown in the demo form
pub const DEFAULT_SOURCE_TEXT: &str = "Welcome";

/// Translation directions offered by the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageDirection {
    #[serde(rename = "en-de")]
    EnDe,
    #[serde(rename = "en-zh")]
    EnZh,
    #[serde(rename = "multilingual")]
    Multilingual,
}

impl LanguageDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnDe => "en-de",
            Self::EnZh => "en-zh",
            Self::Multilingual => "multilingual",
        }
    }

    /// Example target sentence pre-filled for this direction
    pub fn default_target_text(&self) -> &'static str {
        match self {
            Self::EnDe => "Herzlich willkommen",
            Self::EnZh => "欢迎",
            Self::Multilingual => "ආයුබෝවන්",
        }
    }

    /// Built-in model names for this direction.
    ///
    /// `multilingual` reuses the en-zh checkpoints.
    pub fn default_models(&self) -> DirectionModelRefs {
        let (word, hter, da) = match self {
            Self::EnDe => ("en_de", "en_de_hter", "en_de_da"),
            Self::EnZh | Self::Multilingual => ("en_zh", "en_zh_hter", "en_zh_da"),
        };
        DirectionModelRefs {
            word: ModelRef::named(word),
            hter: ModelRef::named(hter),
            da: ModelRef::named(da),
        }
    }

    pub fn all() -> &'static [LanguageDirection] {
        &[Self::EnDe, Self::EnZh, Self::Multilingual]
    }
}

impl fmt::Display for LanguageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::UnsupportedDirection(trimmed.to_string()))
    }
}

/// A configured model name plus an optional architecture for direct paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
}

impl ModelRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_type: None,
        }
    }
}

/// The three models queried for one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionModelRefs {
    pub word: ModelRef,
    pub hter: ModelRef,
    pub da: ModelRef,
}
