//! Configuration types for the TransQuest service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::{DirectionModelRefs, LanguageDirection};
use crate::error::{Error, Result};

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding one unpacked checkpoint per logical model name
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Python interpreter used for the inference daemon
    #[serde(default = "default_python_cmd")]
    pub python_cmd: String,

    /// Persistent inference daemon script
    #[serde(default = "default_daemon_script")]
    pub daemon_script: PathBuf,

    /// One-shot inference script used when the daemon is unreachable
    #[serde(default = "default_inference_script")]
    pub inference_script: PathBuf,

    /// Unix socket the daemon listens on
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Run inference on GPU
    #[serde(default)]
    pub use_cuda: bool,

    /// CUDA device index, -1 lets the library pick
    #[serde(default = "default_cuda_device")]
    pub cuda_device: i32,

    /// Directions whose models are loaded at startup
    #[serde(default = "default_directions")]
    pub directions: Vec<LanguageDirection>,

    /// Per-direction model overrides, keyed by direction name
    #[serde(default)]
    pub models: BTreeMap<String, DirectionModelRefs>,

    /// Concurrent inference requests admitted by the server
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            python_cmd: default_python_cmd(),
            daemon_script: default_daemon_script(),
            inference_script: default_inference_script(),
            socket_path: default_socket_path(),
            use_cuda: false,
            cuda_device: default_cuda_device(),
            directions: default_directions(),
            models: BTreeMap::new(),
            max_concurrent_requests: default_max_concurrent_requests(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `TRANSQUEST_CONFIG` when set, defaults otherwise
    pub fn from_env() -> Result<Self> {
        match std::env::var("TRANSQUEST_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Check that every override names a supported direction
    pub fn validate(&self) -> Result<()> {
        for key in self.models.keys() {
            key.parse::<LanguageDirection>()?;
        }
        if self.max_concurrent_requests == 0 {
            return Err(Error::ConfigError(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Model names for a direction, applying any configured override
    pub fn models_for(&self, direction: LanguageDirection) -> DirectionModelRefs {
        self.models
            .iter()
            .find(|(key, _)| {
                key.parse::<LanguageDirection>()
                    .map(|d| d == direction)
                    .unwrap_or(false)
            })
            .map(|(_, refs)| refs.clone())
            .unwrap_or_else(|| direction.default_models())
    }
}

fn default_cache_dir() -> PathBuf {
    if let Ok(from_env) = std::env::var("TRANSQUEST_CACHE_DIR") {
        let trimmed = from_env.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    resolve_cache_root(
        std::env::var("TORCH_HOME").ok().as_deref(),
        std::env::var("XDG_CACHE_HOME").ok().as_deref(),
        dirs::home_dir(),
    )
    .join("transquest")
}

/// Torch-style cache root: `$TORCH_HOME`, else `$XDG_CACHE_HOME/torch`,
/// else `~/.cache/torch`.
pub fn resolve_cache_root(
    torch_home: Option<&str>,
    xdg_cache_home: Option<&str>,
    home: Option<PathBuf>,
) -> PathBuf {
    fn non_empty(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    if let Some(torch_home) = non_empty(torch_home) {
        return expand_home(torch_home, home.as_deref());
    }

    let cache = match non_empty(xdg_cache_home) {
        Some(xdg) => expand_home(xdg, home.as_deref()),
        None => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cache"),
    };
    cache.join("torch")
}

fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if raw == "~" => home.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(raw)),
        _ => PathBuf::from(raw),
    }
}

fn default_python_cmd() -> String {
    "python3".to_string()
}

fn default_daemon_script() -> PathBuf {
    PathBuf::from("scripts/transquest_daemon.py")
}

fn default_inference_script() -> PathBuf {
    PathBuf::from("scripts/transquest_daemon.py")
}

fn default_socket_path() -> PathBuf {
    std::env::temp_dir().join("transquest_daemon.sock")
}

fn default_cuda_device() -> i32 {
    -1
}

fn default_directions() -> Vec<LanguageDirection> {
    vec![LanguageDirection::EnDe]
}

fn default_max_concurrent_requests() -> usize {
    1
}

fn default_request_timeout_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelRef;

    #[test]
    fn torch_home_wins() {
        let root = resolve_cache_root(
            Some("/opt/torch"),
            Some("/xdg"),
            Some(PathBuf::from("/home/u")),
        );
        assert_eq!(root, PathBuf::from("/opt/torch"));
    }

    #[test]
    fn xdg_cache_home_is_second() {
        let root = resolve_cache_root(None, Some("/xdg"), Some(PathBuf::from("/home/u")));
        assert_eq!(root, PathBuf::from("/xdg/torch"));
    }

    #[test]
    fn falls_back_to_home_cache() {
        let root = resolve_cache_root(Some(""), None, Some(PathBuf::from("/home/u")));
        assert_eq!(root, PathBuf::from("/home/u/.cache/torch"));
    }

    #[test]
    fn whitespace_only_torch_home_is_ignored() {
        let root = resolve_cache_root(Some("  "), Some(" /xdg "), None);
        assert_eq!(root, PathBuf::from("/xdg/torch"));
    }

    #[test]
    fn tilde_is_expanded() {
        let root = resolve_cache_root(None, Some("~/cache"), Some(PathBuf::from("/home/u")));
        assert_eq!(root, PathBuf::from("/home/u/cache/torch"));
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let raw = r#"
            use_cuda = true
            directions = ["en-de", "en-zh"]

            [models.en-zh]
            word = { name = "en_zh" }
            hter = { name = "/models/en_zh_hter", model_type = "xlmroberta" }
            da = { name = "/models/en_zh_da", model_type = "xlmroberta" }
        "#;
        let config: EngineConfig = toml::from_str(raw).unwrap();
        config.validate().unwrap();

        assert!(config.use_cuda);
        assert_eq!(config.cuda_device, -1);
        assert_eq!(config.max_concurrent_requests, 1);
        assert_eq!(
            config.directions,
            vec![LanguageDirection::EnDe, LanguageDirection::EnZh]
        );

        let zh = config.models_for(LanguageDirection::EnZh);
        assert_eq!(zh.hter.model_type.as_deref(), Some("xlmroberta"));
        assert_eq!(zh.word, ModelRef::named("en_zh"));

        let de = config.models_for(LanguageDirection::EnDe);
        assert_eq!(de, LanguageDirection::EnDe.default_models());
    }

    #[test]
    fn unknown_override_key_fails_validation() {
        let raw = r#"
            [models.fr-en]
            word = { name = "a" }
            hter = { name = "b" }
            da = { name = "c" }
        "#;
        let config: EngineConfig = toml::from_str(raw).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::UnsupportedDirection(_))
        ));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transquest.toml");
        std::fs::write(&path, "python_cmd = \"python3.10\"\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.python_cmd, "python3.10");
        assert_eq!(config.directions, vec![LanguageDirection::EnDe]);
    }
}
