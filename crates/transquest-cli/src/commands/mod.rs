//! Subcommand implementations

pub mod directions;
pub mod estimate;
pub mod models;
pub mod pull;

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use transquest_core::inference::{PythonBridge, PythonModelLoader};
use transquest_core::model::GoogleDriveFetcher;
use transquest_core::{EngineConfig, ModelManager};

/// Read the TOML file when one is given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Manager backed by the real Google Drive fetcher and Python runtime
pub fn build_manager(config: EngineConfig) -> anyhow::Result<ModelManager> {
    let bridge = Arc::new(PythonBridge::new(&config));
    let loader = Arc::new(PythonModelLoader::new(bridge));
    let fetcher = GoogleDriveFetcher::new()?;
    Ok(ModelManager::new(config, Box::new(fetcher), loader))
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
