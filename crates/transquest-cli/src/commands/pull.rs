//! `transquest pull`

use anyhow::anyhow;
use tracing::info;
use transquest_core::{parse_model_variant, EngineConfig};

use super::{build_manager, format_size};

pub fn execute(model: &str, force: bool, config: EngineConfig) -> anyhow::Result<()> {
    let variant = parse_model_variant(model).map_err(|e| anyhow!(e))?;
    let manager = build_manager(config)?;

    if force {
        info!("Removing cached copy of {} before download", variant);
        manager.delete_model(variant)?;
    }

    println!("Pulling {} ({})", variant, variant.display_name());
    let path = manager.download_model(variant)?;

    let size = manager
        .get_model_info(variant)
        .and_then(|m| m.size_bytes)
        .map(format_size)
        .unwrap_or_else(|| "unknown size".to_string());
    println!("{} ready at {} ({})", variant, path.display(), size);
    Ok(())
}
