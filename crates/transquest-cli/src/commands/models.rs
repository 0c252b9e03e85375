//! `transquest models` subcommands

use anyhow::anyhow;
use transquest_core::{parse_model_variant, EngineConfig, ModelInfo, ModelStatus};

use super::{build_manager, format_size};
use crate::{ModelCommands, OutputFormat};

pub fn execute(
    command: ModelCommands,
    config: EngineConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let manager = build_manager(config)?;

    match command {
        ModelCommands::List { local } => {
            let models: Vec<ModelInfo> = manager
                .list_models()
                .into_iter()
                .filter(|m| !local || m.status != ModelStatus::NotDownloaded)
                .collect();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&models)?),
                OutputFormat::Table => print!("{}", render_table(&models)),
            }
        }

        ModelCommands::Rm { model } => {
            let variant = parse_model_variant(&model).map_err(|e| anyhow!(e))?;
            manager.delete_model(variant)?;
            println!("Removed {}", variant);
        }
    }

    Ok(())
}

fn status_label(status: ModelStatus) -> &'static str {
    match status {
        ModelStatus::NotDownloaded => "not downloaded",
        ModelStatus::Downloaded => "downloaded",
        ModelStatus::Ready => "ready",
        ModelStatus::Error => "error",
    }
}

fn render_table(models: &[ModelInfo]) -> String {
    let mut out = format!(
        "{:<12} {:<10} {:<16} {:>10}\n",
        "NAME", "KIND", "STATUS", "SIZE"
    );
    for model in models {
        let size = model
            .size_bytes
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<12} {:<10} {:<16} {:>10}\n",
            model.name,
            model.kind.to_string(),
            status_label(model.status),
            size
        ));
        if let Some(err) = &model.error_message {
            out.push_str(&format!("  error: {}\n", err));
        }
    }
    out
}
