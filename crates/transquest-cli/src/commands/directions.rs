//! `transquest directions`

use serde::Serialize;
use transquest_core::{EngineConfig, LanguageDirection, DEFAULT_SOURCE_TEXT};

use crate::OutputFormat;

#[derive(Debug, Serialize)]
struct DirectionRow {
    direction: LanguageDirection,
    enabled: bool,
    word_model: String,
    hter_model: String,
    da_model: String,
    example_source: &'static str,
    example_target: &'static str,
}

fn rows(config: &EngineConfig) -> Vec<DirectionRow> {
    LanguageDirection::all()
        .iter()
        .map(|direction| {
            let models = config.models_for(*direction);
            DirectionRow {
                direction: *direction,
                enabled: config.directions.contains(direction),
                word_model: models.word.name,
                hter_model: models.hter.name,
                da_model: models.da.name,
                example_source: DEFAULT_SOURCE_TEXT,
                example_target: direction.default_target_text(),
            }
        })
        .collect()
}

pub fn execute(config: &EngineConfig, format: OutputFormat) -> anyhow::Result<()> {
    let rows = rows(config);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            println!(
                "{:<14} {:<8} {:<24} {:<24} {:<24}",
                "DIRECTION", "ENABLED", "WORD", "HTER", "DA"
            );
            for row in &rows {
                println!(
                    "{:<14} {:<8} {:<24} {:<24} {:<24}",
                    row.direction.as_str(),
                    if row.enabled { "yes" } else { "no" },
                    row.word_model,
                    row.hter_model,
                    row.da_model
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_en_de_only() {
        let rows = rows(&EngineConfig::default());
        assert_eq!(rows.len(), 3);
        assert!(rows[0].enabled);
        assert_eq!(rows[0].hter_model, "en_de_hter");
        assert!(!rows[1].enabled);
        assert_eq!(rows[2].example_target, "ආයුබෝවන්");
    }
}
