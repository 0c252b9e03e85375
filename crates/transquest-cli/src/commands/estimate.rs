//! `transquest estimate`

use anyhow::Context;
use transquest_core::model::GoogleDriveFetcher;
use transquest_core::{
    EngineConfig, LanguageDirection, PredictedToken, QualityLabel, QualityService,
};

use crate::OutputFormat;

pub struct EstimateArgs {
    pub direction: String,
    pub source: String,
    pub target: String,
}

pub fn execute(
    args: EstimateArgs,
    mut config: EngineConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let direction: LanguageDirection = args.direction.parse()?;

    // Only the requested direction's models are needed
    config.directions = vec![direction];
    let service = QualityService::from_config(config, GoogleDriveFetcher::new()?)
        .with_context(|| format!("Failed to load models for {}", direction))?;

    let report = service.estimate(direction, &args.source, &args.target);
    service.shutdown();
    let report = report?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.to_view())?),
        OutputFormat::Table => {
            println!("Direction:         {}", direction);
            println!("HTER:              {}", report.hter_display());
            println!("Direct Assessment: {}", report.da_display());
            println!("Source quality:    {}", mark_bad(&report.source_tokens));
            println!("Target quality:    {}", mark_bad(&report.target_tokens));
            println!("(BAD tokens in brackets)");
        }
    }
    Ok(())
}

/// Join tokens with spaces, bracketing the ones tagged BAD
fn mark_bad(tokens: &[PredictedToken]) -> String {
    tokens
        .iter()
        .map(|token| match token.quality {
            QualityLabel::Bad => format!("[{}]", token.text),
            _ => token.text.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
