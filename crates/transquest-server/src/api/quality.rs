//! Quality estimation endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use transquest_core::{LanguageDirection, QualityReportView};

use crate::error::ApiError;
use crate::state::AppState;

/// Quality estimation request
#[derive(Debug, Deserialize)]
pub struct QualityRequest {
    pub direction: String,
    pub source: String,
    pub target: String,
}

/// Score one source/target pair and return colored tokens
pub async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<QualityRequest>,
) -> Result<Json<QualityReportView>, ApiError> {
    let direction: LanguageDirection = req.direction.parse()?;
    info!(
        "Quality request ({}): {} source chars, {} target chars",
        direction,
        req.source.chars().count(),
        req.target.chars().count()
    );

    let report = state.estimate(direction, req.source, req.target).await?;
    Ok(Json(report.to_view()))
}
