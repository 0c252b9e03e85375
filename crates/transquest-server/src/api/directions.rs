//! Translation direction listing.

use axum::{extract::State, Json};
use serde::Serialize;
use transquest_core::{LanguageDirection, DEFAULT_SOURCE_TEXT};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DirectionInfo {
    pub direction: LanguageDirection,
    pub loaded: bool,
    pub word_model: String,
    pub hter_model: String,
    pub da_model: String,
    pub default_source: &'static str,
    pub default_target: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub directions: Vec<DirectionInfo>,
}

pub async fn list_directions(State(state): State<AppState>) -> Json<DirectionsResponse> {
    let config = state.service.manager().config();
    let registry = state.service.registry();

    let directions = LanguageDirection::all()
        .iter()
        .map(|direction| {
            let models = config.models_for(*direction);
            DirectionInfo {
                direction: *direction,
                loaded: registry.is_loaded(*direction),
                word_model: models.word.name,
                hter_model: models.hter.name,
                da_model: models.da.name,
                default_source: DEFAULT_SOURCE_TEXT,
                default_target: direction.default_target_text(),
            }
        })
        .collect();

    Json(DirectionsResponse { directions })
}
