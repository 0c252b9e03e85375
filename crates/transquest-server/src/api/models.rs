//! Model catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use transquest_core::{parse_model_variant, ModelInfo};

use crate::error::ApiError;
use crate::state::AppState;

/// Response for model list
#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

/// List all catalog models with cache and load status
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.service.list_models(),
    })
}

/// Get info for a specific model
pub async fn get_model_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModelInfo>, ApiError> {
    let variant = parse_model_variant(&name).map_err(|err| ApiError::not_found(err.to_string()))?;

    state
        .service
        .manager()
        .get_model_info(variant)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Model {} not found", variant)))
}
