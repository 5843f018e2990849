//! HTTP handlers for crop reference data

use axum::{extract::State, Json};

use crate::middleware::CurrentActor;
use crate::models::CropProfile;
use crate::AppState;

/// List the configured crop profiles
pub async fn list_crop_profiles(
    State(state): State<AppState>,
    _actor: CurrentActor,
) -> Json<Vec<CropProfile>> {
    Json(state.predictions.crop_profiles().to_vec())
}
