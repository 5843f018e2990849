//! HTTP handlers for seasonal analysis and prediction endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentActor;
use crate::models::{
    AgroClimaticPrediction, CropProfile, PredictionRecord, SeasonWindow, SeasonalPattern,
    WeatherObservation,
};
use crate::AppState;

/// Request body for stateless analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub observations: Vec<WeatherObservation>,
    pub season_window: Option<SeasonWindow>,
}

/// Seasonal pattern for caller-supplied observations
pub async fn analyze(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<SeasonalPattern>> {
    let pattern = state
        .predictions
        .analyze(request.observations, request.season_window)?;
    Ok(Json(pattern))
}

/// Request body for stateless prediction
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub observations: Vec<WeatherObservation>,
    pub current: WeatherObservation,
    pub horizon_days: Option<i64>,
    pub crop_profiles: Option<Vec<CropProfile>>,
}

/// Prediction for caller-supplied history and current reading
pub async fn predict(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Json(request): Json<PredictRequest>,
) -> AppResult<Json<AgroClimaticPrediction>> {
    let horizon_days = request
        .horizon_days
        .unwrap_or(state.config.prediction.default_horizon_days);
    let prediction = state.predictions.predict(
        request.observations,
        &request.current,
        horizon_days,
        request.crop_profiles.as_deref(),
    )?;
    Ok(Json(prediction))
}

/// Request body for a stored-location prediction run
#[derive(Debug, Default, Deserialize)]
pub struct LocationPredictionRequest {
    pub horizon_days: Option<i64>,
}

/// Run a prediction for a location from stored observations
pub async fn create_location_prediction(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(location): Path<String>,
    request: Option<Json<LocationPredictionRequest>>,
) -> AppResult<(StatusCode, Json<PredictionRecord>)> {
    let horizon_days = request
        .and_then(|Json(r)| r.horizon_days)
        .unwrap_or(state.config.prediction.default_horizon_days);

    tracing::debug!(
        actor = actor.0.label(),
        location = %location,
        horizon_days,
        "Prediction requested"
    );

    let record = state
        .predictions
        .predict_for_location(&location, horizon_days)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Stored prediction runs for a location
pub async fn list_location_predictions(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(location): Path<String>,
) -> AppResult<Json<Vec<PredictionRecord>>> {
    let records = state.predictions.list_predictions(&location).await?;
    Ok(Json(records))
}
