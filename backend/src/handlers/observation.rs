//! HTTP handlers for weather observation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentActor;
use crate::models::WeatherObservation;
use crate::services::observation::{ObservationSink, ObservationSource, StoreObservationInput};
use crate::AppState;
use shared::DateRange;

/// Ingest a single station reading
pub async fn store_observation(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(input): Json<StoreObservationInput>,
) -> AppResult<(StatusCode, Json<WeatherObservation>)> {
    input.validate()?;
    if input.location.trim().is_empty() {
        return Err(AppError::Validation {
            field: "location".to_string(),
            message: "Location is required".to_string(),
        });
    }

    let observation = WeatherObservation::from(input);
    state.observations.store(observation.clone()).await?;

    tracing::info!(
        actor = actor.0.label(),
        location = %observation.location,
        "Observation ingested"
    );
    Ok((StatusCode::CREATED, Json(observation)))
}

/// Query parameters for observation history
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Observation history for a location.
///
/// Without an explicit range the configured history window ending today
/// is returned.
pub async fn get_observations(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(location): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<WeatherObservation>>> {
    let end = query
        .end_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let range = match query.start_date {
        Some(start) => DateRange::new(start, end),
        None => DateRange::ending_at(end, state.config.prediction.history_days),
    };

    if range.start > range.end {
        return Err(AppError::Validation {
            field: "start_date".to_string(),
            message: "start_date must not be after end_date".to_string(),
        });
    }

    let observations = state.observations.fetch_observations(&location, range).await?;
    Ok(Json(observations))
}
