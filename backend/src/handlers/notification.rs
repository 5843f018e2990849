//! HTTP handlers for alert subscriptions and the in-app inbox

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentActor;
use crate::models::{InAppNotification, Subscription};
use crate::services::notification::SubscribeInput;
use crate::AppState;

/// Register a recipient for alerts at a location
pub async fn subscribe(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Json(input): Json<SubscribeInput>,
) -> AppResult<(StatusCode, Json<Subscription>)> {
    let subscription = state.notifications.subscribe(input).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// In-app notifications for a recipient, newest first
pub async fn get_inbox(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(recipient): Path<String>,
) -> Json<Vec<InAppNotification>> {
    Json(state.notifications.inbox(&recipient).await)
}
