//! Route definitions for the Agro-Climate Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes, all behind API key authentication
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Reference data
        .route("/crops", get(handlers::list_crop_profiles))
        // Observation ingestion and history
        .nest("/observations", observation_routes())
        // Stateless engine access
        .route("/analyze", post(handlers::analyze))
        .route("/predict", post(handlers::predict))
        // Orchestrated predictions
        .nest("/locations", location_routes())
        // Alert delivery
        .route("/subscriptions", post(handlers::subscribe))
        .route("/notifications/:recipient", get(handlers::get_inbox))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Observation routes
fn observation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::store_observation))
        .route("/:location", get(handlers::get_observations))
}

/// Per-location prediction routes
fn location_routes() -> Router<AppState> {
    Router::new().route(
        "/:location/predictions",
        post(handlers::create_location_prediction).get(handlers::list_location_predictions),
    )
}
