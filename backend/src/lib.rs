//! Agro-Climate Platform - Backend Server
//!
//! Seasonal pattern analysis, crop suitability, risk prediction and weather
//! alerting for smallholder farming, served over HTTP.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::{InMemoryObservationStore, InMemoryPredictionStore, NotificationService, PredictionService};
use shared::Engine;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub observations: Arc<InMemoryObservationStore>,
    pub predictions: PredictionService,
    pub notifications: NotificationService,
}

impl AppState {
    /// Build services from configuration with empty in-memory stores
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate_engine()?;
        let crop_profiles = Arc::new(config.load_crop_profiles()?);
        let notifications = NotificationService::from_config(&config.notifications)?;
        Ok(Self::with_services(
            config,
            crop_profiles,
            Arc::new(InMemoryObservationStore::new()),
            notifications,
        ))
    }

    /// Build state around an existing observation store and notifier
    pub fn with_services(
        config: Config,
        crop_profiles: Arc<Vec<shared::CropProfile>>,
        observations: Arc<InMemoryObservationStore>,
        notifications: NotificationService,
    ) -> Self {
        let predictions = PredictionService::new(
            Engine::new(config.engine.clone()),
            crop_profiles,
            observations.clone(),
            Arc::new(InMemoryPredictionStore::new()),
            notifications.clone(),
            config.prediction.history_days,
        );

        Self {
            config: Arc::new(config),
            observations,
            predictions,
            notifications,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Agro-Climate Platform API v1.0"
}
