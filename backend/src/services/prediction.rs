//! Prediction service for running the agro-climatic engine per location
//!
//! Supports:
//! - Orchestrated predictions from stored observations
//! - Stateless analysis and prediction over caller-supplied data
//! - Prediction history per location

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Days;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{
    AgroClimaticPrediction, CropProfile, PredictionRecord, Season, SeasonWindow, SeasonalPattern,
    WeatherObservation,
};
use crate::services::notification::NotificationService;
use crate::services::observation::ObservationSource;
use shared::{DateRange, Engine, EngineError};

// ============================================================================
// Persistence
// ============================================================================

/// Storage for completed prediction runs
#[async_trait]
pub trait PredictionSink: Send + Sync {
    async fn persist(&self, record: PredictionRecord) -> AppResult<()>;

    /// Stored records for `location`, oldest first
    async fn records_for(&self, location: &str) -> AppResult<Vec<PredictionRecord>>;
}

#[derive(Default)]
pub struct InMemoryPredictionStore {
    records: RwLock<HashMap<String, Vec<PredictionRecord>>>,
}

impl InMemoryPredictionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PredictionSink for InMemoryPredictionStore {
    async fn persist(&self, record: PredictionRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        records
            .entry(record.prediction.location.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn records_for(&self, location: &str) -> AppResult<Vec<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records.get(location).cloned().unwrap_or_default())
    }
}

// ============================================================================
// Service
// ============================================================================

/// Prediction service
#[derive(Clone)]
pub struct PredictionService {
    engine: Engine,
    crop_profiles: Arc<Vec<CropProfile>>,
    observations: Arc<dyn ObservationSource>,
    sink: Arc<dyn PredictionSink>,
    notifications: NotificationService,
    history_days: u64,
}

impl PredictionService {
    pub fn new(
        engine: Engine,
        crop_profiles: Arc<Vec<CropProfile>>,
        observations: Arc<dyn ObservationSource>,
        sink: Arc<dyn PredictionSink>,
        notifications: NotificationService,
        history_days: u64,
    ) -> Self {
        Self {
            engine,
            crop_profiles,
            observations,
            sink,
            notifications,
            history_days,
        }
    }

    pub fn crop_profiles(&self) -> &[CropProfile] {
        &self.crop_profiles
    }

    /// Seasonal pattern over caller-supplied observations.
    ///
    /// Without an explicit window the season containing the latest
    /// observation is used. Readings dated outside the window are ignored.
    pub fn analyze(
        &self,
        observations: Vec<WeatherObservation>,
        season: Option<SeasonWindow>,
    ) -> AppResult<SeasonalPattern> {
        let season = match season {
            Some(season) => season,
            None => observations
                .iter()
                .max_by_key(|o| o.timestamp)
                .map(|o| SeasonWindow::containing(o.date()))
                .ok_or_else(|| AppError::Validation {
                    field: "season_window".to_string(),
                    message: "A season window is required when no observations are given"
                        .to_string(),
                })?,
        };

        let in_window: Vec<WeatherObservation> = observations
            .into_iter()
            .filter(|o| season.contains(o.date()))
            .collect();
        Ok(self.seasonal_pattern(in_window, &season))
    }

    /// Pattern over readings already selected for `season`, sorted by timestamp
    fn seasonal_pattern(
        &self,
        mut observations: Vec<WeatherObservation>,
        season: &SeasonWindow,
    ) -> SeasonalPattern {
        observations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let pattern = self.engine.analyze(&observations, season);
        if pattern.insufficient_data {
            tracing::warn!(
                samples = pattern.sample_count,
                min_samples = self.engine.parameters().min_samples,
                season = %season.season,
                "Insufficient history for seasonal analysis"
            );
        }
        pattern
    }

    /// Prediction over caller-supplied data, using the configured crop
    /// table unless one is given.
    ///
    /// History is every reading from the target date's season, across years.
    pub fn predict(
        &self,
        observations: Vec<WeatherObservation>,
        current: &WeatherObservation,
        horizon_days: i64,
        crop_profiles: Option<&[CropProfile]>,
    ) -> AppResult<AgroClimaticPrediction> {
        let profiles = crop_profiles.unwrap_or(self.crop_profiles.as_slice());
        if profiles.is_empty() {
            return Err(EngineError::EmptyCropProfiles.into());
        }

        let season = SeasonWindow::containing(target_date(current, horizon_days)?);
        let history: Vec<WeatherObservation> = observations
            .into_iter()
            .filter(|o| season.season.includes(o.date()))
            .collect();
        let pattern = self.seasonal_pattern(history, &season);
        Ok(self.engine.predict(&pattern, current, horizon_days, profiles)?)
    }

    /// Run the engine for a stored location and persist the result.
    ///
    /// Alert delivery is spawned in the background; its failures are
    /// logged and never reach the caller.
    pub async fn predict_for_location(
        &self,
        location: &str,
        horizon_days: i64,
    ) -> AppResult<PredictionRecord> {
        let current = self
            .observations
            .fetch_current(location)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Observations for {}", location)))?;

        let range = DateRange::ending_at(current.date(), self.history_days);
        let season = Season::for_date(target_date(&current, horizon_days)?);

        let history: Vec<WeatherObservation> = self
            .observations
            .fetch_observations(location, range)
            .await?
            .into_iter()
            .filter(|o| season.includes(o.date()))
            .collect();
        let history_samples = history.len();

        let prediction = self.predict(history, &current, horizon_days, None)?;
        let record = PredictionRecord::new(prediction, history_samples);

        self.sink.persist(record.clone()).await?;

        tracing::info!(
            location = %location,
            target_date = %record.prediction.target_date,
            crop = %record.prediction.crop_recommendation,
            alerts = record.prediction.alerts.len(),
            "Prediction completed"
        );

        if !record.prediction.alerts.is_empty() {
            let notifications = self.notifications.clone();
            let alerts = record.prediction.alerts.clone();
            tokio::spawn(async move {
                let delivered = notifications.notify(&alerts).await;
                tracing::debug!(deliveries = delivered.len(), "Alert notifications dispatched");
            });
        }

        Ok(record)
    }

    pub async fn list_predictions(&self, location: &str) -> AppResult<Vec<PredictionRecord>> {
        self.sink.records_for(location).await
    }
}

fn target_date(current: &WeatherObservation, horizon_days: i64) -> AppResult<chrono::NaiveDate> {
    if horizon_days < 0 {
        return Err(EngineError::NegativeHorizon(horizon_days).into());
    }
    current
        .date()
        .checked_add_days(Days::new(horizon_days as u64))
        .ok_or_else(|| EngineError::HorizonOutOfRange(horizon_days).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification::LogSender;
    use crate::services::observation::InMemoryObservationStore;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use shared::default_crop_profiles;

    fn observation(day: i64, temp: f64) -> WeatherObservation {
        WeatherObservation {
            location: "kadoma".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap() + Duration::days(day),
            temperature_celsius: temp,
            humidity_percent: 60.0,
            precipitation_mm: 4.0,
            wind_speed_mps: 2.5,
            soil_moisture_percent: None,
            soil_ph: Some(6.2),
        }
    }

    async fn service(observations: Vec<WeatherObservation>) -> PredictionService {
        let store = InMemoryObservationStore::with_observations(observations).await;
        PredictionService::new(
            Engine::default(),
            Arc::new(default_crop_profiles()),
            Arc::new(store),
            Arc::new(InMemoryPredictionStore::new()),
            NotificationService::new(Arc::new(LogSender), Arc::new(LogSender)),
            365,
        )
    }

    #[tokio::test]
    async fn test_unknown_location_not_found() {
        let service = service(vec![]).await;
        let result = service.predict_for_location("kadoma", 7).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_prediction_is_persisted() {
        let history: Vec<_> = (0..20).map(|d| observation(d, 24.0 + (d % 3) as f64)).collect();
        let service = service(history).await;

        let record = service.predict_for_location("kadoma", 7).await.unwrap();
        assert_eq!(record.history_samples, 20);
        assert_eq!(record.prediction.horizon_days, 7);

        let stored = service.list_predictions("kadoma").await.unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[tokio::test]
    async fn test_negative_horizon_is_engine_error() {
        let service = service(vec![observation(0, 25.0)]).await;
        let result = service.predict_for_location("kadoma", -3).await;
        assert!(matches!(
            result,
            Err(AppError::Engine(EngineError::NegativeHorizon(-3)))
        ));
    }

    #[test]
    fn test_analyze_without_window_or_data_is_rejected() {
        let service = PredictionService::new(
            Engine::default(),
            Arc::new(default_crop_profiles()),
            Arc::new(InMemoryObservationStore::new()),
            Arc::new(InMemoryPredictionStore::new()),
            NotificationService::new(Arc::new(LogSender), Arc::new(LogSender)),
            365,
        );
        assert!(matches!(
            service.analyze(vec![], None),
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_analyze_ignores_readings_outside_window() {
        let service = service(vec![]).await;
        // A full year of daily readings from 2024-01-01
        let year: Vec<_> = (0..366).map(|d| observation(d, 20.0)).collect();
        let window = SeasonWindow::containing(observation(0, 20.0).date());
        let expected = year.iter().filter(|o| window.contains(o.date())).count();

        let pattern = service.analyze(year, Some(window)).unwrap();
        assert_eq!(pattern.season, window);
        assert_eq!(pattern.sample_count, expected);
        assert_eq!(expected, 91);
    }

    #[tokio::test]
    async fn test_analyze_defaults_to_latest_season() {
        let service = service(vec![]).await;
        let year: Vec<_> = (0..366).map(|d| observation(d, 20.0)).collect();

        // 2024-12-31 falls in the hot-wet season starting 2024-11-01
        let pattern = service.analyze(year, None).unwrap();
        assert_eq!(pattern.season.start, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        assert_eq!(pattern.sample_count, 61);
    }
}
