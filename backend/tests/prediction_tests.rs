//! Prediction service integration tests
//!
//! Tests for prediction orchestration including:
//! - History is limited to the season of the target date
//! - Records are stored per location
//! - Stateless predictions are deterministic

use std::sync::Arc;

use acp_server::services::{
    InMemoryObservationStore, InMemoryPredictionStore, LogSender, NotificationService,
    ObservationSink, PredictionService,
};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{default_crop_profiles, Engine, WeatherObservation};

fn observation(location: &str, days_from_jan_1: i64, temp: f64, humidity: f64, rain: f64) -> WeatherObservation {
    WeatherObservation {
        location: location.to_string(),
        timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 6, 0, 0).unwrap() + Duration::days(days_from_jan_1),
        temperature_celsius: temp,
        humidity_percent: humidity,
        precipitation_mm: rain,
        wind_speed_mps: 2.0,
        soil_moisture_percent: Some(30.0),
        soil_ph: Some(6.0),
    }
}

fn service_with(store: Arc<InMemoryObservationStore>) -> PredictionService {
    PredictionService::new(
        Engine::default(),
        Arc::new(default_crop_profiles()),
        store,
        Arc::new(InMemoryPredictionStore::new()),
        NotificationService::new(Arc::new(LogSender), Arc::new(LogSender)),
        365,
    )
}

// ============================================================================
// Orchestration
// ============================================================================

#[tokio::test]
async fn test_history_restricted_to_target_season() {
    let store = Arc::new(InMemoryObservationStore::new());
    // A full year of readings, one every ten days
    for day in (0..365).step_by(10) {
        store
            .store(observation("chiredzi", day, 27.0, 55.0, 2.0))
            .await
            .unwrap();
    }
    let service = service_with(store);

    // Latest reading is 2023-12-27; a 7 day horizon lands in January (hot-wet)
    let record = service.predict_for_location("chiredzi", 7).await.unwrap();
    let expected = (0..365)
        .step_by(10)
        .filter(|&day| {
            let date = (Utc.with_ymd_and_hms(2023, 1, 1, 6, 0, 0).unwrap() + Duration::days(day)).date_naive();
            shared::Season::HotWet.includes(date)
        })
        .count();
    assert_eq!(record.history_samples, expected);
    assert!(record.history_samples < 37);
    assert!(!record.prediction.used_persistence_fallback);
}

#[tokio::test]
async fn test_records_are_kept_per_location() {
    let store = Arc::new(InMemoryObservationStore::new());
    for day in 0..5 {
        store.store(observation("binga", day, 30.0, 50.0, 0.0)).await.unwrap();
        store.store(observation("nyanga", day, 18.0, 70.0, 3.0)).await.unwrap();
    }
    let service = service_with(store);

    service.predict_for_location("binga", 1).await.unwrap();
    service.predict_for_location("binga", 2).await.unwrap();
    service.predict_for_location("nyanga", 1).await.unwrap();

    let binga = service.list_predictions("binga").await.unwrap();
    assert_eq!(binga.len(), 2);
    assert_eq!(binga[0].prediction.horizon_days, 1);
    assert_eq!(binga[1].prediction.horizon_days, 2);
    assert_eq!(service.list_predictions("nyanga").await.unwrap().len(), 1);
    assert!(service.list_predictions("kariba").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_single_reading_falls_back_to_persistence() {
    let store = Arc::new(InMemoryObservationStore::new());
    store.store(observation("rusape", 10, 22.0, 66.0, 1.5)).await.unwrap();
    let service = service_with(store);

    let record = service.predict_for_location("rusape", 14).await.unwrap();
    assert!(record.prediction.used_persistence_fallback);
    assert_eq!(record.prediction.predicted_temperature_celsius, 22.0);
    assert_eq!(record.prediction.predicted_humidity_percent, 66.0);
    assert_eq!(record.prediction.predicted_precipitation_mm, 1.5);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_stateless_prediction_is_deterministic(
        readings in prop::collection::vec((-5.0f64..42.0, 5.0f64..100.0, 0.0f64..40.0), 0..30),
        horizon in 0i64..30,
    ) {
        let history: Vec<WeatherObservation> = readings
            .iter()
            .enumerate()
            .map(|(i, &(t, h, r))| observation("lupane", i as i64, t, h, r))
            .collect();
        let current = observation("lupane", 40, 24.0, 60.0, 2.0);
        let service = service_with(Arc::new(InMemoryObservationStore::new()));

        let first = service.predict(history.clone(), &current, horizon, None).unwrap();
        let second = service.predict(history, &current, horizon, None).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!((0.0..=100.0).contains(&first.yield_prediction_percent));
    }

    #[test]
    fn prop_input_order_does_not_matter(
        readings in prop::collection::vec((10.0f64..35.0, 20.0f64..90.0, 0.0f64..20.0), 3..20),
    ) {
        let history: Vec<WeatherObservation> = readings
            .iter()
            .enumerate()
            .map(|(i, &(t, h, r))| observation("lupane", i as i64, t, h, r))
            .collect();
        let mut reversed = history.clone();
        reversed.reverse();
        let service = service_with(Arc::new(InMemoryObservationStore::new()));

        let ordered = service.analyze(history, None).unwrap();
        let shuffled = service.analyze(reversed, None).unwrap();
        prop_assert_eq!(ordered, shuffled);
    }
}
