//! Property tests for the prediction engine
//!
//! - Determinism of analyze and predict
//! - Yield and suitability bounds
//! - Recommendation is the first maximal score
//! - Insufficient-data fallback

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use shared::engine::crop_scoring::score_crop;
use shared::engine::ScoringWeights;
use shared::{
    analyze, default_crop_profiles, predict, EngineError, PredictedConditions, SeasonWindow,
    WeatherObservation,
};

fn season() -> SeasonWindow {
    SeasonWindow::containing(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
}

fn observation(day: i64, reading: (f64, f64, f64), soil_ph: Option<f64>) -> WeatherObservation {
    let (temperature_celsius, humidity_percent, precipitation_mm) = reading;
    WeatherObservation {
        location: "gweru".to_string(),
        timestamp: Utc.with_ymd_and_hms(2023, 12, 1, 6, 0, 0).unwrap() + Duration::days(day),
        temperature_celsius,
        humidity_percent,
        precipitation_mm,
        wind_speed_mps: 3.5,
        soil_moisture_percent: None,
        soil_ph,
    }
}

/// Strategy for generating a (temperature, humidity, precipitation) reading
fn reading_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
    (-15.0f64..45.0, 0.0f64..100.0, 0.0f64..60.0)
}

fn history_strategy() -> impl Strategy<Value = Vec<WeatherObservation>> {
    prop::collection::vec(reading_strategy(), 0..40).prop_map(|readings| {
        readings
            .into_iter()
            .enumerate()
            .map(|(i, r)| observation(i as i64, r, None))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_analyze_and_predict_are_deterministic(
        history in history_strategy(),
        now in reading_strategy(),
        horizon in 0i64..60,
    ) {
        let first = analyze(&history, &season());
        let second = analyze(&history, &season());
        prop_assert_eq!(&first, &second);

        let current = observation(50, now, Some(6.0));
        let profiles = default_crop_profiles();
        let a = predict(&first, &current, horizon, &profiles).unwrap();
        let b = predict(&second, &current, horizon, &profiles).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_yield_and_scores_are_bounded(
        history in history_strategy(),
        now in reading_strategy(),
        horizon in 0i64..120,
        soil_ph in prop::option::of(3.0f64..10.0),
    ) {
        let pattern = analyze(&history, &season());
        let current = observation(50, now, soil_ph);
        let prediction = predict(&pattern, &current, horizon, &default_crop_profiles()).unwrap();

        prop_assert!((0.0..=100.0).contains(&prediction.yield_prediction_percent));
        for score in &prediction.crop_scores {
            prop_assert!((0.0..=100.0).contains(&score.score));
        }
        prop_assert!(prediction.evapotranspiration_mm >= 0.0);
    }

    #[test]
    fn prop_recommendation_is_first_maximum(
        history in history_strategy(),
        now in reading_strategy(),
    ) {
        let pattern = analyze(&history, &season());
        let prediction = predict(&pattern, &observation(50, now, None), 7, &default_crop_profiles()).unwrap();

        let max = prediction
            .crop_scores
            .iter()
            .map(|s| s.score)
            .fold(f64::NEG_INFINITY, f64::max);
        let first_max = prediction
            .crop_scores
            .iter()
            .find(|s| s.score == max)
            .map(|s| s.crop.clone());
        prop_assert_eq!(Some(prediction.crop_recommendation.clone()), first_max);
    }

    #[test]
    fn prop_score_is_bounded_for_any_profile(
        temp in -40.0f64..60.0,
        humidity in -20.0f64..120.0,
        rain in 0.0f64..200.0,
    ) {
        let conditions = PredictedConditions {
            temperature_celsius: temp,
            humidity_percent: humidity,
            precipitation_mm: rain,
        };
        for profile in default_crop_profiles() {
            let score = score_crop(&profile, &conditions, Some(6.0), &ScoringWeights::default());
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn prop_short_history_carries_current_forward(
        history in prop::collection::vec(reading_strategy(), 0..3),
        now in reading_strategy(),
        horizon in 0i64..90,
    ) {
        let history: Vec<WeatherObservation> = history
            .into_iter()
            .enumerate()
            .map(|(i, r)| observation(i as i64, r, None))
            .collect();
        let pattern = analyze(&history, &season());
        prop_assert!(pattern.insufficient_data);
        prop_assert!(pattern.temperature.is_none());
        prop_assert!(pattern.humidity.is_none());
        prop_assert!(pattern.precipitation.is_none());

        let current = observation(10, now, None);
        let prediction = predict(&pattern, &current, horizon, &default_crop_profiles()).unwrap();
        prop_assert_eq!(prediction.predicted_temperature_celsius, current.temperature_celsius);
        prop_assert_eq!(prediction.predicted_humidity_percent, current.humidity_percent);
        prop_assert_eq!(prediction.predicted_precipitation_mm, current.precipitation_mm);
    }

    #[test]
    fn prop_negative_horizon_is_rejected(horizon in -365i64..0) {
        let pattern = analyze(&[], &season());
        let result = predict(&pattern, &observation(0, (20.0, 50.0, 1.0), None), horizon, &default_crop_profiles());
        prop_assert_eq!(result, Err(EngineError::NegativeHorizon(horizon)));
    }
}
