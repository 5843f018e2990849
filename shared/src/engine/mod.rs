//! Agro-climatic prediction engine
//!
//! Two pure steps evaluated per location and target date:
//! - [`Engine::analyze`] turns a historical series into a [`SeasonalPattern`]
//! - [`Engine::predict`] turns a pattern plus the current reading into an
//!   [`AgroClimaticPrediction`] with crop ranking, risk levels, yield and alerts
//!
//! Neither step reads the clock or performs I/O, so identical inputs always
//! produce identical outputs and calls can run concurrently without coordination.

pub mod alerts;
pub mod analyzer;
pub mod crop_scoring;
pub mod forecast;
pub mod params;
pub mod risk;
pub mod yield_model;

use chrono::Days;

pub use params::{AlertThresholds, EngineParameters, ScoringWeights, YieldParameters};

use crate::error::EngineError;
use crate::models::{
    AgroClimaticPrediction, CropProfile, SeasonWindow, SeasonalPattern, WeatherObservation,
};

/// Prediction engine configured with a set of [`EngineParameters`]
#[derive(Debug, Clone, Default)]
pub struct Engine {
    params: EngineParameters,
}

impl Engine {
    pub fn new(params: EngineParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &EngineParameters {
        &self.params
    }

    /// Seasonal statistics for observations already filtered to `season`,
    /// in chronological order
    pub fn analyze(&self, observations: &[WeatherObservation], season: &SeasonWindow) -> SeasonalPattern {
        analyzer::analyze_series(
            observations,
            season,
            self.params.min_samples,
            self.params.anomaly_multiplier,
        )
    }

    /// Forward prediction `horizon_days` after the current observation.
    ///
    /// Rejects an empty crop table or a negative horizon. Extreme but
    /// well-typed readings are never rejected; they show up as risk and alerts.
    pub fn predict(
        &self,
        pattern: &SeasonalPattern,
        current: &WeatherObservation,
        horizon_days: i64,
        crop_profiles: &[CropProfile],
    ) -> Result<AgroClimaticPrediction, EngineError> {
        if crop_profiles.is_empty() {
            return Err(EngineError::EmptyCropProfiles);
        }
        if horizon_days < 0 {
            return Err(EngineError::NegativeHorizon(horizon_days));
        }

        let target_date = current
            .date()
            .checked_add_days(Days::new(horizon_days as u64))
            .ok_or(EngineError::HorizonOutOfRange(horizon_days))?;

        let conditions = forecast::forward_estimate(
            pattern,
            current,
            horizon_days,
            self.params.seasonal_weight,
        );
        let evapotranspiration = forecast::evapotranspiration(&conditions, pattern.season.season);

        let crop_scores =
            crop_scoring::rank_crops(crop_profiles, &conditions, current.soil_ph, &self.params.scoring);
        let best = crop_scoring::best_index(&crop_scores).unwrap_or(0);
        let crop = &crop_profiles[best];

        let ctx = alerts::AlertContext {
            conditions: &conditions,
            thresholds: &self.params.alerts,
            in_growth_window: crop.growth_window_contains(target_date),
        };
        let alerts = alerts::evaluate_alerts(alerts::ALERT_RULES, &ctx, &current.location, target_date);

        Ok(AgroClimaticPrediction {
            location: current.location.clone(),
            target_date,
            horizon_days,
            predicted_temperature_celsius: conditions.temperature_celsius,
            predicted_humidity_percent: conditions.humidity_percent,
            predicted_precipitation_mm: conditions.precipitation_mm,
            evapotranspiration_mm: evapotranspiration,
            crop_recommendation: crop.name.clone(),
            crop_scores,
            pest_risk: risk::pest_risk(&conditions),
            disease_risk: risk::disease_risk(&conditions),
            yield_prediction_percent: yield_model::predict_yield(
                crop,
                &conditions,
                &self.params.yield_model,
            ),
            alerts,
            used_persistence_fallback: pattern.insufficient_data,
        })
    }
}

/// [`Engine::analyze`] with default parameters
pub fn analyze(observations: &[WeatherObservation], season: &SeasonWindow) -> SeasonalPattern {
    Engine::default().analyze(observations, season)
}

/// [`Engine::predict`] with default parameters
pub fn predict(
    pattern: &SeasonalPattern,
    current: &WeatherObservation,
    horizon_days: i64,
    crop_profiles: &[CropProfile],
) -> Result<AgroClimaticPrediction, EngineError> {
    Engine::default().predict(pattern, current, horizon_days, crop_profiles)
}
