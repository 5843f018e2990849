//! Tunable engine constants
//!
//! Every field defaults to the value the platform has always shipped with, and
//! missing fields fall back to those defaults when deserialized from config.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    /// Below this many observations no statistics are computed
    pub min_samples: usize,
    /// Observations further than this many standard deviations from the mean are anomalies
    pub anomaly_multiplier: f64,
    /// Share of the seasonal projection in the forward estimate; the rest is the current value
    pub seasonal_weight: f64,
    pub scoring: ScoringWeights,
    pub yield_model: YieldParameters,
    pub alerts: AlertThresholds,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            min_samples: 3,
            anomaly_multiplier: 2.0,
            seasonal_weight: 0.7,
            scoring: ScoringWeights::default(),
            yield_model: YieldParameters::default(),
            alerts: AlertThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub temperature_weight: f64,
    pub humidity_weight: f64,
    /// Points lost when there is no rain at all against the crop's requirement
    pub max_water_penalty: f64,
    /// Points lost when the measured soil pH is outside the crop's tolerance
    pub soil_ph_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            temperature_weight: 0.6,
            humidity_weight: 0.4,
            max_water_penalty: 20.0,
            soil_ph_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldParameters {
    pub baseline_percent: f64,
    pub max_temperature_adjustment: f64,
    pub max_humidity_adjustment: f64,
    pub max_precipitation_adjustment: f64,
}

impl Default for YieldParameters {
    fn default() -> Self {
        Self {
            baseline_percent: 70.0,
            max_temperature_adjustment: 20.0,
            max_humidity_adjustment: 10.0,
            max_precipitation_adjustment: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub extreme_heat_celsius: f64,
    pub frost_celsius: f64,
    pub high_humidity_percent: f64,
    pub heavy_rainfall_mm: f64,
    /// Rainfall below this counts as a dry day
    pub dry_precipitation_mm: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            extreme_heat_celsius: 35.0,
            frost_celsius: 5.0,
            high_humidity_percent: 85.0,
            heavy_rainfall_mm: 20.0,
            dry_precipitation_mm: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let params: EngineParameters =
            serde_json::from_str(r#"{"seasonal_weight": 0.5, "alerts": {"frost_celsius": 2.0}}"#)
                .unwrap();
        assert_eq!(params.seasonal_weight, 0.5);
        assert_eq!(params.alerts.frost_celsius, 2.0);
        assert_eq!(params.alerts.extreme_heat_celsius, 35.0);
        assert_eq!(params.min_samples, 3);
        assert_eq!(params.yield_model, YieldParameters::default());
    }
}
