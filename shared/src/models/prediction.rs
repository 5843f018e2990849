//! Agro-climatic prediction models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::WeatherAlert;

/// Pest or disease risk level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Point estimates of the weather on the target date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictedConditions {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub precipitation_mm: f64,
}

/// Suitability of one crop for the predicted conditions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropScore {
    pub crop: String,
    /// 0-100
    pub score: f64,
}

/// Result of a prediction run for one location and target date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgroClimaticPrediction {
    pub location: String,
    pub target_date: NaiveDate,
    pub horizon_days: i64,
    pub predicted_temperature_celsius: f64,
    pub predicted_humidity_percent: f64,
    pub predicted_precipitation_mm: f64,
    pub evapotranspiration_mm: f64,
    pub crop_recommendation: String,
    /// Scores for every profile, in profile declaration order
    pub crop_scores: Vec<CropScore>,
    pub pest_risk: RiskLevel,
    pub disease_risk: RiskLevel,
    /// 0-100
    pub yield_prediction_percent: f64,
    pub alerts: Vec<WeatherAlert>,
    /// Set when the seasonal pattern lacked data and current values were carried forward
    pub used_persistence_fallback: bool,
}
