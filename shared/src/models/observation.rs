//! Weather observation models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single point-in-time weather reading for a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    /// Never negative
    pub precipitation_mm: f64,
    pub wind_speed_mps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<f64>,
}

impl WeatherObservation {
    /// Calendar date of the reading (UTC)
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Value of a tracked climate variable
    pub fn value(&self, variable: ClimateVariable) -> f64 {
        match variable {
            ClimateVariable::Temperature => self.temperature_celsius,
            ClimateVariable::Humidity => self.humidity_percent,
            ClimateVariable::Precipitation => self.precipitation_mm,
        }
    }
}

/// Climate variables tracked by the seasonal analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClimateVariable {
    Temperature,
    Humidity,
    Precipitation,
}

impl ClimateVariable {
    /// Every tracked variable, in reporting order
    pub const ALL: [ClimateVariable; 3] = [
        ClimateVariable::Temperature,
        ClimateVariable::Humidity,
        ClimateVariable::Precipitation,
    ];
}

impl std::fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClimateVariable::Temperature => write!(f, "temperature"),
            ClimateVariable::Humidity => write!(f, "humidity"),
            ClimateVariable::Precipitation => write!(f, "precipitation"),
        }
    }
}
