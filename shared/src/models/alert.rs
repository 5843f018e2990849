//! Weather alert models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "low"),
            AlertSeverity::Medium => write!(f, "medium"),
            AlertSeverity::High => write!(f, "high"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Types of weather alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ExtremeHeat,
    Frost,
    HighHumidity,
    HeavyRainfall,
    Irrigation,
}

/// A threshold-triggered alert for a location and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAlert {
    pub kind: AlertKind,
    pub title: String,
    pub severity: AlertSeverity,
    /// Human-readable description of the triggering condition
    pub condition: String,
    pub location: String,
    pub effective_date: NaiveDate,
}
