//! Seasonal pattern models

use serde::{Deserialize, Serialize};

use super::{ClimateVariable, SeasonWindow, WeatherObservation};

/// Aggregate statistics for one climate variable over a season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VariableStatistics {
    pub mean: f64,
    /// Population standard deviation, never negative
    pub std_dev: f64,
    /// Least-squares slope per observation step
    pub trend: f64,
}

impl VariableStatistics {
    /// Signed distance from the mean in standard deviations, `None` when the
    /// series has no spread
    pub fn deviation_sigmas(&self, value: f64) -> Option<f64> {
        if self.std_dev <= f64::EPSILON {
            return None;
        }
        Some((value - self.mean) / self.std_dev)
    }

    pub fn is_anomaly(&self, value: f64, multiplier: f64) -> bool {
        self.deviation_sigmas(value)
            .map(|sigmas| sigmas.abs() > multiplier)
            .unwrap_or(false)
    }
}

/// An observation whose value lies unusually far from the seasonal mean
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Anomaly {
    pub variable: ClimateVariable,
    pub value: f64,
    pub deviation_sigmas: f64,
    pub observation: WeatherObservation,
}

/// Seasonal statistics derived from a historical observation series.
///
/// When the series is shorter than the minimum sample count every statistic
/// is `None` and `insufficient_data` is set; values are never computed from
/// too few samples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonalPattern {
    pub location: Option<String>,
    pub season: SeasonWindow,
    pub sample_count: usize,
    pub insufficient_data: bool,
    pub temperature: Option<VariableStatistics>,
    pub humidity: Option<VariableStatistics>,
    pub precipitation: Option<VariableStatistics>,
    pub anomalies: Vec<Anomaly>,
}

impl SeasonalPattern {
    /// A degraded pattern carrying no statistics
    pub fn insufficient(location: Option<String>, season: SeasonWindow, sample_count: usize) -> Self {
        Self {
            location,
            season,
            sample_count,
            insufficient_data: true,
            temperature: None,
            humidity: None,
            precipitation: None,
            anomalies: Vec::new(),
        }
    }

    pub fn statistics(&self, variable: ClimateVariable) -> Option<&VariableStatistics> {
        match variable {
            ClimateVariable::Temperature => self.temperature.as_ref(),
            ClimateVariable::Humidity => self.humidity.as_ref(),
            ClimateVariable::Precipitation => self.precipitation.as_ref(),
        }
    }

    pub fn anomalies_for(&self, variable: ClimateVariable) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(move |a| a.variable == variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_beyond_two_sigma() {
        let stats = VariableStatistics {
            mean: 25.0,
            std_dev: 2.0,
            trend: 0.0,
        };
        assert_eq!(stats.deviation_sigmas(30.0), Some(2.5));
        assert!(stats.is_anomaly(30.0, 2.0));
        assert!(stats.is_anomaly(20.0, 2.0));
        assert!(!stats.is_anomaly(26.0, 2.0));
        assert!(!stats.is_anomaly(29.0, 2.0));
    }

    #[test]
    fn test_flat_series_has_no_anomalies() {
        let stats = VariableStatistics {
            mean: 10.0,
            std_dev: 0.0,
            trend: 0.0,
        };
        assert_eq!(stats.deviation_sigmas(50.0), None);
        assert!(!stats.is_anomaly(50.0, 2.0));
    }
}
