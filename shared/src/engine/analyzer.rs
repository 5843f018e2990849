//! Seasonal pattern analysis
//!
//! Aggregates a chronologically ordered observation series into per-variable
//! mean, population standard deviation and least-squares trend, and flags
//! observations that sit too far from the seasonal mean.

use crate::models::{
    Anomaly, ClimateVariable, SeasonWindow, SeasonalPattern, VariableStatistics,
    WeatherObservation,
};

/// Analyze observations already filtered to `season`.
///
/// Observations must be in chronological order; the trend is fitted against
/// position in the slice, not against timestamps.
pub fn analyze_series(
    observations: &[WeatherObservation],
    season: &SeasonWindow,
    min_samples: usize,
    anomaly_multiplier: f64,
) -> SeasonalPattern {
    let location = observations.first().map(|o| o.location.clone());

    // A slope needs at least two points
    if observations.len() < min_samples.max(2) {
        return SeasonalPattern::insufficient(location, *season, observations.len());
    }

    let stats = |variable: ClimateVariable| {
        let values: Vec<f64> = observations.iter().map(|o| o.value(variable)).collect();
        variable_statistics(&values)
    };
    let mut pattern = SeasonalPattern {
        location,
        season: *season,
        sample_count: observations.len(),
        insufficient_data: false,
        temperature: Some(stats(ClimateVariable::Temperature)),
        humidity: Some(stats(ClimateVariable::Humidity)),
        precipitation: Some(stats(ClimateVariable::Precipitation)),
        anomalies: Vec::new(),
    };

    for variable in ClimateVariable::ALL {
        let Some(stats) = pattern.statistics(variable).copied() else {
            continue;
        };
        for observation in observations {
            let value = observation.value(variable);
            if !stats.is_anomaly(value, anomaly_multiplier) {
                continue;
            }
            if let Some(deviation_sigmas) = stats.deviation_sigmas(value) {
                pattern.anomalies.push(Anomaly {
                    variable,
                    value,
                    deviation_sigmas,
                    observation: observation.clone(),
                });
            }
        }
    }

    pattern
}

/// Mean, population standard deviation and index-based OLS slope.
///
/// Callers guarantee at least two values.
fn variable_statistics(values: &[f64]) -> VariableStatistics {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    VariableStatistics {
        mean,
        std_dev: variance.max(0.0).sqrt(),
        trend: least_squares_slope(values),
    }
}

/// Slope of `values` regressed on their index
pub fn least_squares_slope(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let x_diff = i as f64 - x_mean;
        numerator += x_diff * (y - y_mean);
        denominator += x_diff * x_diff;
    }

    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }
    numerator / denominator
}
