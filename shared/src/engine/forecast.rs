//! Forward estimate and evapotranspiration

use crate::models::{
    ClimateVariable, PredictedConditions, Season, SeasonalPattern, WeatherObservation,
};

/// Project each variable `horizon_days` ahead and blend it with the current reading.
///
/// `seasonal_weight` is the share of the trend projection; the remainder is
/// persistence of the current value. A pattern without statistics carries the
/// current reading forward unchanged.
pub fn forward_estimate(
    pattern: &SeasonalPattern,
    current: &WeatherObservation,
    horizon_days: i64,
    seasonal_weight: f64,
) -> PredictedConditions {
    let estimate = |variable: ClimateVariable| -> f64 {
        let now = current.value(variable);
        if pattern.insufficient_data {
            return now;
        }
        let Some(stats) = pattern.statistics(variable) else {
            return now;
        };

        let projected = stats.mean + stats.trend * horizon_days as f64;
        let projected = match variable {
            ClimateVariable::Temperature => projected,
            ClimateVariable::Humidity => projected.clamp(0.0, 100.0),
            ClimateVariable::Precipitation => projected.max(0.0),
        };
        seasonal_weight * projected + (1.0 - seasonal_weight) * now
    };

    PredictedConditions {
        temperature_celsius: estimate(ClimateVariable::Temperature),
        humidity_percent: estimate(ClimateVariable::Humidity),
        precipitation_mm: estimate(ClimateVariable::Precipitation),
    }
}

/// Reference evapotranspiration in mm/day.
///
/// A radiation/temperature proxy in the style of Makkink, damped by humidity:
/// `0.0135 * (T + 17.8) * Rs * (1 - 0.4 * RH / 100)`, where `Rs` is the
/// season's solar radiation.
pub fn evapotranspiration(conditions: &PredictedConditions, season: Season) -> f64 {
    let humidity = conditions.humidity_percent.clamp(0.0, 100.0);
    let et = 0.0135
        * (conditions.temperature_celsius + 17.8)
        * season.solar_radiation()
        * (1.0 - 0.4 * humidity / 100.0);
    et.max(0.0)
}
