//! Yield impact estimate

use super::params::YieldParameters;
use crate::models::{CropProfile, PredictedConditions};
use crate::types::ValueRange;

/// Adjustment for distance from the range midpoint: `+max` at the midpoint,
/// zero at the edge, `-max` at twice the half-width and beyond.
pub fn deviation_adjustment(value: f64, range: &ValueRange, max: f64) -> f64 {
    let half_width = range.half_width();
    let normalized = if half_width > 0.0 {
        (value - range.midpoint()).abs() / half_width
    } else if value == range.midpoint() {
        0.0
    } else {
        2.0
    };
    (max * (1.0 - normalized)).clamp(-max, max)
}

/// Adjustment for rainfall against the crop's daily need: `-max` with no
/// rain, rising linearly to `+max` once the need is met.
pub fn precipitation_adjustment(profile: &CropProfile, precipitation_mm: f64, max: f64) -> f64 {
    let required = profile.water_requirement.daily_mm();
    let adequacy = if required > 0.0 {
        (precipitation_mm / required).clamp(0.0, 1.0)
    } else {
        1.0
    };
    max * (2.0 * adequacy - 1.0)
}

/// Expected yield as a percentage of potential, clamped to [0, 100]
pub fn predict_yield(
    profile: &CropProfile,
    conditions: &PredictedConditions,
    params: &YieldParameters,
) -> f64 {
    let total = params.baseline_percent
        + deviation_adjustment(
            conditions.temperature_celsius,
            &profile.optimal_temperature,
            params.max_temperature_adjustment,
        )
        + deviation_adjustment(
            conditions.humidity_percent,
            &profile.optimal_humidity,
            params.max_humidity_adjustment,
        )
        + precipitation_adjustment(
            profile,
            conditions.precipitation_mm,
            params.max_precipitation_adjustment,
        );

    total.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_crop_profiles;

    fn conditions(temp: f64, humidity: f64, rain: f64) -> PredictedConditions {
        PredictedConditions {
            temperature_celsius: temp,
            humidity_percent: humidity,
            precipitation_mm: rain,
        }
    }

    #[test]
    fn test_deviation_adjustment_shape() {
        let range = ValueRange::new(18.0, 32.0);
        assert_eq!(deviation_adjustment(25.0, &range, 20.0), 20.0);
        assert_eq!(deviation_adjustment(32.0, &range, 20.0), 0.0);
        assert_eq!(deviation_adjustment(39.0, &range, 20.0), -20.0);
        assert_eq!(deviation_adjustment(60.0, &range, 20.0), -20.0);
    }

    #[test]
    fn test_precipitation_adjustment() {
        let maize = &default_crop_profiles()[0];
        assert_eq!(precipitation_adjustment(maize, 0.0, 15.0), -15.0);
        assert_eq!(precipitation_adjustment(maize, 1.5, 15.0), 0.0);
        assert_eq!(precipitation_adjustment(maize, 3.0, 15.0), 15.0);
        assert_eq!(precipitation_adjustment(maize, 30.0, 15.0), 15.0);
    }

    #[test]
    fn test_ideal_conditions_cap_at_100() {
        let maize = &default_crop_profiles()[0];
        // 70 + 20 + 10 + 15 = 115 before clamping
        let yield_pct = predict_yield(maize, &conditions(25.0, 65.0, 5.0), &YieldParameters::default());
        assert_eq!(yield_pct, 100.0);
    }

    #[test]
    fn test_hostile_conditions() {
        let maize = &default_crop_profiles()[0];
        // 70 - 20 - 10 - 15 = 25
        let yield_pct = predict_yield(maize, &conditions(-10.0, 5.0, 0.0), &YieldParameters::default());
        assert!((yield_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_edges_are_neutral() {
        let maize = &default_crop_profiles()[0];
        // edges contribute zero; rainfall at half the need is also neutral
        let yield_pct = predict_yield(maize, &conditions(32.0, 80.0, 1.5), &YieldParameters::default());
        assert!((yield_pct - 70.0).abs() < 1e-9);
    }
}
