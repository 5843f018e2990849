//! Validation utilities for weather readings and crop reference data
//!
//! The engine trusts its inputs; these checks belong to ingestion and to
//! loading crop tables and engine constants from configuration.

use crate::engine::EngineParameters;
use crate::models::CropProfile;
use crate::types::ValueRange;

// ============================================================================
// Observation Validations
// ============================================================================

/// Validate relative humidity is a percentage
pub fn validate_humidity(humidity_percent: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&humidity_percent) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate precipitation is non-negative
pub fn validate_precipitation(precipitation_mm: f64) -> Result<(), &'static str> {
    if !precipitation_mm.is_finite() || precipitation_mm < 0.0 {
        return Err("Precipitation cannot be negative");
    }
    Ok(())
}

/// Validate soil pH is on the pH scale
pub fn validate_soil_ph(ph: f64) -> Result<(), &'static str> {
    if !(0.0..=14.0).contains(&ph) {
        return Err("Soil pH must be between 0 and 14");
    }
    Ok(())
}

/// Check if a temperature is physically plausible for a surface station
pub fn is_plausible_temperature(temperature_celsius: f64) -> bool {
    (-60.0..=60.0).contains(&temperature_celsius)
}

// ============================================================================
// Crop Table Validations
// ============================================================================

fn validate_range(range: &ValueRange) -> Result<(), &'static str> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err("Range bounds must be finite");
    }
    if range.min > range.max {
        return Err("Range minimum cannot exceed maximum");
    }
    Ok(())
}

/// Validate a single crop profile
pub fn validate_crop_profile(profile: &CropProfile) -> Result<(), &'static str> {
    if profile.name.trim().is_empty() {
        return Err("Crop name is required");
    }
    validate_range(&profile.optimal_temperature)?;
    validate_range(&profile.optimal_humidity)?;
    validate_range(&profile.soil_ph_tolerance)?;
    if profile.growth_duration_days == 0 {
        return Err("Growth duration must be at least one day");
    }
    if !(1..=12).contains(&profile.planting_month) {
        return Err("Planting month must be between 1 and 12");
    }
    Ok(())
}

/// Validate a crop table: non-empty, every profile valid, names unique
pub fn validate_crop_table(profiles: &[CropProfile]) -> Result<(), &'static str> {
    if profiles.is_empty() {
        return Err("Crop table must contain at least one profile");
    }
    for (i, profile) in profiles.iter().enumerate() {
        validate_crop_profile(profile)?;
        if profiles[..i]
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&profile.name))
        {
            return Err("Crop names must be unique");
        }
    }
    Ok(())
}

// ============================================================================
// Engine Parameter Validations
// ============================================================================

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Validate configured engine constants before they reach the engine
pub fn validate_engine_parameters(params: &EngineParameters) -> Result<(), &'static str> {
    if !(params.anomaly_multiplier.is_finite() && params.anomaly_multiplier > 0.0) {
        return Err("Anomaly multiplier must be positive");
    }
    if !(0.0..=1.0).contains(&params.seasonal_weight) {
        return Err("Seasonal weight must be between 0 and 1");
    }

    let scoring = &params.scoring;
    if !non_negative(scoring.temperature_weight) || !non_negative(scoring.humidity_weight) {
        return Err("Scoring weights cannot be negative");
    }
    if scoring.temperature_weight + scoring.humidity_weight <= 0.0 {
        return Err("At least one scoring weight must be positive");
    }
    if !non_negative(scoring.max_water_penalty) || !non_negative(scoring.soil_ph_penalty) {
        return Err("Scoring penalties cannot be negative");
    }

    let yield_model = &params.yield_model;
    if !(0.0..=100.0).contains(&yield_model.baseline_percent) {
        return Err("Yield baseline must be between 0 and 100");
    }
    if !non_negative(yield_model.max_temperature_adjustment)
        || !non_negative(yield_model.max_humidity_adjustment)
        || !non_negative(yield_model.max_precipitation_adjustment)
    {
        return Err("Yield adjustments cannot be negative");
    }

    let alerts = &params.alerts;
    if !alerts.frost_celsius.is_finite() || !alerts.extreme_heat_celsius.is_finite() {
        return Err("Temperature thresholds must be finite");
    }
    if alerts.frost_celsius >= alerts.extreme_heat_celsius {
        return Err("Frost threshold must be below the extreme heat threshold");
    }
    validate_humidity(alerts.high_humidity_percent)?;
    validate_precipitation(alerts.heavy_rainfall_mm)?;
    validate_precipitation(alerts.dry_precipitation_mm)?;
    Ok(())
}
