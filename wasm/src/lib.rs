//! WebAssembly module for the Agro-Climate Platform
//!
//! Provides client-side computation for:
//! - Seasonal pattern analysis
//! - Agro-climatic predictions
//! - Season lookup
//! - Offline observation validation
//!
//! Every function takes and returns JSON strings; failures surface as JS `Error`s.

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use shared::{
    analyze, default_crop_profiles as builtin_crop_profiles, is_plausible_temperature, predict,
    validate_humidity, validate_precipitation, validate_soil_ph, CropProfile, SeasonWindow,
    SeasonalPattern, WeatherObservation,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log("agro-climate engine loaded");
}

fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

fn js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

/// Seasonal pattern for a JSON array of observations.
///
/// An empty `season_json` selects the season containing the latest observation.
/// Observations dated outside the season window are ignored.
#[wasm_bindgen]
pub fn analyze_observations(observations_json: &str, season_json: &str) -> Result<String, JsValue> {
    analyze_json(observations_json, season_json).map_err(js_error)
}

/// Prediction from a pattern and the current observation.
///
/// An empty `crops_json` uses the built-in crop table.
#[wasm_bindgen]
pub fn predict_conditions(
    pattern_json: &str,
    current_json: &str,
    horizon_days: i32,
    crops_json: &str,
) -> Result<String, JsValue> {
    predict_json(pattern_json, current_json, horizon_days, crops_json).map_err(js_error)
}

/// Built-in crop table as JSON
#[wasm_bindgen]
pub fn default_crop_profiles() -> Result<String, JsValue> {
    serde_json::to_string(&builtin_crop_profiles()).map_err(|e| js_error(e.to_string()))
}

/// Season window containing an ISO-8601 date, as JSON
#[wasm_bindgen]
pub fn season_for_date(date: &str) -> Result<String, JsValue> {
    season_json_for(date).map_err(js_error)
}

/// Check a single observation before queueing it for upload
#[wasm_bindgen]
pub fn validate_observation(observation_json: &str) -> Result<(), JsValue> {
    validate_observation_json(observation_json).map_err(js_error)
}

// ============================================================================
// JSON plumbing
// ============================================================================

fn analyze_json(observations_json: &str, season_json: &str) -> Result<String, String> {
    let mut observations: Vec<WeatherObservation> = serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))?;
    observations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let season = if season_json.trim().is_empty() {
        observations
            .last()
            .map(|o| SeasonWindow::containing(o.date()))
            .ok_or_else(|| "A season window is required when no observations are given".to_string())?
    } else {
        serde_json::from_str::<SeasonWindow>(season_json)
            .map_err(|e| format!("Invalid season JSON: {}", e))?
    };
    observations.retain(|o| season.contains(o.date()));

    let pattern = analyze(&observations, &season);
    if pattern.insufficient_data {
        log(&format!(
            "insufficient history: {} samples for {}",
            pattern.sample_count, season.season
        ));
    }
    serde_json::to_string(&pattern).map_err(|e| e.to_string())
}

fn predict_json(
    pattern_json: &str,
    current_json: &str,
    horizon_days: i32,
    crops_json: &str,
) -> Result<String, String> {
    let pattern: SeasonalPattern =
        serde_json::from_str(pattern_json).map_err(|e| format!("Invalid pattern JSON: {}", e))?;
    let current: WeatherObservation = serde_json::from_str(current_json)
        .map_err(|e| format!("Invalid observation JSON: {}", e))?;
    let crops: Vec<CropProfile> = if crops_json.trim().is_empty() {
        builtin_crop_profiles()
    } else {
        serde_json::from_str(crops_json).map_err(|e| format!("Invalid crop table JSON: {}", e))?
    };

    let prediction = predict(&pattern, &current, i64::from(horizon_days), &crops)
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&prediction).map_err(|e| e.to_string())
}

fn season_json_for(date: &str) -> Result<String, String> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {}: {}", date, e))?;
    serde_json::to_string(&SeasonWindow::containing(date)).map_err(|e| e.to_string())
}

fn validate_observation_json(observation_json: &str) -> Result<(), String> {
    let observation: WeatherObservation = serde_json::from_str(observation_json)
        .map_err(|e| format!("Invalid observation JSON: {}", e))?;

    if observation.location.trim().is_empty() {
        return Err("Location is required".to_string());
    }
    if !is_plausible_temperature(observation.temperature_celsius) {
        return Err("Temperature is outside the plausible range".to_string());
    }
    validate_humidity(observation.humidity_percent)?;
    validate_precipitation(observation.precipitation_mm)?;
    if let Some(ph) = observation.soil_ph {
        validate_soil_ph(ph)?;
    }
    Ok(())
}
