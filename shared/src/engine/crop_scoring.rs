//! Crop suitability scoring

use super::params::ScoringWeights;
use crate::models::{CropProfile, CropScore, PredictedConditions};
use crate::types::ValueRange;

/// How centrally `value` sits in `range`: 1.0 at the midpoint, falling
/// linearly to 0.0 at either edge and staying 0.0 beyond.
pub fn range_fit(value: f64, range: &ValueRange) -> f64 {
    let half_width = range.half_width();
    if half_width <= 0.0 {
        return if value == range.midpoint() { 1.0 } else { 0.0 };
    }
    let distance = (value - range.midpoint()).abs() / half_width;
    (1.0 - distance).clamp(0.0, 1.0)
}

/// Fraction (0-1) of the crop's daily water need that rainfall does not cover
pub fn water_shortfall(profile: &CropProfile, precipitation_mm: f64) -> f64 {
    let required = profile.water_requirement.daily_mm();
    if required <= 0.0 {
        return 0.0;
    }
    ((required - precipitation_mm) / required).clamp(0.0, 1.0)
}

/// Suitability score in [0, 100]
pub fn score_crop(
    profile: &CropProfile,
    conditions: &PredictedConditions,
    soil_ph: Option<f64>,
    weights: &ScoringWeights,
) -> f64 {
    let total_weight = weights.temperature_weight + weights.humidity_weight;
    let fit = if total_weight > 0.0 {
        (weights.temperature_weight
            * range_fit(conditions.temperature_celsius, &profile.optimal_temperature)
            + weights.humidity_weight
                * range_fit(conditions.humidity_percent, &profile.optimal_humidity))
            / total_weight
    } else {
        0.0
    };

    let mut score = 100.0 * fit;
    score -= weights.max_water_penalty * water_shortfall(profile, conditions.precipitation_mm);

    if let Some(ph) = soil_ph {
        if !profile.soil_ph_tolerance.contains(ph) {
            score -= weights.soil_ph_penalty;
        }
    }

    score.clamp(0.0, 100.0)
}

/// Score every profile, keeping declaration order
pub fn rank_crops(
    profiles: &[CropProfile],
    conditions: &PredictedConditions,
    soil_ph: Option<f64>,
    weights: &ScoringWeights,
) -> Vec<CropScore> {
    profiles
        .iter()
        .map(|profile| CropScore {
            crop: profile.name.clone(),
            score: score_crop(profile, conditions, soil_ph, weights),
        })
        .collect()
}

/// Index of the highest score; the first listed wins a tie
pub fn best_index(scores: &[CropScore]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, candidate) in scores.iter().enumerate() {
        match best {
            Some(b) if candidate.score <= scores[b].score => {}
            _ => best = Some(i),
        }
    }
    best
}
