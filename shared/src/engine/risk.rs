//! Pest and disease risk rules
//!
//! Risk is looked up in ordered rule tables: the first rule whose bounds all
//! match decides the level, and no match means low risk.

use crate::models::{PredictedConditions, RiskLevel};
use crate::types::ValueRange;

/// One row of a risk table. Unset bounds always match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskRule {
    pub level: RiskLevel,
    /// Humidity must be strictly above this
    pub humidity_above: Option<f64>,
    /// Temperature must lie within this range (inclusive)
    pub temperature_within: Option<ValueRange>,
    /// Precipitation must be strictly above this
    pub precipitation_above: Option<f64>,
}

impl RiskRule {
    pub fn matches(&self, conditions: &PredictedConditions) -> bool {
        self.humidity_above
            .map_or(true, |h| conditions.humidity_percent > h)
            && self
                .temperature_within
                .map_or(true, |r| r.contains(conditions.temperature_celsius))
            && self
                .precipitation_above
                .map_or(true, |p| conditions.precipitation_mm > p)
    }
}

pub const PEST_RULES: &[RiskRule] = &[
    RiskRule {
        level: RiskLevel::High,
        humidity_above: Some(80.0),
        temperature_within: Some(ValueRange::new(20.0, 30.0)),
        precipitation_above: None,
    },
    RiskRule {
        level: RiskLevel::Medium,
        humidity_above: Some(60.0),
        temperature_within: Some(ValueRange::new(15.0, 35.0)),
        precipitation_above: None,
    },
];

pub const DISEASE_RULES: &[RiskRule] = &[
    RiskRule {
        level: RiskLevel::High,
        humidity_above: Some(85.0),
        temperature_within: Some(ValueRange::new(15.0, 30.0)),
        precipitation_above: None,
    },
    RiskRule {
        level: RiskLevel::Medium,
        humidity_above: Some(70.0),
        temperature_within: None,
        precipitation_above: None,
    },
    RiskRule {
        level: RiskLevel::Medium,
        humidity_above: None,
        temperature_within: None,
        precipitation_above: Some(10.0),
    },
];

pub fn evaluate_risk(rules: &[RiskRule], conditions: &PredictedConditions) -> RiskLevel {
    rules
        .iter()
        .find(|rule| rule.matches(conditions))
        .map(|rule| rule.level)
        .unwrap_or(RiskLevel::Low)
}

pub fn pest_risk(conditions: &PredictedConditions) -> RiskLevel {
    evaluate_risk(PEST_RULES, conditions)
}

pub fn disease_risk(conditions: &PredictedConditions) -> RiskLevel {
    evaluate_risk(DISEASE_RULES, conditions)
}
