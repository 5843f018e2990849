//! Threshold alert rules
//!
//! Alerts are defined as data: each rule pairs a predicate over the predicted
//! conditions with an alert template. Every matching rule fires, in table order.

use chrono::NaiveDate;

use super::params::AlertThresholds;
use crate::models::{AlertKind, AlertSeverity, PredictedConditions, WeatherAlert};

/// Inputs visible to alert predicates
#[derive(Debug, Clone, Copy)]
pub struct AlertContext<'a> {
    pub conditions: &'a PredictedConditions,
    pub thresholds: &'a AlertThresholds,
    /// Whether the target date lies in the recommended crop's growth window
    pub in_growth_window: bool,
}

pub struct AlertRule {
    pub kind: AlertKind,
    pub title: &'static str,
    pub severity: AlertSeverity,
    pub triggered: fn(&AlertContext<'_>) -> bool,
    pub describe: fn(&AlertContext<'_>) -> String,
}

pub const ALERT_RULES: &[AlertRule] = &[
    AlertRule {
        kind: AlertKind::ExtremeHeat,
        title: "Extreme Heat Warning",
        severity: AlertSeverity::High,
        triggered: is_extreme_heat,
        describe: describe_heat,
    },
    AlertRule {
        kind: AlertKind::Frost,
        title: "Frost Risk Alert",
        severity: AlertSeverity::High,
        triggered: is_frost,
        describe: describe_frost,
    },
    AlertRule {
        kind: AlertKind::HighHumidity,
        title: "High Humidity Alert",
        severity: AlertSeverity::Medium,
        triggered: is_high_humidity,
        describe: describe_humidity,
    },
    AlertRule {
        kind: AlertKind::HeavyRainfall,
        title: "Heavy Rainfall Warning",
        severity: AlertSeverity::High,
        triggered: is_heavy_rainfall,
        describe: describe_rainfall,
    },
    AlertRule {
        kind: AlertKind::Irrigation,
        title: "Irrigation Reminder",
        severity: AlertSeverity::Medium,
        triggered: needs_irrigation,
        describe: describe_irrigation,
    },
];

fn is_extreme_heat(ctx: &AlertContext<'_>) -> bool {
    ctx.conditions.temperature_celsius > ctx.thresholds.extreme_heat_celsius
}

fn describe_heat(ctx: &AlertContext<'_>) -> String {
    format!(
        "Predicted temperature {:.1}°C exceeds {:.1}°C",
        ctx.conditions.temperature_celsius, ctx.thresholds.extreme_heat_celsius
    )
}

fn is_frost(ctx: &AlertContext<'_>) -> bool {
    ctx.conditions.temperature_celsius < ctx.thresholds.frost_celsius
}

fn describe_frost(ctx: &AlertContext<'_>) -> String {
    format!(
        "Predicted temperature {:.1}°C is below {:.1}°C",
        ctx.conditions.temperature_celsius, ctx.thresholds.frost_celsius
    )
}

fn is_high_humidity(ctx: &AlertContext<'_>) -> bool {
    ctx.conditions.humidity_percent > ctx.thresholds.high_humidity_percent
}

fn describe_humidity(ctx: &AlertContext<'_>) -> String {
    format!(
        "Predicted humidity {:.0}% exceeds {:.0}%",
        ctx.conditions.humidity_percent, ctx.thresholds.high_humidity_percent
    )
}

fn is_heavy_rainfall(ctx: &AlertContext<'_>) -> bool {
    ctx.conditions.precipitation_mm > ctx.thresholds.heavy_rainfall_mm
}

fn describe_rainfall(ctx: &AlertContext<'_>) -> String {
    format!(
        "Predicted rainfall {:.1}mm exceeds {:.1}mm",
        ctx.conditions.precipitation_mm, ctx.thresholds.heavy_rainfall_mm
    )
}

fn needs_irrigation(ctx: &AlertContext<'_>) -> bool {
    ctx.in_growth_window && ctx.conditions.precipitation_mm < ctx.thresholds.dry_precipitation_mm
}

fn describe_irrigation(ctx: &AlertContext<'_>) -> String {
    format!(
        "No rainfall expected ({:.1}mm) during the active growth window",
        ctx.conditions.precipitation_mm
    )
}

/// Evaluate every rule and emit an alert for each one that fires
pub fn evaluate_alerts(
    rules: &[AlertRule],
    ctx: &AlertContext<'_>,
    location: &str,
    effective_date: NaiveDate,
) -> Vec<WeatherAlert> {
    rules
        .iter()
        .filter(|rule| (rule.triggered)(ctx))
        .map(|rule| WeatherAlert {
            kind: rule.kind,
            title: rule.title.to_string(),
            severity: rule.severity,
            condition: (rule.describe)(ctx),
            location: location.to_string(),
            effective_date,
        })
        .collect()
}
