//! Crop reference data

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::ValueRange;

/// Water requirement class of a crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaterRequirement {
    Low,
    Moderate,
    High,
}

impl WaterRequirement {
    /// Daily rainfall needed to meet the requirement without irrigation
    pub fn daily_mm(&self) -> f64 {
        match self {
            WaterRequirement::Low => 1.5,
            WaterRequirement::Moderate => 3.0,
            WaterRequirement::High => 5.0,
        }
    }
}

impl std::fmt::Display for WaterRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaterRequirement::Low => write!(f, "Low"),
            WaterRequirement::Moderate => write!(f, "Moderate"),
            WaterRequirement::High => write!(f, "High"),
        }
    }
}

/// Optimal growing conditions for a crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropProfile {
    pub name: String,
    pub optimal_temperature: ValueRange,
    pub optimal_humidity: ValueRange,
    pub water_requirement: WaterRequirement,
    pub soil_ph_tolerance: ValueRange,
    pub growth_duration_days: u32,
    /// Month (1-12) in which the crop is normally established
    pub planting_month: u32,
}

impl CropProfile {
    /// Whether `date` falls between planting and the end of the growth duration.
    ///
    /// A window planted late in one year may run into the next, so both the
    /// current and previous year's plantings are considered.
    pub fn growth_window_contains(&self, date: NaiveDate) -> bool {
        [date.year() - 1, date.year()].into_iter().any(|year| {
            let Some(start) = NaiveDate::from_ymd_opt(year, self.planting_month, 1) else {
                return false;
            };
            let Some(end) = start.checked_add_days(Days::new(u64::from(self.growth_duration_days)))
            else {
                return false;
            };
            date >= start && date < end
        })
    }
}

/// The crop table used when no other is configured.
///
/// Order matters: ties in suitability go to the earlier entry.
pub fn default_crop_profiles() -> Vec<CropProfile> {
    vec![
        CropProfile {
            name: "Maize".to_string(),
            optimal_temperature: ValueRange::new(18.0, 32.0),
            optimal_humidity: ValueRange::new(50.0, 80.0),
            water_requirement: WaterRequirement::Moderate,
            soil_ph_tolerance: ValueRange::new(5.5, 7.0),
            growth_duration_days: 120,
            planting_month: 11,
        },
        CropProfile {
            name: "Wheat".to_string(),
            optimal_temperature: ValueRange::new(12.0, 25.0),
            optimal_humidity: ValueRange::new(40.0, 70.0),
            water_requirement: WaterRequirement::Moderate,
            soil_ph_tolerance: ValueRange::new(6.0, 7.5),
            growth_duration_days: 110,
            planting_month: 5,
        },
        CropProfile {
            name: "Sorghum".to_string(),
            optimal_temperature: ValueRange::new(20.0, 35.0),
            optimal_humidity: ValueRange::new(30.0, 70.0),
            water_requirement: WaterRequirement::Low,
            soil_ph_tolerance: ValueRange::new(5.5, 8.5),
            growth_duration_days: 100,
            planting_month: 11,
        },
        CropProfile {
            name: "Cotton".to_string(),
            optimal_temperature: ValueRange::new(21.0, 35.0),
            optimal_humidity: ValueRange::new(40.0, 75.0),
            water_requirement: WaterRequirement::Moderate,
            soil_ph_tolerance: ValueRange::new(5.8, 8.0),
            growth_duration_days: 150,
            planting_month: 11,
        },
        CropProfile {
            name: "Tobacco".to_string(),
            optimal_temperature: ValueRange::new(18.0, 28.0),
            optimal_humidity: ValueRange::new(60.0, 85.0),
            water_requirement: WaterRequirement::High,
            soil_ph_tolerance: ValueRange::new(5.0, 6.5),
            growth_duration_days: 120,
            planting_month: 9,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_table_order() {
        let names: Vec<String> = default_crop_profiles().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Maize", "Wheat", "Sorghum", "Cotton", "Tobacco"]);
    }

    #[test]
    fn test_growth_window_crosses_year_end() {
        let maize = &default_crop_profiles()[0];
        assert!(maize.growth_window_contains(date(2023, 11, 1)));
        assert!(maize.growth_window_contains(date(2024, 1, 15)));
        // 120 days from 1 November ends late February
        assert!(!maize.growth_window_contains(date(2024, 3, 15)));
        assert!(!maize.growth_window_contains(date(2024, 7, 1)));
    }

    #[test]
    fn test_growth_window_same_year() {
        let wheat = &default_crop_profiles()[1];
        assert!(wheat.growth_window_contains(date(2024, 6, 1)));
        assert!(!wheat.growth_window_contains(date(2024, 4, 30)));
        assert!(!wheat.growth_window_contains(date(2024, 12, 1)));
    }

    #[test]
    fn test_water_requirement_order() {
        assert!(WaterRequirement::Low.daily_mm() < WaterRequirement::Moderate.daily_mm());
        assert!(WaterRequirement::Moderate.daily_mm() < WaterRequirement::High.daily_mm());
    }
}
