//! Agricultural seasons and calendar windows

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Zimbabwean agricultural seasons
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// November to March, the main rainy season
    HotWet,
    /// April to August
    CoolDry,
    /// September to October
    HotDry,
}

impl Season {
    pub fn for_month(month: u32) -> Self {
        match month {
            4..=8 => Season::CoolDry,
            9 | 10 => Season::HotDry,
            _ => Season::HotWet,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_month(date.month())
    }

    /// Whether a date of any year falls in this season
    pub fn includes(&self, date: NaiveDate) -> bool {
        Self::for_date(date) == *self
    }

    pub fn start_month(&self) -> u32 {
        match self {
            Season::HotWet => 11,
            Season::CoolDry => 4,
            Season::HotDry => 9,
        }
    }

    pub fn length_months(&self) -> u32 {
        match self {
            Season::HotWet => 5,
            Season::CoolDry => 5,
            Season::HotDry => 2,
        }
    }

    /// Mean incoming solar radiation expressed as mm/day of evaporable water
    pub fn solar_radiation(&self) -> f64 {
        match self {
            Season::HotWet => 6.0,
            Season::CoolDry => 4.5,
            Season::HotDry => 7.0,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::HotWet => write!(f, "Hot-Wet"),
            Season::CoolDry => write!(f, "Cool-Dry"),
            Season::HotDry => write!(f, "Hot-Dry"),
        }
    }
}

/// A concrete occurrence of a season, e.g. the hot-wet season of 2023/24
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonWindow {
    pub season: Season,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonWindow {
    /// The season window that contains `date`
    pub fn containing(date: NaiveDate) -> Self {
        let season = Season::for_date(date);
        let start_month = season.start_month();
        let start_year = if date.month() >= start_month {
            date.year()
        } else {
            date.year() - 1
        };

        let start = NaiveDate::from_ymd_opt(start_year, start_month, 1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(season.length_months()))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);

        Self { season, start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
