//! Observation service for ingesting and querying weather readings
//!
//! Supports:
//! - Validated ingestion of station readings
//! - Date-range history per location
//! - Latest reading per location

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use validator::Validate;

use crate::error::AppResult;
use crate::models::WeatherObservation;
use shared::DateRange;

// ============================================================================
// Traits
// ============================================================================

/// Read access to stored observations
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Observations for `location` whose date falls in `range`, oldest first
    async fn fetch_observations(
        &self,
        location: &str,
        range: DateRange,
    ) -> AppResult<Vec<WeatherObservation>>;

    /// Most recent observation for `location`
    async fn fetch_current(&self, location: &str) -> AppResult<Option<WeatherObservation>>;
}

/// Write access for ingestion
#[async_trait]
pub trait ObservationSink: Send + Sync {
    async fn store(&self, observation: WeatherObservation) -> AppResult<()>;
}

// ============================================================================
// Input Types
// ============================================================================

/// A station reading submitted for ingestion
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreObservationInput {
    #[validate(length(min = 1, max = 128))]
    pub location: String,
    pub timestamp: DateTime<Utc>,
    #[validate(range(min = -60.0, max = 60.0))]
    pub temperature_celsius: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_percent: f64,
    #[validate(range(min = 0.0))]
    pub precipitation_mm: f64,
    #[validate(range(min = 0.0))]
    pub wind_speed_mps: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub soil_moisture_percent: Option<f64>,
    #[validate(range(min = 0.0, max = 14.0))]
    pub soil_ph: Option<f64>,
}

impl From<StoreObservationInput> for WeatherObservation {
    fn from(input: StoreObservationInput) -> Self {
        WeatherObservation {
            location: input.location.trim().to_string(),
            timestamp: input.timestamp,
            temperature_celsius: input.temperature_celsius,
            humidity_percent: input.humidity_percent,
            precipitation_mm: input.precipitation_mm,
            wind_speed_mps: input.wind_speed_mps,
            soil_moisture_percent: input.soil_moisture_percent,
            soil_ph: input.soil_ph,
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Observation store keyed by location, each series kept in timestamp order
#[derive(Default)]
pub struct InMemoryObservationStore {
    series: RwLock<HashMap<String, Vec<WeatherObservation>>>,
}

impl InMemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing readings
    pub async fn with_observations(observations: Vec<WeatherObservation>) -> Self {
        let store = Self::new();
        for observation in observations {
            store.insert(observation).await;
        }
        store
    }

    async fn insert(&self, observation: WeatherObservation) {
        let mut series = self.series.write().await;
        let entries = series.entry(observation.location.clone()).or_default();
        // Readings for the same instant replace each other
        match entries.binary_search_by(|o| o.timestamp.cmp(&observation.timestamp)) {
            Ok(idx) => entries[idx] = observation,
            Err(idx) => entries.insert(idx, observation),
        }
    }

    /// Number of stored readings across all locations
    pub async fn len(&self) -> usize {
        self.series.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObservationSource for InMemoryObservationStore {
    async fn fetch_observations(
        &self,
        location: &str,
        range: DateRange,
    ) -> AppResult<Vec<WeatherObservation>> {
        let series = self.series.read().await;
        Ok(series
            .get(location)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|o| range.contains(o.date()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_current(&self, location: &str) -> AppResult<Option<WeatherObservation>> {
        let series = self.series.read().await;
        Ok(series.get(location).and_then(|entries| entries.last().cloned()))
    }
}

#[async_trait]
impl ObservationSink for InMemoryObservationStore {
    async fn store(&self, observation: WeatherObservation) -> AppResult<()> {
        tracing::debug!(
            location = %observation.location,
            timestamp = %observation.timestamp,
            "Storing observation"
        );
        self.insert(observation).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn observation(location: &str, day: i64, temp: f64) -> WeatherObservation {
        WeatherObservation {
            location: location.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::days(day),
            temperature_celsius: temp,
            humidity_percent: 55.0,
            precipitation_mm: 0.0,
            wind_speed_mps: 2.0,
            soil_moisture_percent: None,
            soil_ph: None,
        }
    }

    fn input() -> StoreObservationInput {
        StoreObservationInput {
            location: "mutare".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            temperature_celsius: 24.0,
            humidity_percent: 60.0,
            precipitation_mm: 1.2,
            wind_speed_mps: 3.0,
            soil_moisture_percent: Some(35.0),
            soil_ph: Some(6.1),
        }
    }

    #[tokio::test]
    async fn test_series_kept_in_order() {
        let store = InMemoryObservationStore::new();
        store.store(observation("bulawayo", 3, 23.0)).await.unwrap();
        store.store(observation("bulawayo", 1, 21.0)).await.unwrap();
        store.store(observation("bulawayo", 2, 22.0)).await.unwrap();

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        let history = store.fetch_observations("bulawayo", range).await.unwrap();
        let temps: Vec<f64> = history.iter().map(|o| o.temperature_celsius).collect();
        assert_eq!(temps, vec![21.0, 22.0, 23.0]);

        let current = store.fetch_current("bulawayo").await.unwrap().unwrap();
        assert_eq!(current.temperature_celsius, 23.0);
    }

    #[tokio::test]
    async fn test_same_instant_replaces_reading() {
        let store = InMemoryObservationStore::new();
        store.store(observation("bulawayo", 1, 21.0)).await.unwrap();
        store.store(observation("bulawayo", 1, 25.0)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_location_is_empty() {
        let store = InMemoryObservationStore::new();
        assert!(store.fetch_current("nowhere").await.unwrap().is_none());
        let range = DateRange::ending_at(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 30);
        assert!(store.fetch_observations("nowhere", range).await.unwrap().is_empty());
    }

    #[test]
    fn test_input_validation() {
        assert!(input().validate().is_ok());

        let mut humid = input();
        humid.humidity_percent = 101.0;
        assert!(humid.validate().is_err());

        let mut wet = input();
        wet.precipitation_mm = -2.0;
        assert!(wet.validate().is_err());

        let mut acid = input();
        acid.soil_ph = Some(15.0);
        assert!(acid.validate().is_err());

        let mut unnamed = input();
        unnamed.location = String::new();
        assert!(unnamed.validate().is_err());
    }
}
