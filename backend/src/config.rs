//! Configuration management for the Agro-Climate Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with ACP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    default_crop_profiles, validate_crop_table, validate_engine_parameters, CropProfile,
    EngineParameters,
};

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Prediction engine constants
    #[serde(default)]
    pub engine: EngineParameters,

    /// Orchestration settings for prediction runs
    pub prediction: PredictionConfig,

    /// Crop reference data
    #[serde(default)]
    pub crops: CropsConfig,

    /// Notification delivery configuration
    pub notifications: NotificationConfig,

    /// API key authentication
    pub auth: AuthConfig,

    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Days of history fetched before the current observation
    pub history_days: u64,

    /// Horizon used when a request does not specify one
    pub default_horizon_days: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CropsConfig {
    /// JSON file with a crop table; the built-in table is used when unset
    pub profiles_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Webhook receiving SMS deliveries
    pub sms_webhook_url: Option<String>,

    /// Webhook receiving push deliveries
    pub push_webhook_url: Option<String>,

    /// Request timeout for webhook deliveries in seconds
    pub timeout_secs: u64,

    /// Delivery records retained in memory
    pub history_limit: usize,

    /// In-app messages retained per recipient
    pub inbox_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Accepted bearer API keys
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Treat requests without credentials as an anonymous actor
    pub allow_anonymous: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable output
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("ACP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("prediction.history_days", 365)?
            .set_default("prediction.default_horizon_days", 7)?
            .set_default("notifications.timeout_secs", 10)?
            .set_default("notifications.history_limit", 1000)?
            .set_default("notifications.inbox_limit", 100)?
            .set_default("auth.allow_anonymous", false)?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ACP_ prefix)
            .add_source(
                Environment::with_prefix("ACP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.api_keys")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Crop table named by the configuration, or the built-in one
    pub fn load_crop_profiles(&self) -> AppResult<Vec<CropProfile>> {
        let profiles = match &self.crops.profiles_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Configuration(format!("Cannot read crop table {}: {}", path, e))
                })?;
                serde_json::from_str::<Vec<CropProfile>>(&raw).map_err(|e| {
                    AppError::Configuration(format!("Invalid crop table {}: {}", path, e))
                })?
            }
            None => default_crop_profiles(),
        };

        validate_crop_table(&profiles).map_err(|e| AppError::Configuration(e.to_string()))?;
        Ok(profiles)
    }

    /// Reject engine constants the prediction model cannot use
    pub fn validate_engine(&self) -> AppResult<()> {
        validate_engine_parameters(&self.engine)
            .map_err(|e| AppError::Configuration(format!("Invalid [engine] settings: {}", e)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            engine: EngineParameters::default(),
            prediction: PredictionConfig::default(),
            crops: CropsConfig::default(),
            notifications: NotificationConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig { json: false },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            history_days: 365,
            default_horizon_days: 7,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            sms_webhook_url: None,
            push_webhook_url: None,
            timeout_secs: 10,
            history_limit: 1000,
            inbox_limit: 100,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            allow_anonymous: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_crop_table_loads() {
        let profiles = Config::default().load_crop_profiles().unwrap();
        assert_eq!(profiles.len(), 5);
    }

    #[test]
    fn test_missing_crop_file_is_configuration_error() {
        let mut config = Config::default();
        config.crops.profiles_path = Some("/nonexistent/crops.json".to_string());
        assert!(matches!(
            config.load_crop_profiles(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_engine_settings_are_validated() {
        assert!(Config::default().validate_engine().is_ok());

        let mut config = Config::default();
        config.engine.seasonal_weight = 1.5;
        assert!(matches!(
            config.validate_engine(),
            Err(AppError::Configuration(msg)) if msg.contains("Seasonal weight")
        ));
    }

    #[test]
    fn test_invalid_engine_settings_stop_startup() {
        let mut config = Config::default();
        config.engine.anomaly_multiplier = -1.0;
        assert!(matches!(
            crate::AppState::new(config),
            Err(AppError::Configuration(_))
        ));
    }
}
