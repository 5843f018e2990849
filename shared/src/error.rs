//! Errors raised by the prediction engine

use thiserror::Error;

/// Precondition violations; the engine rejects the call instead of computing around them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("At least one crop profile is required")]
    EmptyCropProfiles,

    #[error("Forecast horizon must not be negative (got {0} days)")]
    NegativeHorizon(i64),

    #[error("Forecast horizon of {0} days is outside the supported date range")]
    HorizonOutOfRange(i64),
}
