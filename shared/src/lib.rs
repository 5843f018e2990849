//! Shared types and the agro-climatic prediction engine
//!
//! This crate contains the domain models and the pure prediction engine shared
//! between the backend, the frontend (via WASM), and other components of the system.

pub mod engine;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use engine::{analyze, predict, Engine, EngineParameters};
pub use error::EngineError;
pub use models::*;
pub use types::*;
pub use validation::*;
