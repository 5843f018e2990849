//! HTTP handlers for the Agro-Climate Platform API

pub mod crops;
pub mod health;
pub mod notification;
pub mod observation;
pub mod prediction;

pub use crops::*;
pub use health::*;
pub use notification::*;
pub use observation::*;
pub use prediction::*;
