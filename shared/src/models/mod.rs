//! Domain models for the agro-climatic prediction platform

mod alert;
mod crop;
mod observation;
mod pattern;
mod prediction;
mod season;

pub use alert::*;
pub use crop::*;
pub use observation::*;
pub use pattern::*;
pub use prediction::*;
pub use season::*;
