//! Business logic services for the Agro-Climate Platform

pub mod notification;
pub mod observation;
pub mod prediction;

pub use notification::{LogSender, NotificationSender, NotificationService, WebhookSender};
pub use observation::{InMemoryObservationStore, ObservationSink, ObservationSource};
pub use prediction::{InMemoryPredictionStore, PredictionService, PredictionSink};
