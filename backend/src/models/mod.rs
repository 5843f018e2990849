//! Backend models for the Agro-Climate Platform
//!
//! Re-exports engine models from the shared crate and adds the records the
//! server keeps: stored predictions, subscribers and notification deliveries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use shared::models::*;

/// A prediction run persisted by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Observations that entered the seasonal analysis
    pub history_samples: usize,
    pub prediction: AgroClimaticPrediction,
}

impl PredictionRecord {
    pub fn new(prediction: AgroClimaticPrediction, history_samples: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            history_samples,
            prediction,
        }
    }
}

/// Delivery channel for alert notifications
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Sms,
    Push,
    InApp,
}

impl NotificationChannel {
    /// Channels an alert of the given severity is routed to
    pub fn for_severity(severity: AlertSeverity) -> &'static [NotificationChannel] {
        match severity {
            AlertSeverity::Critical | AlertSeverity::High => &[
                NotificationChannel::Sms,
                NotificationChannel::Push,
                NotificationChannel::InApp,
            ],
            AlertSeverity::Medium => &[NotificationChannel::Push, NotificationChannel::InApp],
            AlertSeverity::Low => &[NotificationChannel::InApp],
        }
    }
}

impl std::fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationChannel::Sms => write!(f, "sms"),
            NotificationChannel::Push => write!(f, "push"),
            NotificationChannel::InApp => write!(f, "in_app"),
        }
    }
}

/// Outcome of a single delivery attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Failed,
}

/// A recipient of alerts for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub recipient: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether this subscriber can be reached on `channel`
    pub fn accepts(&self, channel: NotificationChannel) -> bool {
        match channel {
            NotificationChannel::Sms => self.phone_number.is_some(),
            NotificationChannel::Push => self.push_token.is_some(),
            NotificationChannel::InApp => true,
        }
    }

    /// Address used when delivering on `channel`
    pub fn address(&self, channel: NotificationChannel) -> &str {
        match channel {
            NotificationChannel::Sms => self.phone_number.as_deref().unwrap_or(&self.recipient),
            NotificationChannel::Push => self.push_token.as_deref().unwrap_or(&self.recipient),
            NotificationChannel::InApp => &self.recipient,
        }
    }
}

/// Log entry for one delivery attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub recipient: String,
    pub channel: NotificationChannel,
    pub severity: AlertSeverity,
    pub title: String,
    pub status: NotificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Message kept in a recipient's in-app inbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InAppNotification {
    pub id: Uuid,
    pub recipient: String,
    pub location: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub effective_date: chrono::NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscriber(phone: Option<&str>, token: Option<&str>) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            recipient: "farmer-1".to_string(),
            location: "harare".to_string(),
            phone_number: phone.map(str::to_string),
            push_token: token.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_severity_routing() {
        assert_eq!(NotificationChannel::for_severity(AlertSeverity::Critical).len(), 3);
        assert_eq!(NotificationChannel::for_severity(AlertSeverity::High).len(), 3);
        assert_eq!(
            NotificationChannel::for_severity(AlertSeverity::Medium),
            &[NotificationChannel::Push, NotificationChannel::InApp]
        );
        assert_eq!(
            NotificationChannel::for_severity(AlertSeverity::Low),
            &[NotificationChannel::InApp]
        );
    }

    #[test]
    fn test_subscriber_contact_requirements() {
        let bare = subscriber(None, None);
        assert!(!bare.accepts(NotificationChannel::Sms));
        assert!(!bare.accepts(NotificationChannel::Push));
        assert!(bare.accepts(NotificationChannel::InApp));

        let full = subscriber(Some("+263771000000"), Some("tok-1"));
        assert!(full.accepts(NotificationChannel::Sms));
        assert_eq!(full.address(NotificationChannel::Sms), "+263771000000");
        assert_eq!(full.address(NotificationChannel::Push), "tok-1");
    }

    #[test]
    fn test_channel_serialization() {
        assert_eq!(serde_json::to_string(&NotificationChannel::InApp).unwrap(), "\"in_app\"");
        assert_eq!(NotificationChannel::Sms.to_string(), "sms");
    }
}
