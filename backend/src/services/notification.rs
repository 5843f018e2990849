//! Notification service for delivering weather alerts
//!
//! Supports:
//! - Subscriptions per location
//! - Severity-based channel routing (sms, push, in-app)
//! - Webhook delivery for sms and push
//! - In-app inbox per recipient
//! - Bounded delivery log

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::config::NotificationConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    InAppNotification, NotificationChannel, NotificationRecord, NotificationStatus, Subscription,
    WeatherAlert,
};

// ============================================================================
// Senders
// ============================================================================

/// A rendered alert addressed to one subscriber on one channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutgoingMessage {
    pub channel: NotificationChannel,
    pub severity: shared::AlertSeverity,
    pub recipient: String,
    pub address: String,
    pub title: String,
    pub message: String,
}

/// Delivery mechanism for a single channel
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> AppResult<()>;
}

/// Sender that only records deliveries in the log
#[derive(Debug, Clone, Default)]
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, message: &OutgoingMessage) -> AppResult<()> {
        tracing::info!(
            channel = %message.channel,
            severity = %message.severity,
            recipient = %message.recipient,
            "Notification: {}",
            message.title
        );
        Ok(())
    }
}

/// Webhook request body
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    channel: NotificationChannel,
    severity: shared::AlertSeverity,
    recipient: &'a str,
    address: &'a str,
    title: &'a str,
    message: &'a str,
}

/// Sender that POSTs each message as JSON to a gateway URL
#[derive(Clone)]
pub struct WebhookSender {
    client: reqwest::Client,
    url: String,
}

impl WebhookSender {
    pub fn new(url: String, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    async fn send(&self, message: &OutgoingMessage) -> AppResult<()> {
        let payload = WebhookPayload {
            channel: message.channel,
            severity: message.severity,
            recipient: &message.recipient,
            address: &message.address,
            title: &message.title,
            message: &message.message,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Webhook error: {} - {}",
                status, body
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Input Types
// ============================================================================

/// Subscription request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeInput {
    #[validate(length(min = 1, max = 128))]
    pub recipient: String,
    #[validate(length(min = 1, max = 128))]
    pub location: String,
    #[validate(length(min = 6, max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1))]
    pub push_token: Option<String>,
}

// ============================================================================
// Service
// ============================================================================

/// Delivery records kept before the oldest are dropped
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// In-app messages kept per recipient
pub const DEFAULT_INBOX_LIMIT: usize = 100;

#[derive(Default)]
struct NotificationState {
    subscriptions: Vec<Subscription>,
    inbox: HashMap<String, VecDeque<InAppNotification>>,
    log: VecDeque<NotificationRecord>,
}

/// Notification service shared across handlers and prediction runs
#[derive(Clone)]
pub struct NotificationService {
    sms: Arc<dyn NotificationSender>,
    push: Arc<dyn NotificationSender>,
    state: Arc<RwLock<NotificationState>>,
    history_limit: usize,
    inbox_limit: usize,
}

impl NotificationService {
    /// Create a service with explicit sms and push senders
    pub fn new(sms: Arc<dyn NotificationSender>, push: Arc<dyn NotificationSender>) -> Self {
        Self {
            sms,
            push,
            state: Arc::new(RwLock::new(NotificationState::default())),
            history_limit: DEFAULT_HISTORY_LIMIT,
            inbox_limit: DEFAULT_INBOX_LIMIT,
        }
    }

    /// Override how many delivery records and inbox messages are retained
    pub fn with_limits(mut self, history_limit: usize, inbox_limit: usize) -> Self {
        self.history_limit = history_limit.max(1);
        self.inbox_limit = inbox_limit.max(1);
        self
    }

    /// Webhook senders where a URL is configured, log senders otherwise
    pub fn from_config(config: &NotificationConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let sender = |url: &Option<String>| -> AppResult<Arc<dyn NotificationSender>> {
            let sender: Arc<dyn NotificationSender> = match url {
                Some(url) => Arc::new(WebhookSender::new(url.clone(), timeout)?),
                None => Arc::new(LogSender),
            };
            Ok(sender)
        };
        Ok(Self::new(
            sender(&config.sms_webhook_url)?,
            sender(&config.push_webhook_url)?,
        )
        .with_limits(config.history_limit, config.inbox_limit))
    }

    /// Register a recipient for alerts at a location
    pub async fn subscribe(&self, input: SubscribeInput) -> AppResult<Subscription> {
        input.validate()?;

        let recipient = required(&input.recipient, "recipient")?;
        let location = required(&input.location, "location")?;

        let subscription = Subscription {
            id: Uuid::new_v4(),
            recipient,
            location,
            phone_number: input.phone_number,
            push_token: input.push_token,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        // One subscription per recipient and location
        state.subscriptions.retain(|s| {
            !(s.recipient == subscription.recipient && s.location == subscription.location)
        });
        state.subscriptions.push(subscription.clone());

        tracing::info!(
            recipient = %subscription.recipient,
            location = %subscription.location,
            "Subscription registered"
        );
        Ok(subscription)
    }

    pub async fn subscriptions_for(&self, location: &str) -> Vec<Subscription> {
        let state = self.state.read().await;
        state
            .subscriptions
            .iter()
            .filter(|s| s.location == location)
            .cloned()
            .collect()
    }

    /// Deliver each alert to every subscriber of its location.
    ///
    /// Failed deliveries are logged and recorded, and never stop the
    /// remaining ones. Returns the records written by this call.
    pub async fn notify(&self, alerts: &[WeatherAlert]) -> Vec<NotificationRecord> {
        let mut records = Vec::new();

        for alert in alerts {
            let subscribers = self.subscriptions_for(&alert.location).await;
            if subscribers.is_empty() {
                tracing::debug!(location = %alert.location, "No subscribers for alert: {}", alert.title);
                continue;
            }

            for subscriber in &subscribers {
                for &channel in NotificationChannel::for_severity(alert.severity) {
                    if !subscriber.accepts(channel) {
                        continue;
                    }
                    let record = self.deliver(alert, subscriber, channel).await;
                    records.push(record);
                }
            }
        }

        if !records.is_empty() {
            let mut state = self.state.write().await;
            state.log.extend(records.iter().cloned());
            let excess = state.log.len().saturating_sub(self.history_limit);
            state.log.drain(..excess);
        }
        records
    }

    async fn deliver(
        &self,
        alert: &WeatherAlert,
        subscriber: &Subscription,
        channel: NotificationChannel,
    ) -> NotificationRecord {
        let message = OutgoingMessage {
            channel,
            severity: alert.severity,
            recipient: subscriber.recipient.clone(),
            address: subscriber.address(channel).to_string(),
            title: alert.title.clone(),
            message: format!("{} ({}, {})", alert.condition, alert.location, alert.effective_date),
        };

        let result = match channel {
            NotificationChannel::Sms => self.sms.send(&message).await,
            NotificationChannel::Push => self.push.send(&message).await,
            NotificationChannel::InApp => {
                self.push_to_inbox(alert, &subscriber.recipient).await;
                Ok(())
            }
        };

        let (status, error_message) = match result {
            Ok(()) => (NotificationStatus::Sent, None),
            Err(e) => {
                tracing::warn!(
                    channel = %channel,
                    recipient = %subscriber.recipient,
                    "Failed to deliver notification: {}",
                    e
                );
                (NotificationStatus::Failed, Some(e.to_string()))
            }
        };

        NotificationRecord {
            id: Uuid::new_v4(),
            recipient: subscriber.recipient.clone(),
            channel,
            severity: alert.severity,
            title: alert.title.clone(),
            status,
            error_message,
            created_at: Utc::now(),
        }
    }

    async fn push_to_inbox(&self, alert: &WeatherAlert, recipient: &str) {
        let notification = InAppNotification {
            id: Uuid::new_v4(),
            recipient: recipient.to_string(),
            location: alert.location.clone(),
            severity: alert.severity,
            title: alert.title.clone(),
            message: alert.condition.clone(),
            effective_date: alert.effective_date,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        let messages = state.inbox.entry(recipient.to_string()).or_default();
        messages.push_front(notification);
        messages.truncate(self.inbox_limit);
    }

    /// In-app notifications for a recipient, newest first
    pub async fn inbox(&self, recipient: &str) -> Vec<InAppNotification> {
        let state = self.state.read().await;
        state
            .inbox
            .get(recipient)
            .map(|messages| messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Most recent delivery records, oldest first
    pub async fn history(&self) -> Vec<NotificationRecord> {
        self.state.read().await.log.iter().cloned().collect()
    }
}

/// Trimmed value of a required text field
fn required(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation {
            field: field.to_string(),
            message: format!("{} must not be blank", field),
        });
    }
    Ok(trimmed.to_string())
}
