//! Outbound messaging to academies over email, SMS, WhatsApp and push.
//!
//! Services never call a gateway directly: they enqueue one outbox job per channel and
//! the outbox worker delivers it through a [`MessageGateway`]. The message types double
//! as the persisted job payloads.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::server::{error::messaging::MessagingError, model::notification::NotificationPriority};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// SMS or WhatsApp text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub to: String,
    pub body: String,
    pub priority: NotificationPriority,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Push notification to a user's registered devices.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub recipient_type: String,
    pub recipient_id: i32,
    pub title: String,
    pub body: String,
    pub priority: NotificationPriority,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), MessagingError>;

    async fn send_sms(&self, message: &TextMessage) -> Result<(), MessagingError>;

    async fn send_whatsapp(&self, message: &TextMessage) -> Result<(), MessagingError>;

    async fn send_push(&self, message: &PushMessage) -> Result<(), MessagingError>;
}
