//! Notification domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recipient type of academy-facing notifications.
pub const ACADEMY_RECIPIENT: &str = "academy";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Delivery channel of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Push,
    Email,
    Sms,
    WhatsApp,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Self::Push, Self::Email, Self::Sms, Self::WhatsApp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Email => "email",
            Self::Sms => "sms",
            Self::WhatsApp => "whatsapp",
        }
    }
}

/// Payout account event the academy is told about.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    AccountCreated,
    BankDetailsUpdated,
    Activated,
    /// Carries the outstanding requirements.
    ActionRequired(Vec<String>),
    /// Carries the provider's rejection reason, if any.
    Rejected(Option<String>),
}

impl NotificationKind {
    /// Machine-readable type stored in notification data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountCreated => "payout_account_created",
            Self::BankDetailsUpdated => "payout_bank_details_updated",
            Self::Activated => "payout_account_activated",
            Self::ActionRequired(_) => "payout_account_action_required",
            Self::Rejected(_) => "payout_account_rejected",
        }
    }

    pub fn priority(&self) -> NotificationPriority {
        match self {
            Self::Activated | Self::ActionRequired(_) | Self::Rejected(_) => {
                NotificationPriority::High
            }
            Self::AccountCreated | Self::BankDetailsUpdated => NotificationPriority::Medium,
        }
    }
}

/// Contact details of the recipient on each channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Row to insert into the in-app inbox.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_type: String,
    pub recipient_id: i32,
    pub title: String,
    pub body: String,
    pub priority: NotificationPriority,
    pub data: serde_json::Value,
}

/// Stored in-app notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub recipient_type: String,
    pub recipient_id: i32,
    pub title: String,
    pub body: String,
    pub priority: String,
    pub data: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_entity(entity: entity::notification::Model) -> Self {
        Self {
            id: entity.id,
            recipient_type: entity.recipient_type,
            recipient_id: entity.recipient_id,
            title: entity.title,
            body: entity.body,
            priority: entity.priority,
            data: entity.data,
            read: entity.read,
            created_at: entity.created_at,
        }
    }
}
