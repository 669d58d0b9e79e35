//! Background job models persisted in the outbox.
//!
//! Every job is stored as a `kind` string plus a JSON payload. `OutboxJob` is the typed
//! view of that pair used when enqueueing and dispatching.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    model::outbox::OutboxEventDto,
    server::{
        error::internal::InternalError,
        messaging::{EmailMessage, PushMessage, TextMessage},
        model::payout_account::{BankInformation, StakeholderData},
    },
};

pub const STAKEHOLDER_CREATE_KIND: &str = "payout.stakeholder_create";
pub const BANK_DETAILS_UPDATE_KIND: &str = "payout.bank_details_update";
pub const EMAIL_KIND: &str = "notify.email";
pub const SMS_KIND: &str = "notify.sms";
pub const WHATSAPP_KIND: &str = "notify.whatsapp";
pub const PUSH_KIND: &str = "notify.push";

/// Registers a stakeholder against a linked account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StakeholderCreateJob {
    /// Provider linked account id.
    pub account_id: String,
    pub stakeholder_data: StakeholderData,
    pub payout_account_id: String,
    /// Whether the stakeholder was derived from the KYC contact.
    pub auto_created: bool,
    /// Set once the provider has registered the stakeholder, so a retry only stores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakeholder_id: Option<String>,
}

/// Submits settlement bank details for a product configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BankDetailsUpdateJob {
    /// Provider linked account id.
    pub account_id: String,
    pub product_config_id: String,
    pub bank_details: BankInformation,
    pub payout_account_id: String,
    /// Set once the provider has accepted the details, so a retry skips resubmitting.
    #[serde(default)]
    pub settlement_submitted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboxJob {
    StakeholderCreate(StakeholderCreateJob),
    BankDetailsUpdate(BankDetailsUpdateJob),
    Email(EmailMessage),
    Sms(TextMessage),
    WhatsApp(TextMessage),
    Push(PushMessage),
}

impl OutboxJob {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StakeholderCreate(_) => STAKEHOLDER_CREATE_KIND,
            Self::BankDetailsUpdate(_) => BANK_DETAILS_UPDATE_KIND,
            Self::Email(_) => EMAIL_KIND,
            Self::Sms(_) => SMS_KIND,
            Self::WhatsApp(_) => WHATSAPP_KIND,
            Self::Push(_) => PUSH_KIND,
        }
    }

    /// Encodes the job body for storage.
    pub fn payload(&self) -> Result<serde_json::Value, InternalError> {
        let encoded = match self {
            Self::StakeholderCreate(job) => serde_json::to_value(job),
            Self::BankDetailsUpdate(job) => serde_json::to_value(job),
            Self::Email(message) => serde_json::to_value(message),
            Self::Sms(message) | Self::WhatsApp(message) => serde_json::to_value(message),
            Self::Push(message) => serde_json::to_value(message),
        };

        encoded.map_err(|source| InternalError::JobPayload {
            kind: self.kind().to_string(),
            source,
        })
    }

    /// Decodes a stored `kind`/`payload` pair.
    ///
    /// # Returns
    /// - `Ok(OutboxJob)` - Known kind with a well-formed payload
    /// - `Err(InternalError::UnknownJobKind)` - No job matches `kind`
    /// - `Err(InternalError::JobPayload)` - Payload doesn't match the kind's shape
    pub fn from_parts(kind: &str, payload: serde_json::Value) -> Result<Self, InternalError> {
        match kind {
            STAKEHOLDER_CREATE_KIND => decode(kind, payload).map(Self::StakeholderCreate),
            BANK_DETAILS_UPDATE_KIND => decode(kind, payload).map(Self::BankDetailsUpdate),
            EMAIL_KIND => decode(kind, payload).map(Self::Email),
            SMS_KIND => decode(kind, payload).map(Self::Sms),
            WHATSAPP_KIND => decode(kind, payload).map(Self::WhatsApp),
            PUSH_KIND => decode(kind, payload).map(Self::Push),
            other => Err(InternalError::UnknownJobKind(other.to_string())),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: &str, payload: serde_json::Value) -> Result<T, InternalError> {
    serde_json::from_value(payload).map_err(|source| InternalError::JobPayload {
        kind: kind.to_string(),
        source,
    })
}

/// Row to insert into the outbox.
#[derive(Debug, Clone)]
pub struct NewOutboxEvent {
    pub id: String,
    pub kind: String,
    pub payload: serde_json::Value,
    pub next_attempt_at: DateTime<Utc>,
}

/// Where a stored event is in its delivery lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxState {
    Queued,
    Processed,
    DeadLettered,
}

impl OutboxState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processed => "processed",
            Self::DeadLettered => "dead_lettered",
        }
    }

    pub fn of(event: &entity::outbox_event::Model) -> Self {
        if event.processed_at.is_some() {
            Self::Processed
        } else if event.failed_at.is_some() {
            Self::DeadLettered
        } else {
            Self::Queued
        }
    }
}

/// Converts a stored event to its admin-facing representation.
pub fn outbox_event_dto(event: entity::outbox_event::Model) -> OutboxEventDto {
    OutboxEventDto {
        state: OutboxState::of(&event).as_str().to_string(),
        id: event.id,
        kind: event.kind,
        attempts: event.attempts,
        last_error: event.last_error,
        created_at: event.created_at,
        next_attempt_at: event.next_attempt_at,
        processed_at: event.processed_at,
        failed_at: event.failed_at,
    }
}
