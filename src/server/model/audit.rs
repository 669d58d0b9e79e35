//! Audit trail domain models.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

use crate::model::audit::AuditTrailDto;

/// Entity type recorded for payout account audit entries.
pub const PAYOUT_ACCOUNT_ENTITY: &str = "payout_account";

/// Entity type recorded for outbox audit entries.
pub const OUTBOX_EVENT_ENTITY: &str = "outbox_event";

/// Kind of state-changing action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    PayoutAccountCreated,
    BankDetailsUpdated,
    PayoutStatusChanged,
    PayoutAccountActivated,
    PayoutAccountRejected,
    OutboxEventRequeued,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PayoutAccountCreated => "payout_account_created",
            Self::BankDetailsUpdated => "payout_bank_details_updated",
            Self::PayoutStatusChanged => "payout_status_changed",
            Self::PayoutAccountActivated => "payout_account_activated",
            Self::PayoutAccountRejected => "payout_account_rejected",
            Self::OutboxEventRequeued => "outbox_event_requeued",
        }
    }

    /// Default severity for the action.
    pub fn scale(&self) -> AuditScale {
        match self {
            Self::PayoutAccountCreated | Self::BankDetailsUpdated => AuditScale::High,
            Self::PayoutStatusChanged | Self::OutboxEventRequeued => AuditScale::Medium,
            Self::PayoutAccountActivated | Self::PayoutAccountRejected => AuditScale::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditScale {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Who triggered an action and from where.
///
/// Built by controllers from the session user and request headers. Background triggers
/// use [`AuditContext::system`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditContext {
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditContext {
    /// Context for actions with no human actor (workers, pollers).
    pub fn system() -> Self {
        Self::default()
    }

    /// Builds the context for an HTTP request.
    ///
    /// The client IP is the first entry of `X-Forwarded-For`, falling back to
    /// `X-Real-IP`.
    ///
    /// # Arguments
    /// - `user_id` - Authenticated user performing the action
    /// - `headers` - Request headers
    pub fn from_headers(user_id: i32, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let ip_address = header("x-forwarded-for")
            .and_then(|value| {
                value
                    .split(',')
                    .next()
                    .map(|ip| ip.trim().to_string())
                    .filter(|ip| !ip.is_empty())
            })
            .or_else(|| header("x-real-ip"));

        Self {
            user_id: Some(user_id),
            ip_address,
            user_agent: header("user-agent"),
        }
    }
}

/// One audit trail entry to append.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub scale: AuditScale,
    pub description: String,
    pub entity_type: String,
    pub entity_id: String,
    pub metadata: serde_json::Value,
    pub context: AuditContext,
}

impl AuditEntry {
    /// Entry about a payout account using the action's default scale.
    pub fn payout_account(
        action: AuditAction,
        payout_account_id: &str,
        description: impl Into<String>,
        metadata: serde_json::Value,
        context: AuditContext,
    ) -> Self {
        Self {
            action,
            scale: action.scale(),
            description: description.into(),
            entity_type: PAYOUT_ACCOUNT_ENTITY.to_string(),
            entity_id: payout_account_id.to_string(),
            metadata,
            context,
        }
    }
}

/// Stored audit trail entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub id: i32,
    pub action_type: String,
    pub scale: String,
    pub description: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: Option<i32>,
    pub metadata: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn from_entity(entity: entity::audit_trail::Model) -> Self {
        Self {
            id: entity.id,
            action_type: entity.action_type,
            scale: entity.scale,
            description: entity.description,
            entity_type: entity.entity_type,
            entity_id: entity.entity_id,
            user_id: entity.user_id,
            metadata: entity.metadata,
            ip_address: entity.ip_address,
            user_agent: entity.user_agent,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> AuditTrailDto {
        AuditTrailDto {
            id: self.id,
            action_type: self.action_type,
            scale: self.scale,
            description: self.description,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            user_id: self.user_id,
            metadata: self.metadata,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: self.created_at,
        }
    }
}
