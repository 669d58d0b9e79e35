use chrono::{Duration, Utc};
use sea_orm::EntityTrait;
use serde_json::json;
use std::sync::Arc;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::{outbox::OutboxRepository, payout_account::PayoutAccountRepository},
    error::AppError,
    messaging::{mock::RecordingMessageGateway, EmailMessage},
    model::{
        audit::{AuditContext, OUTBOX_EVENT_ENTITY},
        notification::NotificationKind,
        outbox::{BankDetailsUpdateJob, NewOutboxEvent, OutboxJob, StakeholderCreateJob, EMAIL_KIND},
        payout_account::{BankInformation, StakeholderData},
    },
    provider::mock::{MockPaymentProvider, MOCK_PRODUCT_ID, MOCK_STAKEHOLDER_ID},
    service::{
        audit::AuditService,
        notification::NotificationService,
        outbox::{
            dispatcher::{base_retry_delay, OutboxDispatcher},
            OutboxService,
        },
    },
};

mod retry_event;

fn email_job() -> OutboxJob {
    OutboxJob::Email(EmailMessage {
        to: "asha@riverside.example".to_string(),
        subject: "Your payout account is active".to_string(),
        body: "Good news!".to_string(),
        metadata: json!({}),
    })
}
