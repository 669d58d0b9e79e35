//! Notification fan-out for payout account events.
//!
//! One event becomes four independent deliveries (push, email, SMS, WhatsApp) to the
//! account's KYC contact. Deliveries are enqueued in the outbox rather than sent inline,
//! so a gateway outage delays them instead of losing them. The push channel also stores
//! an in-app notification. Each channel is handled on its own: a failure is logged with the
//! channel and account, and the remaining channels still go out.

pub mod template;

use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::server::{
    data::notification::NotificationRepository,
    error::AppError,
    messaging::{EmailMessage, PushMessage, TextMessage},
    model::{
        notification::{
            Channel, NewNotification, NotificationKind, NotificationPriority, Recipient,
            ACADEMY_RECIPIENT,
        },
        outbox::OutboxJob,
        payout_account::PayoutAccount,
    },
    service::{notification::template::RenderedNotification, outbox::OutboxService},
};

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Notifies the academy behind `account` on every channel.
    ///
    /// Never fails: per-channel failures are logged.
    ///
    /// # Arguments
    /// - `account` - Account the event is about; its KYC contact is the recipient
    /// - `kind` - Event to notify about
    pub async fn notify_payout_account(&self, account: &PayoutAccount, kind: NotificationKind) {
        let recipient = Recipient {
            user_id: account.user_id,
            name: account.kyc_details.contact_name.clone(),
            email: account.kyc_details.email.clone(),
            phone: account.kyc_details.phone.clone(),
        };
        let rendered = template::render(
            &kind,
            &recipient.name,
            &account.kyc_details.legal_business_name,
        );
        let priority = kind.priority();
        let data = json!({
            "type": kind.as_str(),
            "payout_account_id": account.id,
            "activation_status": account.activation_status.as_str(),
        });

        for channel in Channel::ALL {
            let result = self
                .deliver(channel, &recipient, &rendered, priority, &data)
                .await;

            if let Err(e) = result {
                tracing::warn!(
                    channel = channel.as_str(),
                    notification = kind.as_str(),
                    payout_account_id = %account.id,
                    error = %e,
                    "Failed to queue payout notification"
                );
            }
        }
    }

    async fn deliver(
        &self,
        channel: Channel,
        recipient: &Recipient,
        rendered: &RenderedNotification,
        priority: NotificationPriority,
        data: &serde_json::Value,
    ) -> Result<(), AppError> {
        let outbox = OutboxService::new(self.db);

        let job = match channel {
            Channel::Push => {
                NotificationRepository::new(self.db)
                    .create(NewNotification {
                        recipient_type: ACADEMY_RECIPIENT.to_string(),
                        recipient_id: recipient.user_id,
                        title: rendered.title.clone(),
                        body: rendered.body.clone(),
                        priority,
                        data: data.clone(),
                    })
                    .await?;

                OutboxJob::Push(PushMessage {
                    recipient_type: ACADEMY_RECIPIENT.to_string(),
                    recipient_id: recipient.user_id,
                    title: rendered.title.clone(),
                    body: rendered.body.clone(),
                    priority,
                    data: data.clone(),
                })
            }
            Channel::Email => OutboxJob::Email(EmailMessage {
                to: recipient.email.clone(),
                subject: rendered.email_subject.clone(),
                body: rendered.email_body.clone(),
                metadata: data.clone(),
            }),
            Channel::Sms => OutboxJob::Sms(TextMessage {
                to: recipient.phone.clone(),
                body: rendered.text.clone(),
                priority,
                metadata: data.clone(),
            }),
            Channel::WhatsApp => OutboxJob::WhatsApp(TextMessage {
                to: recipient.phone.clone(),
                body: rendered.text.clone(),
                priority,
                metadata: data.clone(),
            }),
        };

        outbox.enqueue(job).await?;

        Ok(())
    }
}
