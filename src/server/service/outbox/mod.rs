//! Durable background job queue.
//!
//! Side effects that talk to the outside world (stakeholder registration, bank details
//! submission, notification delivery) are persisted as outbox events and executed by
//! [`dispatcher::OutboxDispatcher`] from the worker, with retries and dead-lettering.

pub mod dispatcher;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use crate::server::{
    data::outbox::OutboxRepository,
    error::AppError,
    model::{
        audit::{AuditAction, AuditContext, AuditEntry, OUTBOX_EVENT_ENTITY},
        outbox::{
            BankDetailsUpdateJob, NewOutboxEvent, OutboxJob, OutboxState, StakeholderCreateJob,
        },
    },
    service::audit::AuditService,
};

pub struct OutboxService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OutboxService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a job for the worker, due immediately.
    ///
    /// # Returns
    /// - `Ok(String)` - ID of the queued event
    /// - `Err(AppError::InternalErr)` - Job payload couldn't be encoded
    /// - `Err(AppError::DbErr)` - Insert failed
    pub async fn enqueue(&self, job: OutboxJob) -> Result<String, AppError> {
        let repo = OutboxRepository::new(self.db);

        let event = repo
            .enqueue(NewOutboxEvent {
                id: Uuid::new_v4().to_string(),
                kind: job.kind().to_string(),
                payload: job.payload()?,
                next_attempt_at: Utc::now(),
            })
            .await?;

        tracing::debug!(event_id = %event.id, kind = %event.kind, "Queued outbox event");

        Ok(event.id)
    }

    /// Queues stakeholder registration for a linked account.
    pub async fn enqueue_stakeholder_create(
        &self,
        job: StakeholderCreateJob,
    ) -> Result<String, AppError> {
        self.enqueue(OutboxJob::StakeholderCreate(job)).await
    }

    /// Queues submission of bank details to the provider.
    pub async fn enqueue_bank_details_update(
        &self,
        job: BankDetailsUpdateJob,
    ) -> Result<String, AppError> {
        self.enqueue(OutboxJob::BankDetailsUpdate(job)).await
    }

    /// Puts a dead-lettered event back in the queue.
    ///
    /// # Arguments
    /// - `id` - Outbox event ID
    /// - `context` - Administrator requesting the retry
    ///
    /// # Returns
    /// - `Ok(Model)` - The re-queued event
    /// - `Err(AppError::NotFound)` - No such event
    /// - `Err(AppError::Conflict)` - Event is still queued or already processed
    pub async fn retry_event(
        &self,
        id: &str,
        context: AuditContext,
    ) -> Result<entity::outbox_event::Model, AppError> {
        let repo = OutboxRepository::new(self.db);

        let Some(event) = repo.find_by_id(id).await? else {
            return Err(AppError::NotFound("Outbox event not found".to_string()));
        };

        let state = OutboxState::of(&event);
        if state != OutboxState::DeadLettered || !repo.requeue(id, Utc::now()).await? {
            return Err(AppError::Conflict(format!(
                "Outbox event is {} and can't be retried",
                state.as_str()
            )));
        }

        AuditService::new(self.db)
            .record(AuditEntry {
                action: AuditAction::OutboxEventRequeued,
                scale: AuditAction::OutboxEventRequeued.scale(),
                description: format!("Re-queued dead-lettered {} job", event.kind),
                entity_type: OUTBOX_EVENT_ENTITY.to_string(),
                entity_id: event.id.clone(),
                metadata: json!({
                    "kind": event.kind,
                    "attempts": event.attempts,
                    "last_error": event.last_error,
                }),
                context,
            })
            .await;

        repo.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Outbox event not found".to_string()))
    }
}
