//! Execution of due outbox events.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::{
    data::outbox::OutboxRepository,
    error::AppError,
    messaging::MessageGateway,
    model::{
        audit::AuditContext,
        outbox::{BankDetailsUpdateJob, OutboxJob, StakeholderCreateJob},
    },
    provider::PaymentProvider,
    service::payout_account::{sync::ReconcileTrigger, PayoutAccountService},
};

/// Events claimed per run.
pub const BATCH_SIZE: u64 = 50;

/// How long a claimed event stays invisible to other workers.
const LEASE_SECONDS: i64 = 300;

const BASE_RETRY_SECONDS: i64 = 30;
const MAX_RETRY_SECONDS: i64 = 3600;

/// Outcome counts of one worker run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutboxRunStats {
    pub processed: usize,
    pub retried: usize,
    pub dead_lettered: usize,
    /// Due events another worker claimed first.
    pub skipped: usize,
}

/// Delay before the retry following attempt number `attempts`, without jitter.
///
/// 30 s after the first failure, doubling per failure, capped at one hour.
pub fn base_retry_delay(attempts: i32) -> Duration {
    let exponent = attempts.saturating_sub(1).clamp(0, 16) as u32;
    let seconds = BASE_RETRY_SECONDS
        .saturating_mul(2_i64.saturating_pow(exponent))
        .min(MAX_RETRY_SECONDS);

    Duration::seconds(seconds)
}

/// [`base_retry_delay`] plus up to 10% random jitter.
pub fn retry_delay(attempts: i32) -> Duration {
    let base = base_retry_delay(attempts);
    let max_jitter_ms = base.num_milliseconds() / 10;
    let jitter_ms = rand::rng().random_range(0..=max_jitter_ms);

    base + Duration::milliseconds(jitter_ms)
}

pub struct OutboxDispatcher<'a> {
    db: &'a DatabaseConnection,
    provider: Arc<dyn PaymentProvider>,
    gateway: Arc<dyn MessageGateway>,
    max_attempts: i32,
}

impl<'a> OutboxDispatcher<'a> {
    /// Creates a dispatcher.
    ///
    /// # Arguments
    /// - `db` - Database connection
    /// - `provider` - Payment provider for payout jobs
    /// - `gateway` - Messaging gateway for notification jobs
    /// - `max_attempts` - Attempts after which an event is dead-lettered
    pub fn new(
        db: &'a DatabaseConnection,
        provider: Arc<dyn PaymentProvider>,
        gateway: Arc<dyn MessageGateway>,
        max_attempts: i32,
    ) -> Self {
        Self {
            db,
            provider,
            gateway,
            max_attempts,
        }
    }

    /// Claims and executes up to [`BATCH_SIZE`] due events.
    ///
    /// Successful events are marked processed. A failed event gets its attempt counter
    /// bumped and is rescheduled with exponential backoff, or dead-lettered once it has
    /// used `max_attempts`. Events whose payload can't be decoded are dead-lettered
    /// straight away since retrying can't fix them.
    ///
    /// # Arguments
    /// - `now` - Reference time for due-ness and scheduling
    ///
    /// # Returns
    /// - `Ok(OutboxRunStats)` - Counts per outcome
    /// - `Err(AppError::DbErr)` - Failed to read or update the outbox
    pub async fn process_due(&self, now: DateTime<Utc>) -> Result<OutboxRunStats, AppError> {
        let repo = OutboxRepository::new(self.db);
        let mut stats = OutboxRunStats::default();

        for event in repo.find_due(now, BATCH_SIZE).await? {
            if !repo
                .claim(&event, now, now + Duration::seconds(LEASE_SECONDS))
                .await?
            {
                stats.skipped += 1;
                continue;
            }

            let attempts = event.attempts + 1;

            let job = match OutboxJob::from_parts(&event.kind, event.payload.clone()) {
                Ok(job) => job,
                Err(e) => {
                    tracing::error!(event_id = %event.id, kind = %event.kind, error = %e, "Dead-lettering undecodable outbox event");
                    repo.mark_failed(&event.id, attempts, e.to_string(), now)
                        .await?;
                    stats.dead_lettered += 1;
                    continue;
                }
            };

            match self.execute(&event.id, job).await {
                Ok(()) => {
                    repo.mark_processed(&event.id, Utc::now()).await?;
                    stats.processed += 1;
                }
                Err(e) if attempts >= self.max_attempts => {
                    tracing::error!(
                        event_id = %event.id,
                        kind = %event.kind,
                        attempts,
                        error = %e,
                        "Outbox event exhausted its attempts and was dead-lettered"
                    );
                    repo.mark_failed(&event.id, attempts, e.to_string(), now)
                        .await?;
                    stats.dead_lettered += 1;
                }
                Err(e) => {
                    let next_attempt_at = now + retry_delay(attempts);
                    tracing::warn!(
                        event_id = %event.id,
                        kind = %event.kind,
                        attempts,
                        next_attempt_at = %next_attempt_at,
                        error = %e,
                        "Outbox event failed, scheduling retry"
                    );
                    repo.mark_retry(&event.id, attempts, e.to_string(), next_attempt_at)
                        .await?;
                    stats.retried += 1;
                }
            }
        }

        Ok(stats)
    }

    async fn execute(&self, event_id: &str, job: OutboxJob) -> Result<(), AppError> {
        match job {
            OutboxJob::StakeholderCreate(job) => self.create_stakeholder(event_id, job).await,
            OutboxJob::BankDetailsUpdate(job) => self.submit_bank_details(event_id, job).await,
            OutboxJob::Email(message) => Ok(self.gateway.send_email(&message).await?),
            OutboxJob::Sms(message) => Ok(self.gateway.send_sms(&message).await?),
            OutboxJob::WhatsApp(message) => Ok(self.gateway.send_whatsapp(&message).await?),
            OutboxJob::Push(message) => Ok(self.gateway.send_push(&message).await?),
        }
    }

    /// Stores `job` as the event's payload so the next attempt resumes from it.
    async fn save_progress(&self, event_id: &str, job: &OutboxJob) -> Result<(), AppError> {
        OutboxRepository::new(self.db)
            .update_payload(event_id, job.payload()?)
            .await?;

        Ok(())
    }

    /// Registers the stakeholder and stores its provider ID on the account.
    ///
    /// The provider ID is written back to the event before the account is updated, so a
    /// retry after a failed account write doesn't register the stakeholder twice.
    async fn create_stakeholder(
        &self,
        event_id: &str,
        mut job: StakeholderCreateJob,
    ) -> Result<(), AppError> {
        let stakeholder_id = match job.stakeholder_id.clone() {
            Some(stakeholder_id) => stakeholder_id,
            None => {
                let stakeholder = self
                    .provider
                    .create_stakeholder(&job.account_id, &job.stakeholder_data)
                    .await?;
                job.stakeholder_id = Some(stakeholder.id.clone());
                self.save_progress(event_id, &OutboxJob::StakeholderCreate(job.clone()))
                    .await?;
                stakeholder.id
            }
        };

        PayoutAccountService::new(self.db, self.provider.as_ref())
            .record_stakeholder(&job.payout_account_id, &stakeholder_id, job.auto_created)
            .await?;

        tracing::info!(
            payout_account_id = %job.payout_account_id,
            stakeholder_id = %stakeholder_id,
            "Registered payout account stakeholder"
        );

        Ok(())
    }

    /// Submits bank details, marks them submitted and reconciles the activation state.
    ///
    /// A failed reconciliation doesn't fail the job: the submission already went through
    /// and the status poller picks the account up again. An accepted submission is
    /// recorded on the event first, so a retry only updates the account.
    async fn submit_bank_details(
        &self,
        event_id: &str,
        mut job: BankDetailsUpdateJob,
    ) -> Result<(), AppError> {
        if !job.settlement_submitted {
            self.provider
                .update_settlement_details(
                    &job.account_id,
                    &job.product_config_id,
                    &job.bank_details,
                )
                .await?;
            job.settlement_submitted = true;
            self.save_progress(event_id, &OutboxJob::BankDetailsUpdate(job.clone()))
                .await?;
        }

        let service = PayoutAccountService::new(self.db, self.provider.as_ref());
        service
            .mark_bank_details_submitted(&job.payout_account_id, &job.bank_details)
            .await?;

        if let Err(e) = service
            .reconcile(
                &job.payout_account_id,
                ReconcileTrigger::BankDetailsSubmitted,
                AuditContext::system(),
            )
            .await
        {
            tracing::warn!(
                payout_account_id = %job.payout_account_id,
                error = %e,
                "Status sync after bank details submission failed"
            );
        }

        Ok(())
    }
}
