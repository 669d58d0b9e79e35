//! Background workers driven by cron schedules.
//!
//! - `outbox_worker` - Executes due outbox events (stakeholders, bank details, notifications)
//! - `status_sync` - Reconciles accounts still awaiting a provider decision

pub mod outbox_worker;
pub mod status_sync;

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_cron_scheduler::JobScheduler;

use crate::server::{
    config::Config, error::AppError, messaging::MessageGateway, provider::PaymentProvider,
};

/// Starts every background worker.
///
/// # Arguments
/// - `config` - Schedules and outbox retry limit
/// - `db` - Database connection
/// - `provider` - Payment provider gateway
/// - `gateway` - Messaging gateway
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler
/// - `Err(AppError::SchedulerErr)` - Invalid schedule or scheduler failed to start
pub async fn start_scheduler(
    config: &Config,
    db: DatabaseConnection,
    provider: Arc<dyn PaymentProvider>,
    gateway: Arc<dyn MessageGateway>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    scheduler
        .add(outbox_worker::job(
            &config.outbox_poll_schedule,
            db.clone(),
            provider.clone(),
            gateway,
            config.outbox_max_attempts,
        )?)
        .await?;
    scheduler
        .add(status_sync::job(&config.status_sync_schedule, db, provider)?)
        .await?;

    scheduler.start().await?;

    tracing::info!(
        outbox_schedule = %config.outbox_poll_schedule,
        status_sync_schedule = %config.status_sync_schedule,
        "Background scheduler started"
    );

    Ok(scheduler)
}
