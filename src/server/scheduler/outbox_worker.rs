use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_cron_scheduler::Job;

use crate::server::{
    error::AppError, messaging::MessageGateway, provider::PaymentProvider,
    service::outbox::dispatcher::OutboxDispatcher,
};

/// Creates the job draining due outbox events on `schedule`.
///
/// Overlapping runs are safe: each event is claimed before execution, so a run only
/// executes the events it won.
pub fn job(
    schedule: &str,
    db: DatabaseConnection,
    provider: Arc<dyn PaymentProvider>,
    gateway: Arc<dyn MessageGateway>,
    max_attempts: i32,
) -> Result<Job, AppError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let db = db.clone();
        let provider = provider.clone();
        let gateway = gateway.clone();

        Box::pin(async move {
            let dispatcher = OutboxDispatcher::new(&db, provider, gateway, max_attempts);

            match dispatcher.process_due(Utc::now()).await {
                Ok(stats) if stats.processed + stats.retried + stats.dead_lettered > 0 => {
                    tracing::info!(
                        processed = stats.processed,
                        retried = stats.retried,
                        dead_lettered = stats.dead_lettered,
                        skipped = stats.skipped,
                        "Outbox run finished"
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Outbox run failed"),
            }
        })
    })?;

    Ok(job)
}
