use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_cron_scheduler::Job;

use crate::server::{
    error::AppError, provider::PaymentProvider, service::payout_account::PayoutAccountService,
};

/// Creates the job reconciling pending and needs-clarification accounts on `schedule`.
///
/// Catches provider decisions for academies that never open the app or trigger a sync.
pub fn job(
    schedule: &str,
    db: DatabaseConnection,
    provider: Arc<dyn PaymentProvider>,
) -> Result<Job, AppError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let db = db.clone();
        let provider = provider.clone();

        Box::pin(async move {
            let service = PayoutAccountService::new(&db, provider.as_ref());

            match service.sync_pending_accounts().await {
                Ok(stats) => tracing::info!(
                    synced = stats.synced,
                    failed = stats.failed,
                    "Payout account status sync finished"
                ),
                Err(e) => tracing::error!(error = %e, "Payout account status sync failed"),
            }
        })
    })?;

    Ok(job)
}
