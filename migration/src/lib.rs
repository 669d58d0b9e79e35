pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_payout_account_table;
mod m20260301_000003_create_audit_trail_table;
mod m20260301_000004_create_outbox_event_table;
mod m20260301_000005_create_notification_table;

pub use m20260301_000002_create_payout_account_table::ACTIVE_PAYOUT_ACCOUNT_INDEX_SQL;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_payout_account_table::Migration),
            Box::new(m20260301_000003_create_audit_trail_table::Migration),
            Box::new(m20260301_000004_create_outbox_event_table::Migration),
            Box::new(m20260301_000005_create_notification_table::Migration),
        ]
    }
}
