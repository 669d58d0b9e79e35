use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_user_table::User;

/// At most one active payout account per user. Partial indexes aren't expressible through
/// the schema builder, so the statement is shared with the test harness as raw SQL.
pub const ACTIVE_PAYOUT_ACCOUNT_INDEX_SQL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
    idx_payout_account_active_user ON payout_account (user_id) WHERE is_active";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayoutAccount::Table)
                    .if_not_exists()
                    .col(string(PayoutAccount::Id).primary_key())
                    .col(integer(PayoutAccount::UserId))
                    .col(string(PayoutAccount::RazorpayAccountId))
                    .col(string(PayoutAccount::LegalBusinessName))
                    .col(string(PayoutAccount::BusinessType))
                    .col(string(PayoutAccount::ContactName))
                    .col(string(PayoutAccount::Email))
                    .col(string(PayoutAccount::Phone))
                    .col(string(PayoutAccount::Pan))
                    .col(string_null(PayoutAccount::Gst))
                    .col(string(PayoutAccount::Street1))
                    .col(string_null(PayoutAccount::Street2))
                    .col(string(PayoutAccount::City))
                    .col(string(PayoutAccount::State))
                    .col(string(PayoutAccount::PostalCode))
                    .col(string(PayoutAccount::Country))
                    .col(string_null(PayoutAccount::AccountNumber))
                    .col(string_null(PayoutAccount::IfscCode))
                    .col(string_null(PayoutAccount::AccountHolderName))
                    .col(string_null(PayoutAccount::BankName))
                    .col(string(PayoutAccount::ActivationStatus).default("pending"))
                    .col(json_null(PayoutAccount::ActivationRequirements))
                    .col(text_null(PayoutAccount::RejectionReason))
                    .col(string_null(PayoutAccount::ProductConfigurationId))
                    .col(string_null(PayoutAccount::ProductConfigurationStatus))
                    .col(string_null(PayoutAccount::StakeholderId))
                    .col(string_null(PayoutAccount::BankDetailsStatus))
                    .col(json(PayoutAccount::Metadata))
                    .col(boolean(PayoutAccount::IsActive).default(true))
                    .col(integer(PayoutAccount::Version).default(0))
                    .col(
                        timestamp_with_time_zone(PayoutAccount::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(PayoutAccount::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payout_account_user_id")
                            .from(PayoutAccount::Table, PayoutAccount::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(ACTIVE_PAYOUT_ACCOUNT_INDEX_SQL)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayoutAccount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PayoutAccount {
    Table,
    Id,
    UserId,
    RazorpayAccountId,
    LegalBusinessName,
    BusinessType,
    ContactName,
    Email,
    Phone,
    Pan,
    Gst,
    Street1,
    Street2,
    City,
    State,
    PostalCode,
    Country,
    AccountNumber,
    IfscCode,
    AccountHolderName,
    BankName,
    ActivationStatus,
    ActivationRequirements,
    RejectionReason,
    ProductConfigurationId,
    ProductConfigurationStatus,
    StakeholderId,
    BankDetailsStatus,
    Metadata,
    IsActive,
    Version,
    CreatedAt,
    UpdatedAt,
}
