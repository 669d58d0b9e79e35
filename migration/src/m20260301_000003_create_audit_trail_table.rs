use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditTrail::Table)
                    .if_not_exists()
                    .col(pk_auto(AuditTrail::Id))
                    .col(string(AuditTrail::ActionType))
                    .col(string(AuditTrail::Scale))
                    .col(text(AuditTrail::Description))
                    .col(string(AuditTrail::EntityType))
                    .col(string(AuditTrail::EntityId))
                    .col(integer_null(AuditTrail::UserId))
                    .col(json(AuditTrail::Metadata))
                    .col(string_null(AuditTrail::IpAddress))
                    .col(string_null(AuditTrail::UserAgent))
                    .col(
                        timestamp_with_time_zone(AuditTrail::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_trail_entity")
                    .table(AuditTrail::Table)
                    .col(AuditTrail::EntityType)
                    .col(AuditTrail::EntityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditTrail::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AuditTrail {
    Table,
    Id,
    ActionType,
    Scale,
    Description,
    EntityType,
    EntityId,
    UserId,
    Metadata,
    IpAddress,
    UserAgent,
    CreatedAt,
}
