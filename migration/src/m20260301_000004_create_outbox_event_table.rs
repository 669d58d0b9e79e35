use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OutboxEvent::Table)
                    .if_not_exists()
                    .col(string(OutboxEvent::Id).primary_key())
                    .col(string(OutboxEvent::Kind))
                    .col(json(OutboxEvent::Payload))
                    .col(integer(OutboxEvent::Attempts).default(0))
                    .col(text_null(OutboxEvent::LastError))
                    .col(
                        timestamp_with_time_zone(OutboxEvent::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone(OutboxEvent::NextAttemptAt))
                    .col(timestamp_with_time_zone_null(OutboxEvent::ProcessedAt))
                    .col(timestamp_with_time_zone_null(OutboxEvent::FailedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_outbox_event_next_attempt_at")
                    .table(OutboxEvent::Table)
                    .col(OutboxEvent::NextAttemptAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OutboxEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OutboxEvent {
    Table,
    Id,
    Kind,
    Payload,
    Attempts,
    LastError,
    CreatedAt,
    NextAttemptAt,
    ProcessedAt,
    FailedAt,
}
