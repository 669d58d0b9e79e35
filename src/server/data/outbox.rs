//! Outbox data repository.
//!
//! An event is *due* while it has neither `processed_at` nor `failed_at` set and its
//! `next_attempt_at` has passed. Workers claim a due event by pushing `next_attempt_at`
//! forward with a conditional update, so an event is only ever handed to one worker per
//! attempt.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::outbox::NewOutboxEvent;

pub struct OutboxRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OutboxRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new queued event with zero attempts.
    pub async fn enqueue(
        &self,
        params: NewOutboxEvent,
    ) -> Result<entity::outbox_event::Model, DbErr> {
        entity::outbox_event::ActiveModel {
            id: ActiveValue::Set(params.id),
            kind: ActiveValue::Set(params.kind),
            payload: ActiveValue::Set(params.payload),
            attempts: ActiveValue::Set(0),
            last_error: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            next_attempt_at: ActiveValue::Set(params.next_attempt_at),
            processed_at: ActiveValue::Set(None),
            failed_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<entity::outbox_event::Model>, DbErr> {
        entity::prelude::OutboxEvent::find_by_id(id.to_string())
            .one(self.db)
            .await
    }

    /// Gets up to `limit` due events, earliest scheduled first.
    ///
    /// # Arguments
    /// - `now` - Reference time for due-ness
    /// - `limit` - Maximum number of events to return
    pub async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<entity::outbox_event::Model>, DbErr> {
        use entity::outbox_event::Column;

        entity::prelude::OutboxEvent::find()
            .filter(Column::ProcessedAt.is_null())
            .filter(Column::FailedAt.is_null())
            .filter(Column::NextAttemptAt.lte(now))
            .order_by_asc(Column::NextAttemptAt)
            .order_by_asc(Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Claims a due event for one delivery attempt.
    ///
    /// Succeeds only if the event is still due and nobody has recorded an attempt since it
    /// was read. The claim leases the event until `lease_until`; if the worker dies, the
    /// event becomes due again afterwards.
    ///
    /// # Returns
    /// - `Ok(true)` - This caller owns the attempt
    /// - `Ok(false)` - Another worker claimed or finished it first
    /// - `Err(DbErr)` - Database error
    pub async fn claim(
        &self,
        event: &entity::outbox_event::Model,
        now: DateTime<Utc>,
        lease_until: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        use entity::outbox_event::Column;

        let result = entity::prelude::OutboxEvent::update_many()
            .set(entity::outbox_event::ActiveModel {
                next_attempt_at: ActiveValue::Set(lease_until),
                ..Default::default()
            })
            .filter(Column::Id.eq(event.id.as_str()))
            .filter(Column::Attempts.eq(event.attempts))
            .filter(Column::ProcessedAt.is_null())
            .filter(Column::FailedAt.is_null())
            .filter(Column::NextAttemptAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Marks an event as delivered.
    pub async fn mark_processed(&self, id: &str, now: DateTime<Utc>) -> Result<(), DbErr> {
        entity::prelude::OutboxEvent::update_many()
            .set(entity::outbox_event::ActiveModel {
                processed_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(entity::outbox_event::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Replaces the payload of a claimed event, recording progress for later attempts.
    pub async fn update_payload(&self, id: &str, payload: serde_json::Value) -> Result<(), DbErr> {
        entity::prelude::OutboxEvent::update_many()
            .set(entity::outbox_event::ActiveModel {
                payload: ActiveValue::Set(payload),
                ..Default::default()
            })
            .filter(entity::outbox_event::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Records a failed attempt and schedules the next one.
    pub async fn mark_retry(
        &self,
        id: &str,
        attempts: i32,
        last_error: String,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::OutboxEvent::update_many()
            .set(entity::outbox_event::ActiveModel {
                attempts: ActiveValue::Set(attempts),
                last_error: ActiveValue::Set(Some(last_error)),
                next_attempt_at: ActiveValue::Set(next_attempt_at),
                ..Default::default()
            })
            .filter(entity::outbox_event::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Records the final failed attempt and dead-letters the event.
    pub async fn mark_failed(
        &self,
        id: &str,
        attempts: i32,
        last_error: String,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::OutboxEvent::update_many()
            .set(entity::outbox_event::ActiveModel {
                attempts: ActiveValue::Set(attempts),
                last_error: ActiveValue::Set(Some(last_error)),
                failed_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(entity::outbox_event::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Puts a dead-lettered event back in the queue with a fresh attempt budget.
    ///
    /// `last_error` is kept for reference.
    ///
    /// # Returns
    /// - `Ok(true)` - Event was dead-lettered and is queued again
    /// - `Ok(false)` - Event doesn't exist or isn't dead-lettered
    /// - `Err(DbErr)` - Database error
    pub async fn requeue(&self, id: &str, now: DateTime<Utc>) -> Result<bool, DbErr> {
        use entity::outbox_event::Column;

        let result = entity::prelude::OutboxEvent::update_many()
            .set(entity::outbox_event::ActiveModel {
                attempts: ActiveValue::Set(0),
                failed_at: ActiveValue::Set(None),
                next_attempt_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::FailedAt.is_not_null())
            .filter(Column::ProcessedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
