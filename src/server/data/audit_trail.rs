//! Audit trail data repository.
//!
//! Append-only: the repository exposes inserts and reads, never updates or deletes.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::model::audit::{AuditEntry, AuditRecord};

pub struct AuditTrailRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuditTrailRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an audit entry.
    ///
    /// # Returns
    /// - `Ok(AuditRecord)` - The stored entry
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, entry: AuditEntry) -> Result<AuditRecord, DbErr> {
        let entity = entity::audit_trail::ActiveModel {
            action_type: ActiveValue::Set(entry.action.as_str().to_string()),
            scale: ActiveValue::Set(entry.scale.as_str().to_string()),
            description: ActiveValue::Set(entry.description),
            entity_type: ActiveValue::Set(entry.entity_type),
            entity_id: ActiveValue::Set(entry.entity_id),
            user_id: ActiveValue::Set(entry.context.user_id),
            metadata: ActiveValue::Set(entry.metadata),
            ip_address: ActiveValue::Set(entry.context.ip_address),
            user_agent: ActiveValue::Set(entry.context.user_agent),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(AuditRecord::from_entity(entity))
    }

    /// Gets every entry recorded against an entity, oldest first.
    ///
    /// # Arguments
    /// - `entity_type` - Kind of entity, e.g. `payout_account`
    /// - `entity_id` - ID of the entity
    pub async fn get_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditRecord>, DbErr> {
        let entries = entity::prelude::AuditTrail::find()
            .filter(entity::audit_trail::Column::EntityType.eq(entity_type))
            .filter(entity::audit_trail::Column::EntityId.eq(entity_id))
            .order_by_asc(entity::audit_trail::Column::Id)
            .all(self.db)
            .await?;

        Ok(entries.into_iter().map(AuditRecord::from_entity).collect())
    }
}
