//! Audit trail recording.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::audit_trail::AuditTrailRepository,
    error::AppError,
    model::audit::{AuditEntry, AuditRecord},
};

pub struct AuditService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuditService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an audit entry.
    ///
    /// Auditing never fails the action being audited: a failed insert is logged with the
    /// entity reference and otherwise ignored.
    ///
    /// # Arguments
    /// - `entry` - Entry to append
    pub async fn record(&self, entry: AuditEntry) {
        let repo = AuditTrailRepository::new(self.db);

        let action = entry.action.as_str();
        let entity_type = entry.entity_type.clone();
        let entity_id = entry.entity_id.clone();

        if let Err(e) = repo.create(entry).await {
            tracing::error!(
                action,
                entity_type = %entity_type,
                entity_id = %entity_id,
                error = %e,
                "Failed to record audit trail entry"
            );
        }
    }

    /// Gets every entry recorded against an entity, oldest first.
    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditRecord>, AppError> {
        let repo = AuditTrailRepository::new(self.db);

        Ok(repo.get_by_entity(entity_type, entity_id).await?)
    }
}
