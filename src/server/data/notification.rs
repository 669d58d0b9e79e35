//! In-app notification data repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::model::notification::{NewNotification, Notification};

pub struct NotificationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores an unread in-app notification.
    pub async fn create(&self, params: NewNotification) -> Result<Notification, DbErr> {
        let entity = entity::notification::ActiveModel {
            recipient_type: ActiveValue::Set(params.recipient_type),
            recipient_id: ActiveValue::Set(params.recipient_id),
            title: ActiveValue::Set(params.title),
            body: ActiveValue::Set(params.body),
            priority: ActiveValue::Set(params.priority.as_str().to_string()),
            data: ActiveValue::Set(params.data),
            read: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Notification::from_entity(entity))
    }

    /// Gets a recipient's notifications, oldest first.
    pub async fn get_by_recipient(
        &self,
        recipient_type: &str,
        recipient_id: i32,
    ) -> Result<Vec<Notification>, DbErr> {
        let notifications = entity::prelude::Notification::find()
            .filter(entity::notification::Column::RecipientType.eq(recipient_type))
            .filter(entity::notification::Column::RecipientId.eq(recipient_id))
            .order_by_asc(entity::notification::Column::Id)
            .all(self.db)
            .await?;

        Ok(notifications
            .into_iter()
            .map(Notification::from_entity)
            .collect())
    }
}
