use sea_orm::entity::prelude::*;

/// Append-only record of a state-changing action.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_trail")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub action_type: String,
    /// One of `low`, `medium`, `high`, `critical`.
    pub scale: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: Option<i32>,
    pub metadata: Json,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
