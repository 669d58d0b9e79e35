use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct AuditTrailDto {
    pub id: i32,
    pub action_type: String,
    pub scale: String,
    pub description: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: Option<i32>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}
