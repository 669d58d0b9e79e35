use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Background job as seen by administrators. The payload is not exposed.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct OutboxEventDto {
    pub id: String,
    pub kind: String,
    /// `queued`, `processed` or `dead_lettered`.
    pub state: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub next_attempt_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}
