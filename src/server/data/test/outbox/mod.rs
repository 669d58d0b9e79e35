use crate::server::{data::outbox::OutboxRepository, model::outbox::NewOutboxEvent};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use serde_json::json;
use test_utils::builder::TestBuilder;

mod requeue;

fn new_event(id: &str, next_attempt_at: chrono::DateTime<Utc>) -> NewOutboxEvent {
    NewOutboxEvent {
        id: id.to_string(),
        kind: "notify.email".to_string(),
        payload: json!({ "to": "asha@riverside.example" }),
        next_attempt_at,
    }
}
