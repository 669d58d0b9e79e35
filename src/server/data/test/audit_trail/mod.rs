use crate::server::{
    data::audit_trail::AuditTrailRepository,
    model::audit::{AuditAction, AuditContext, AuditEntry},
};
use sea_orm::DbErr;
use serde_json::json;
use test_utils::builder::TestBuilder;

mod create;
mod get_by_entity;
