use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto},
        audit::AuditTrailDto,
        outbox::OutboxEventDto,
        payout::{PaginatedPayoutAccountsDto, PayoutAccountDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            audit::{AuditContext, AuditRecord, PAYOUT_ACCOUNT_ENTITY},
            outbox::outbox_event_dto,
        },
        service::{
            audit::AuditService, outbox::OutboxService, payout_account::PayoutAccountService,
        },
        state::AppState,
    },
};

/// Tag to group admin endpoints
pub static ADMIN_TAG: &str = "admin";

#[derive(Deserialize, IntoParams)]
pub struct PayoutAccountListQuery {
    /// Activation status filter.
    pub status: Option<String>,
    /// Page number (0-indexed).
    #[serde(default)]
    pub page: u64,
    /// Entries per page, at most 100.
    #[serde(default = "default_entries")]
    pub entries: u64,
}

fn default_entries() -> u64 {
    10
}

/// List payout accounts.
///
/// # Access Control
/// - `Admin` - Platform administrator
///
/// # Returns
/// - `200 OK` - Page of payout accounts, newest first
/// - `400 Bad Request` - Unknown status filter
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an admin
#[utoipa::path(
    get,
    path = "/api/admin/payout-accounts",
    tag = ADMIN_TAG,
    params(PayoutAccountListQuery),
    responses(
        (status = 200, description = "Page of payout accounts", body = ApiResponse<PaginatedPayoutAccountsDto>),
        (status = 400, description = "Unknown status filter", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
    ),
)]
pub async fn list_payout_accounts(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PayoutAccountListQuery>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let page = PayoutAccountService::new(&state.db, state.provider.as_ref())
        .list_paginated(query.status.as_deref(), query.page, query.entries)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            StatusCode::OK.as_u16(),
            page.into_dto(),
            "Payout accounts retrieved successfully",
        )),
    ))
}

/// Sync any payout account with the payment provider.
///
/// # Access Control
/// - `Admin` - Platform administrator
///
/// # Returns
/// - `200 OK` - The reconciled payout account
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an admin
/// - `404 Not Found` - No such payout account
/// - `500 Internal Server Error` - Payment provider error
#[utoipa::path(
    post,
    path = "/api/admin/payout-accounts/{id}/sync",
    tag = ADMIN_TAG,
    params(("id" = String, Path, description = "Payout account ID")),
    responses(
        (status = 200, description = "Payout account synced", body = ApiResponse<PayoutAccountDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "Payout account not found", body = ErrorDto),
        (status = 500, description = "Payment provider error", body = ErrorDto),
    ),
)]
pub async fn sync_payout_account(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let context = AuditContext::from_headers(admin.id, &headers);
    let account = PayoutAccountService::new(&state.db, state.provider.as_ref())
        .sync_by_id(&id, context)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            StatusCode::OK.as_u16(),
            account.into_dto(),
            "Payout account synced successfully",
        )),
    ))
}

/// Get the audit trail of a payout account, oldest entry first.
///
/// # Access Control
/// - `Admin` - Platform administrator
///
/// # Returns
/// - `200 OK` - Audit entries (empty for unknown accounts)
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an admin
#[utoipa::path(
    get,
    path = "/api/admin/payout-accounts/{id}/audit-trail",
    tag = ADMIN_TAG,
    params(("id" = String, Path, description = "Payout account ID")),
    responses(
        (status = 200, description = "Audit trail", body = ApiResponse<Vec<AuditTrailDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
    ),
)]
pub async fn get_audit_trail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let entries: Vec<AuditTrailDto> = AuditService::new(&state.db)
        .list_for_entity(PAYOUT_ACCOUNT_ENTITY, &id)
        .await?
        .into_iter()
        .map(AuditRecord::into_dto)
        .collect();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            StatusCode::OK.as_u16(),
            entries,
            "Audit trail retrieved successfully",
        )),
    ))
}

/// Re-queue a dead-lettered background job.
///
/// # Access Control
/// - `Admin` - Platform administrator
///
/// # Returns
/// - `200 OK` - The re-queued event, due immediately
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an admin
/// - `404 Not Found` - No such event
/// - `409 Conflict` - Event isn't dead-lettered
#[utoipa::path(
    post,
    path = "/api/admin/outbox/{id}/retry",
    tag = ADMIN_TAG,
    params(("id" = String, Path, description = "Outbox event ID")),
    responses(
        (status = 200, description = "Event re-queued", body = ApiResponse<OutboxEventDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "Outbox event not found", body = ErrorDto),
        (status = 409, description = "Outbox event is not dead-lettered", body = ErrorDto),
    ),
)]
pub async fn retry_outbox_event(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let context = AuditContext::from_headers(admin.id, &headers);
    let event = OutboxService::new(&state.db)
        .retry_event(&id, context)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            StatusCode::OK.as_u16(),
            outbox_event_dto(event),
            "Outbox event re-queued",
        )),
    ))
}
