use axum::{
    extract::{Query, State},
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
        payout::{BankInformationDto, CreatePayoutAccountDto, PayoutAccountDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            audit::AuditContext,
            payout_account::{CreatePayoutAccountParams, UpdateBankDetailsParams},
        },
        service::payout_account::PayoutAccountService,
        state::AppState,
    },
};

/// Tag to group payout account endpoints
pub static PAYOUT_ACCOUNT_TAG: &str = "payout-account";

#[derive(Deserialize, IntoParams)]
pub struct GetPayoutAccountQuery {
    /// Reconcile with the payment provider before returning (default `true`).
    #[serde(default = "default_sync")]
    pub sync: bool,
}

fn default_sync() -> bool {
    true
}

/// Get the academy's payout account.
///
/// By default the account is synced with the payment provider first; a failed sync is
/// logged and the stored account returned.
///
/// # Access Control
/// - `Academy` - Academy user owning the account
///
/// # Returns
/// - `200 OK` - The payout account
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an academy
/// - `404 Not Found` - No active payout account
#[utoipa::path(
    get,
    path = "/api/payout-account",
    tag = PAYOUT_ACCOUNT_TAG,
    params(GetPayoutAccountQuery),
    responses(
        (status = 200, description = "Payout account", body = ApiResponse<PayoutAccountDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "No active payout account", body = ErrorDto),
    ),
)]
pub async fn get_payout_account(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<GetPayoutAccountQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Academy])
        .await?;

    let account = PayoutAccountService::new(&state.db, state.provider.as_ref())
        .get_for_user(user.id, query.sync)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            StatusCode::OK.as_u16(),
            account.into_dto(),
            "Payout account retrieved successfully",
        )),
    ))
}

/// Create the academy's payout account.
///
/// Registers a linked account with the payment provider from the KYC details. Bank
/// information, when included, is stored and queued for submission.
///
/// # Access Control
/// - `Academy` - Academy user without an active payout account
///
/// # Returns
/// - `201 Created` - The created payout account
/// - `400 Bad Request` - Invalid KYC details, bank information or stakeholder
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an academy
/// - `409 Conflict` - User already has an active payout account
/// - `500 Internal Server Error` - Payment provider refused the account
#[utoipa::path(
    post,
    path = "/api/payout-account",
    tag = PAYOUT_ACCOUNT_TAG,
    request_body = CreatePayoutAccountDto,
    responses(
        (status = 201, description = "Payout account created", body = ApiResponse<PayoutAccountDto>),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 409, description = "Active payout account already exists", body = ErrorDto),
        (status = 500, description = "Payment provider error", body = ErrorDto),
    ),
)]
pub async fn create_payout_account(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<CreatePayoutAccountDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Academy])
        .await?;

    let params = CreatePayoutAccountParams::from_dto(user.id, payload)?;
    let context = AuditContext::from_headers(user.id, &headers);

    let account = PayoutAccountService::new(&state.db, state.provider.as_ref())
        .create(params, context)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED.as_u16(),
            account.into_dto(),
            "Payout account created successfully",
        )),
    ))
}

/// Replace the bank details of the academy's payout account.
///
/// # Access Control
/// - `Academy` - Academy user owning the account
///
/// # Returns
/// - `200 OK` - Account with the new bank details, submission pending
/// - `400 Bad Request` - Invalid bank information
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an academy
/// - `404 Not Found` - No active payout account
/// - `500 Internal Server Error` - Payouts couldn't be configured for the account
#[utoipa::path(
    put,
    path = "/api/payout-account/bank-details",
    tag = PAYOUT_ACCOUNT_TAG,
    request_body = BankInformationDto,
    responses(
        (status = 200, description = "Bank details updated", body = ApiResponse<PayoutAccountDto>),
        (status = 400, description = "Invalid bank information", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "No active payout account", body = ErrorDto),
        (status = 500, description = "Payment provider error", body = ErrorDto),
    ),
)]
pub async fn put_bank_details(
    state: State<AppState>,
    session: Session,
    headers: HeaderMap,
    payload: Json<BankInformationDto>,
) -> Result<impl IntoResponse, AppError> {
    update_bank_details(state, session, headers, payload).await
}

/// Replace the bank details of the academy's payout account.
///
/// Same as `PUT /api/payout-account/bank-details`.
#[utoipa::path(
    patch,
    path = "/api/payout-account/bank-details",
    tag = PAYOUT_ACCOUNT_TAG,
    request_body = BankInformationDto,
    responses(
        (status = 200, description = "Bank details updated", body = ApiResponse<PayoutAccountDto>),
        (status = 400, description = "Invalid bank information", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "No active payout account", body = ErrorDto),
        (status = 500, description = "Payment provider error", body = ErrorDto),
    ),
)]
pub async fn patch_bank_details(
    state: State<AppState>,
    session: Session,
    headers: HeaderMap,
    payload: Json<BankInformationDto>,
) -> Result<impl IntoResponse, AppError> {
    update_bank_details(state, session, headers, payload).await
}

async fn update_bank_details(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<BankInformationDto>,
) -> Result<(StatusCode, Json<ApiResponse<PayoutAccountDto>>), AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Academy])
        .await?;

    let params = UpdateBankDetailsParams::from_dto(user.id, payload)?;
    let context = AuditContext::from_headers(user.id, &headers);

    let account = PayoutAccountService::new(&state.db, state.provider.as_ref())
        .update_bank_details(params, context)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            StatusCode::OK.as_u16(),
            account.into_dto(),
            "Bank details updated successfully",
        )),
    ))
}

/// Sync the academy's payout account with the payment provider.
///
/// # Access Control
/// - `Academy` - Academy user owning the account
///
/// # Returns
/// - `200 OK` - The reconciled payout account
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - User is not an academy
/// - `404 Not Found` - No active payout account
/// - `409 Conflict` - Account kept changing during the sync
/// - `500 Internal Server Error` - Payment provider error
#[utoipa::path(
    post,
    path = "/api/payout-account/sync",
    tag = PAYOUT_ACCOUNT_TAG,
    responses(
        (status = 200, description = "Payout account synced", body = ApiResponse<PayoutAccountDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "No active payout account", body = ErrorDto),
        (status = 409, description = "Concurrent modification", body = ErrorDto),
        (status = 500, description = "Payment provider error", body = ErrorDto),
    ),
)]
pub async fn sync_payout_account(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Academy])
        .await?;

    let context = AuditContext::from_headers(user.id, &headers);
    let account = PayoutAccountService::new(&state.db, state.provider.as_ref())
        .sync_for_user(user.id, context)
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
