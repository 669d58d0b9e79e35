use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        admin,
        payout_account,
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payouts API",
        description = "Payout account lifecycle for academies: linked account onboarding, bank details and activation status"
    ),
    tags(
        (name = "payout-account", description = "Academy payout account"),
        (name = "admin", description = "Payout account administration")
    )
)]
struct ApiDoc;

/// Builds the API router with Swagger UI served at `/api/docs`.
pub fn router() -> Router<AppState> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(
            payout_account::get_payout_account,
            payout_account::create_payout_account
        ))
        .routes(routes!(
            payout_account::put_bank_details,
            payout_account::patch_bank_details
        ))
        .routes(routes!(payout_account::sync_payout_account))
        .routes(routes!(admin::list_payout_accounts))
        .routes(routes!(admin::sync_payout_account))
        .routes(routes!(admin::get_audit_trail))
        .routes(routes!(admin::retry_outbox_event))
        .split_for_parts();

    router.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
