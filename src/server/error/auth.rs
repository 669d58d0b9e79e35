use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No authenticated user ID is stored in the session.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("No user ID found in session")]
    UserNotInSession,

    /// Session references a user that no longer exists.
    ///
    /// Results in a 404 Not Found response.
    #[error("User {0} from session not found in database")]
    UserNotInDatabase(i32),

    /// User is authenticated but lacks the role the endpoint requires.
    ///
    /// Results in a 403 Forbidden response.
    ///
    /// # Fields
    /// - User ID that was denied
    /// - Reason for the denial, logged only
    #[error("Access denied for user {0}: {1}")]
    AccessDenied(i32, String),
}

/// Converts authentication errors into HTTP responses.
///
/// Maps authentication errors to appropriate HTTP status codes and user-friendly error messages:
/// - `UserNotInSession` → 401 Unauthorized with "Not logged in"
/// - `UserNotInDatabase` → 404 Not Found with "User not found"
/// - `AccessDenied` → 403 Forbidden with "Insufficient permissions"
///
/// All errors are logged at debug level for diagnostics while keeping client-facing messages
/// generic to avoid information leakage.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::UserNotInSession => (StatusCode::UNAUTHORIZED, "Not logged in"),
            Self::UserNotInDatabase(_) => (StatusCode::NOT_FOUND, "User not found"),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        };

        (status, Json(ErrorDto::new(status.as_u16(), message))).into_response()
    }
}
