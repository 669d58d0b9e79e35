use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
};

/// Role a user needs for an endpoint.
pub enum Permission {
    /// Academy managing its own payout account.
    Academy,
    /// Platform administrator.
    Admin,
}

impl Permission {
    fn role(&self) -> &'static str {
        match self {
            Self::Academy => "academy",
            Self::Admin => "admin",
        }
    }
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Resolves the session user and checks every permission.
    ///
    /// # Returns
    /// - `Ok(Model)` - Authenticated user holding all permissions
    /// - `Err(AuthError::UserNotInSession)` - Not logged in
    /// - `Err(AuthError::UserNotInDatabase)` - Session user no longer exists
    /// - `Err(AuthError::AccessDenied)` - User lacks a required role
    pub async fn require(
        &self,
        permissions: &[Permission],
    ) -> Result<entity::user::Model, AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        let Some(user) = user_repo.find_by_id(user_id).await? else {
            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        for permission in permissions {
            if user.role != permission.role() {
                return Err(AuthError::AccessDenied(
                    user_id,
                    format!(
                        "User with role '{}' attempted an action requiring role '{}'",
                        user.role,
                        permission.role()
                    ),
                )
                .into());
            }
        }

        Ok(user)
    }
}
