use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{
    config::Config,
    error::AppError,
    messaging::{http::HttpMessageGateway, MessageGateway},
    provider::{razorpay::RazorpayClient, PaymentProvider},
};

/// Timeout applied to every outgoing provider and messaging request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application database.
///
/// The session table is shared with the platform's login service, which issues the
/// sessions this service reads. Its migration is idempotent.
///
/// # Arguments
/// - `db` - Connected database
///
/// # Returns
/// - `Ok(SessionManagerLayer)` - Layer to apply to the router
/// - `Err(AppError::SqlxErr)` - Failed to create the session table
pub async fn connect_to_session(
    db: &DatabaseConnection,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());

    session_store.migrate().await?;

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7))))
}

/// Builds the HTTP client shared by the provider and messaging gateways.
///
/// Redirects are disabled since neither API redirects legitimately.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(HTTP_TIMEOUT)
        .build()?)
}

/// Builds the payment provider gateway from configuration.
pub fn setup_payment_provider(
    config: &Config,
    http_client: reqwest::Client,
) -> Result<Arc<dyn PaymentProvider>, AppError> {
    let client = RazorpayClient::new(
        http_client,
        &config.razorpay_base_url,
        config.razorpay_key_id.clone(),
        config.razorpay_key_secret.clone(),
    )?;

    Ok(Arc::new(client))
}

/// Builds the messaging gateway from configuration.
pub fn setup_message_gateway(
    config: &Config,
    http_client: reqwest::Client,
) -> Result<Arc<dyn MessageGateway>, AppError> {
    let gateway = HttpMessageGateway::new(
        http_client,
        &config.messaging_base_url,
        config.messaging_api_key.clone(),
    )?;

    Ok(Arc::new(gateway))
}
