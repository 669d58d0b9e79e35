mod model;
mod server;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::server::{
    config::Config, error::AppError, router, scheduler, startup, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db).await?;
    let http_client = startup::setup_reqwest_client()?;
    let provider = startup::setup_payment_provider(&config, http_client.clone())?;
    let gateway = startup::setup_message_gateway(&config, http_client)?;

    let _scheduler =
        scheduler::start_scheduler(&config, db.clone(), provider.clone(), gateway).await?;

    let app = router::router()
        .with_state(AppState::new(db, provider))
        .layer(session)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!(addr = %config.bind_addr, "Starting server");

    axum::serve(listener, app).await?;

    Ok(())
}
