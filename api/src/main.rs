//! Medbook booking service HTTP server.

use medbook_api::{AppState, BookingLifecycle, Config, build_router};
use medbook_core::environment::{RandomIds, SystemClock};
use medbook_core::events::LogBookingEvents;
use medbook_postgres::{
    PostgresBookingStore, PostgresPracticeStore, PostgresProviderStore, PostgresSessionStore,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medbook_api=info,medbook_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Medbook booking service");

    // Load configuration
    let config = Config::from_env();
    info!(
        database_url = %config.database.url,
        bookings_table = %config.tables.bookings,
        sessions_table = %config.tables.sessions,
        "Configuration loaded"
    );

    // Connect to the document store
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout))
        .connect(&config.database.url)
        .await?;

    info!("Running migrations...");
    sqlx::migrate!("../postgres/migrations").run(&pool).await?;
    info!("Database ready");

    // Build stores over the configured tables
    let bookings = Arc::new(PostgresBookingStore::new(
        pool.clone(),
        &config.tables.bookings,
    )?);
    let sessions = Arc::new(PostgresSessionStore::new(
        pool.clone(),
        &config.tables.sessions,
    )?);
    let practices = Arc::new(PostgresPracticeStore::new(
        pool.clone(),
        &config.tables.practices,
    )?);
    let providers = Arc::new(PostgresProviderStore::new(
        pool.clone(),
        &config.tables.providers,
    )?);

    // Assemble the lifecycle manager and shared state
    let clock = Arc::new(SystemClock);
    let ids = Arc::new(RandomIds);
    let lifecycle = Arc::new(BookingLifecycle::new(
        bookings,
        sessions.clone(),
        clock.clone(),
        ids.clone(),
        Arc::new(LogBookingEvents),
    ));
    let state = AppState::new(lifecycle, sessions, practices, providers, clock, ids);

    // Serve
    let app = build_router(state);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install shutdown signal handler");
        return;
    }
    info!("Shutdown signal received");
}
