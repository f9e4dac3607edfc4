// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vsl_core::domains::auth::JwtService;
use vsl_core::kernel::scheduled_tasks::start_scheduler;
use vsl_core::kernel::ServerDeps;
use vsl_core::{server::build_app, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vsl_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting VSL platform API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let (deps, _sync_worker) =
        ServerDeps::from_config(pool, &config).context("Failed to build server dependencies")?;

    // Index setup failure is not fatal: search falls back to Postgres.
    match tokio::time::timeout(config.search.timeout * 5, deps.search_index.ensure_index()).await {
        Ok(Ok(())) => tracing::info!("Search index ready"),
        Ok(Err(e)) => tracing::warn!("Search index not ready, continuing with fallback: {}", e),
        Err(_) => tracing::warn!("Search index setup timed out, continuing with fallback"),
    }

    let _scheduler = start_scheduler(deps.clone(), &config.sync)
        .await
        .context("Failed to start scheduled tasks")?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let app = build_app(deps, jwt_service, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
