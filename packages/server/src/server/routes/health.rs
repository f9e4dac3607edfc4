use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::kernel::ServerDeps;
use crate::server::app::AppState;

const DATABASE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
    connection_pool: PoolHealth,
    /// Informational only: searches fall back to Postgres when this is not "ok"
    search_index: &'static str,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct PoolHealth {
    size: u32,
    idle_connections: usize,
    max_connections: u32,
}

async fn check_database(deps: &ServerDeps) -> DatabaseHealth {
    let ping = sqlx::query("SELECT 1").execute(&deps.db_pool);
    let error = match tokio::time::timeout(DATABASE_TIMEOUT, ping).await {
        Ok(Ok(_)) => None,
        Ok(Err(e)) => Some(format!("Query failed: {}", e)),
        Err(_) => Some(format!("Query timeout (>{}s)", DATABASE_TIMEOUT.as_secs())),
    };

    DatabaseHealth {
        status: if error.is_none() { "ok" } else { "error" },
        error,
    }
}

async fn check_search_index(deps: &ServerDeps) -> &'static str {
    let query = deps.search_index.search("", 1);
    match tokio::time::timeout(deps.search_timeout, query).await {
        Ok(Ok(_)) => "ok",
        Ok(Err(_)) => "unavailable",
        Err(_) => "timeout",
    }
}

/// Health check endpoint.
///
/// 200 while Postgres answers within five seconds, 503 otherwise. The search
/// index never affects the status code.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let deps = &state.deps;
    let (database, search_index) = tokio::join!(check_database(deps), check_search_index(deps));

    let pool = &deps.db_pool;
    let connection_pool = PoolHealth {
        size: pool.size(),
        idle_connections: pool.num_idle(),
        max_connections: pool.options().get_max_connections(),
    };

    let (code, status) = if database.error.is_none() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            connection_pool,
            search_index,
        }),
    )
}
