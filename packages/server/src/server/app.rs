//! Application setup and router configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{dictionary, health_handler, member, moderation, recognition};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub jwt_service: Arc<JwtService>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, jwt_service: Arc<JwtService>, allowed_origins: &[String]) -> Router {
    let app_state = AppState {
        deps,
        jwt_service: jwt_service.clone(),
    };

    let dictionary_routes = Router::new()
        .route("/search", get(dictionary::search_handler))
        .route("/latest", get(dictionary::latest_handler))
        .route("/random", get(dictionary::random_handler))
        .route("/:id", get(dictionary::get_entry_handler));

    let user_routes = Router::new()
        .route("/contributions", post(moderation::submit_contribution_handler))
        .route("/favorites", get(member::list_favorites_handler))
        .route("/favorites/:entry_id", post(member::toggle_favorite_handler))
        .route("/favorites/check/:entry_id", get(member::favorite_status_handler))
        .route("/history", get(member::search_history_handler))
        .route("/reports", post(member::create_report_handler));

    let admin_routes = Router::new()
        .route(
            "/dictionary",
            get(dictionary::list_entries_handler).post(dictionary::create_entry_handler),
        )
        .route("/dictionary/reindex", post(dictionary::reindex_handler))
        .route(
            "/dictionary/:id",
            put(dictionary::update_entry_handler).delete(dictionary::delete_entry_handler),
        )
        .route("/contributions", get(moderation::list_contributions_handler))
        .route("/contributions/:id", get(moderation::get_contribution_handler))
        .route(
            "/contributions/:id/approve",
            post(moderation::approve_contribution_handler),
        )
        .route(
            "/contributions/:id/reject",
            post(moderation::reject_contribution_handler),
        )
        .route("/stats", get(moderation::dashboard_stats_handler))
        .route("/reports", get(member::list_open_reports_handler))
        .route("/reports/:id/resolve", post(member::resolve_report_handler));

    let recognition_routes = Router::new()
        .route("/predict", post(recognition::predict_handler))
        .route("/fix-diacritics", post(recognition::fix_diacritics_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/dictionary", dictionary_routes)
        .nest("/api/user", user_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/vsl", recognition_routes)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(app_state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
