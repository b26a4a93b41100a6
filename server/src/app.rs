use axum::Router;
use axum::http::HeaderValue;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config;
use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let app = Router::new()
        .route("/api/health", axum::routing::get(routes::api::health))
        .route("/api/metrics", axum::routing::get(routes::api::metrics))
        .route("/api/auth", axum::routing::get(routes::api::auth_check))
        .route(
            "/api/settings",
            axum::routing::get(routes::api::get_settings).post(routes::api::post_settings),
        )
        .route("/api/range", axum::routing::get(routes::api::get_range))
        .route(
            "/api/leaderboard",
            axum::routing::get(routes::api::get_leaderboard),
        )
        .route("/api/past", axum::routing::get(routes::api::list_past))
        .route("/api/past/{id}", axum::routing::get(routes::api::get_past))
        .route(
            "/api/past/{id}/image",
            axum::routing::post(routes::api::post_snapshot_image),
        )
        .route(
            "/api/snapshot",
            axum::routing::post(routes::api::post_snapshot),
        );

    app.layer(CompressionLayer::new())
        .layer(cors_layer())
        .fallback_service(ServeDir::new("dist"))
        .with_state(state)
}

/// With no ALLOWED_ORIGINS configured every origin is accepted, matching
/// the permissive default of the hosted deployments.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::allowed_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
