use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Search and playback resolution
        .route("/search", get(handlers::search))
        .route("/servers", get(handlers::list_servers))
        .route("/resolve", get(handlers::resolve))
        // Catalog
        .route("/videos", get(handlers::list_videos))
        .route("/videos/featured", get(handlers::featured_video))
        .route("/videos/:id", get(handlers::get_video))
        .route("/videos/:id/related", get(handlers::related_videos))
        .route("/categories", get(handlers::list_categories))
        .route("/categories/:id/videos", get(handlers::category_videos))
        .route("/users/:user_id/videos", post(handlers::publish_video))
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
        // Watchlist
        .route(
            "/users/:user_id/watchlist",
            get(handlers::get_watchlist).post(handlers::add_to_watchlist),
        )
        .route(
            "/users/:user_id/watchlist/:video_id",
            get(handlers::watchlist_status).delete(handlers::remove_from_watchlist),
        )
}
