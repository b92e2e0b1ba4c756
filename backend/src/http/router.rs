//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    http::{header, HeaderValue},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS: embeds and the front end live on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Embeds may be framed by any site
    let embed = Router::new()
        .route("/embed/{id}", get(handlers::embed_heatmap))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("ALLOWALL"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("frame-ancestors *"),
        ));

    let api_v1 = Router::new()
        // Heatmap CRUD
        .route(
            "/heatmaps",
            get(handlers::list_heatmaps).post(handlers::create_heatmap),
        )
        .route("/heatmaps/order", put(handlers::reorder_heatmaps))
        .route(
            "/heatmaps/{id}",
            get(handlers::get_heatmap)
                .put(handlers::update_heatmap)
                .delete(handlers::delete_heatmap),
        )
        // Rendering
        .route("/heatmaps/{id}/render", get(handlers::render_heatmap))
        // Notion
        .route("/notion/validate", post(handlers::validate_notion))
        .route("/notion/oauth", get(handlers::notion_oauth_start))
        .route("/notion/callback", get(handlers::notion_oauth_callback))
        .merge(embed);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use crate::notion::{NotionClient, NotionDataSource};
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let notion = Arc::new(NotionClient::default()) as Arc<dyn NotionDataSource>;
        let state = AppState::new(repo, notion, AppConfig::default());
        let _router = create_router(state);
    }
}
