pub mod rest;
pub mod sources;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use meetspot_engine::RecommendEngine;

pub struct AppState {
    pub engine: RecommendEngine,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .route("/api/recommend", post(rest::api_recommend))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
