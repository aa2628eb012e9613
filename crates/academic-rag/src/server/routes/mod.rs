//! API routes for the RAG server

pub mod chat;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(request_body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Upload - with larger body limit for multipart files
        .route(
            "/upload",
            post(upload::upload_files).layer(DefaultBodyLimit::max(request_body_limit)),
        )
        .route("/chat", post(chat::chat))
}

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "online",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
