//! Chat endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::error::Error;
use crate::server::state::AppState;
use crate::types::{QueryReply, QueryRequest};

/// Body returned by `POST /api/chat`
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    /// Answer text; `null` when the query was rejected
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// POST /api/chat - Answer a question against uploaded documents
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    tracing::info!("Chat query: \"{}\"", request.query);

    match state.query().respond(&request).await {
        QueryReply::Answered(answer) => (
            StatusCode::OK,
            Json(ChatResponse {
                success: true,
                response: Some(answer),
                error: None,
                timestamp: Some(chrono::Utc::now().to_rfc3339()),
            }),
        ),
        QueryReply::Rejected => (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                success: false,
                response: None,
                error: Some(Error::InvalidQuery.user_message().to_string()),
                timestamp: None,
            }),
        ),
        reply @ QueryReply::Fallback => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatResponse {
                success: false,
                response: reply.text().map(str::to_string),
                error: Some("Internal server error".to_string()),
                timestamp: None,
            }),
        ),
    }
}
