use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::chat::run_turn;
use crate::errors::AppError;
use crate::models::chat::Turn;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub turns: Vec<Turn>,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let reply = run_turn(
        &state.session,
        state.assembler.as_ref(),
        state.llm.as_ref(),
        &req.message,
    )
    .await?;

    Ok(Json(ChatResponse { reply }))
}

/// POST /api/v1/chat/reset
pub async fn handle_reset(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.reset();
    StatusCode::NO_CONTENT
}

/// GET /api/v1/chat/history
pub async fn handle_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let turns = state.session.lock().await.turns().to_vec();
    Json(HistoryResponse { turns })
}

/// GET /api/v1/chat/export
/// Serves the transcript as a downloadable plain-text log.
pub async fn handle_export(State(state): State<AppState>) -> impl IntoResponse {
    let log = state.session.lock().await.export();
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"gemini_chat_log.txt\"",
            ),
        ],
        log,
    )
}
