pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat_handlers;
use crate::ingest::handlers as ingest_handlers;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document API
        .route(
            "/api/v1/documents",
            post(ingest_handlers::handle_upload).get(ingest_handlers::handle_list),
        )
        .route(
            "/api/v1/documents/:id",
            get(ingest_handlers::handle_get).delete(ingest_handlers::handle_delete),
        )
        // Chat API
        .route("/api/v1/chat", post(chat_handlers::handle_chat))
        .route("/api/v1/chat/reset", post(chat_handlers::handle_reset))
        .route("/api/v1/chat/history", get(chat_handlers::handle_history))
        .route("/api/v1/chat/export", get(chat_handlers::handle_export))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
