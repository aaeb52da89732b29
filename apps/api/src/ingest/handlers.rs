use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::ingest::ingest_document;
use crate::models::document::Document;
use crate::state::AppState;

/// Outcome of one file within a batch upload. An extraction problem fails the
/// file, not the batch; a storage problem aborts the whole request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadOutcome {
    Stored { document: Document },
    Failed { filename: String, error: String },
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub results: Vec<UploadOutcome>,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
}

/// POST /api/v1/documents
///
/// Multipart form: repeated `files` parts plus an optional `candidate_name`
/// text part that labels every file in the batch.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut files: Vec<(String, Bytes)> = Vec::new();
    let mut candidate_name: Option<String> = None;

    // Field order is not guaranteed; collect everything first so a trailing
    // candidate_name still applies to the whole batch.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::Validation("file field is missing a filename".to_string())
                    })?
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                files.push((filename, data));
            }
            "candidate_name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                candidate_name = Some(text);
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(AppError::Validation("no files provided".to_string()));
    }

    let mut results = Vec::with_capacity(files.len());
    for (filename, data) in files {
        let outcome = ingest_document(
            &state.store,
            state.llm.as_ref(),
            &filename,
            data,
            candidate_name.clone(),
        )
        .await;

        match outcome {
            Ok(document) => results.push(UploadOutcome::Stored { document }),
            Err(AppError::Extraction(e)) => results.push(UploadOutcome::Failed {
                filename,
                error: e.to_string(),
            }),
            Err(other) => return Err(other),
        }
    }

    Ok(Json(UploadResponse { results }))
}

/// GET /api/v1/documents
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let documents = state.store.list_all().await?;
    Ok(Json(DocumentListResponse { documents }))
}

/// GET /api/v1/documents/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Document>, AppError> {
    let document = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
    Ok(Json(document))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
