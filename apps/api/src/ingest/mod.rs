// CV ingestion pipeline: format detection, text extraction, best-effort
// summarization, persistence.

pub mod handlers;
pub mod prompts;
pub mod summarize;

use anyhow::anyhow;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::extract;
use crate::ingest::summarize::summarize;
use crate::llm_client::TextGenerator;
use crate::models::document::{Document, NewDocument};
use crate::store::DocumentStore;

/// Runs the full ingestion pipeline for one uploaded file.
///
/// Unsupported formats and extraction failures error out before anything is
/// persisted; a failed summary downgrades to `None` and the upload proceeds.
pub async fn ingest_document(
    store: &DocumentStore,
    llm: &dyn TextGenerator,
    filename: &str,
    data: Bytes,
    candidate_name: Option<String>,
) -> Result<Document, AppError> {
    let file_type = extract::detect_file_type(filename)?;

    // Extraction is CPU-bound; keep it off the async runtime.
    let content = tokio::task::spawn_blocking(move || extract::extract_text(file_type, &data))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow!("spawn_blocking failed during extraction: {e}"))
        })??;

    let summary = summarize(llm, filename, &content).await;

    let id = store
        .create(NewDocument {
            filename: filename.to_string(),
            content,
            file_type,
            candidate_name: normalize_candidate_name(candidate_name),
            summary: summary.into_option(),
        })
        .await?;

    let document = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow!("document {id} missing after insert")))?;

    info!(
        "Ingested '{}' as document {} ({})",
        document.filename, document.id, document.file_type
    );

    Ok(document)
}

/// Empty and whitespace-only labels become absent; anything else is trimmed.
fn normalize_candidate_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::LlmError;
    use crate::models::document::FileType;

    async fn open_temp() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("cvs.db")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_txt_upload_persists_content_unchanged() {
        let (_dir, store) = open_temp().await;
        let llm = ScriptedGenerator::new(vec![Ok("Concise summary.".to_string())]);

        let document = ingest_document(
            &store,
            &llm,
            "jane.txt",
            Bytes::from_static(b"Jane Doe\nSkills: Go, Rust"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(document.content, "Jane Doe\nSkills: Go, Rust");
        assert_eq!(document.file_type, FileType::Txt);
        assert_eq!(document.candidate_name, None);
        assert_eq!(document.summary.as_deref(), Some("Concise summary."));
    }

    #[tokio::test]
    async fn test_failed_summary_still_persists_the_document() {
        let (_dir, store) = open_temp().await;
        let llm = ScriptedGenerator::new(vec![Err(LlmError::EmptyContent)]);

        let document = ingest_document(
            &store,
            &llm,
            "jane.txt",
            Bytes::from_static(b"Jane Doe"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(document.summary, None);
        assert!(store.get(document.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unsupported_format_leaves_no_record() {
        let (_dir, store) = open_temp().await;
        let llm = ScriptedGenerator::new(vec![]);

        let err = ingest_document(&store, &llm, "resume.rtf", Bytes::from_static(b"x"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(llm.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_leaves_no_record() {
        let (_dir, store) = open_temp().await;
        let llm = ScriptedGenerator::new(vec![]);

        let err = ingest_document(
            &store,
            &llm,
            "broken.txt",
            Bytes::from_static(&[0xff, 0xfe]),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_candidate_name_is_trimmed_and_blank_becomes_absent() {
        let (_dir, store) = open_temp().await;
        let llm = ScriptedGenerator::new(vec![Ok("s1".to_string()), Ok("s2".to_string())]);

        let named = ingest_document(
            &store,
            &llm,
            "a.txt",
            Bytes::from_static(b"text"),
            Some("  Jane Doe ".to_string()),
        )
        .await
        .unwrap();
        let unnamed = ingest_document(
            &store,
            &llm,
            "b.txt",
            Bytes::from_static(b"text"),
            Some("   ".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(named.candidate_name.as_deref(), Some("Jane Doe"));
        assert_eq!(unnamed.candidate_name, None);
    }
}
