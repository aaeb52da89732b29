use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::document::Document;
use crate::store::DocumentStore;

/// Content characters shown per document in the context block.
const PREVIEW_CHARS: usize = 200;

const EMPTY_CORPUS: &str = "No CVs are currently uploaded in the database.";

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Context-assembly seam. The chat flow only sees this trait, so the
/// corpus-dump strategy below can later be replaced by bounded or ranked
/// retrieval without touching the session contract.
///
/// Carried in `AppState` as `Arc<dyn ContextAssembler>`.
#[async_trait]
pub trait ContextAssembler: Send + Sync {
    /// Produces the context block injected ahead of the user's message.
    async fn assemble(&self) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// FullCorpusAssembler: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Serializes the entire corpus, most recent upload first, with a bounded
/// preview of each document. Reads the store fresh on every call, so uploads
/// and deletes are visible to the next turn without any cache invalidation.
pub struct FullCorpusAssembler {
    store: DocumentStore,
}

impl FullCorpusAssembler {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContextAssembler for FullCorpusAssembler {
    async fn assemble(&self) -> Result<String, AppError> {
        let documents = self.store.list_all().await?;
        Ok(render_corpus(&documents))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders the corpus block, one entry per document in the given order.
fn render_corpus(documents: &[Document]) -> String {
    if documents.is_empty() {
        return EMPTY_CORPUS.to_string();
    }

    let mut block = String::from("Available CVs in database:\n\n");
    for doc in documents {
        block.push_str(&format!("CV ID: {}\n", doc.id));
        block.push_str(&format!("Filename: {}\n", doc.filename));
        block.push_str(&format!(
            "Candidate: {}\n",
            doc.candidate_name.as_deref().unwrap_or("Not specified")
        ));
        block.push_str(&format!(
            "Upload Date: {}\n",
            doc.uploaded_at.format("%Y-%m-%d %H:%M:%S")
        ));
        block.push_str(&format!(
            "Summary: {}\n",
            doc.summary.as_deref().unwrap_or("No summary")
        ));
        block.push_str(&format!("Content Preview: {}...\n", preview(&doc.content)));
        block.push_str(&"-".repeat(50));
        block.push_str("\n\n");
    }
    block
}

/// First `PREVIEW_CHARS` characters of the content (character count, not
/// bytes). The truncation marker is appended by the caller regardless of
/// whether anything was cut.
fn preview(content: &str) -> &str {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
