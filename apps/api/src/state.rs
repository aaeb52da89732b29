use std::sync::Arc;

use tokio::sync::Mutex;

use crate::chat::context::ContextAssembler;
use crate::chat::session::ChatSession;
use crate::llm_client::TextGenerator;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    /// Text-generation backend. Default: the Gemini client.
    pub llm: Arc<dyn TextGenerator>,
    /// Pluggable context strategy. Default: FullCorpusAssembler.
    pub assembler: Arc<dyn ContextAssembler>,
    /// The single in-memory conversation; one logical session per process.
    pub session: Arc<Mutex<ChatSession>>,
}
