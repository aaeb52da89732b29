// Conversational flow: the session state machine, corpus context assembly,
// prompt composition, and the turn orchestration tying them to the LLM.

pub mod context;
pub mod handlers;
pub mod prompts;
pub mod session;

use tokio::sync::Mutex;

use crate::chat::context::ContextAssembler;
use crate::chat::prompts::compose_turn_prompt;
use crate::chat::session::ChatSession;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::chat::Turn;

/// Runs one full chat turn: record the user message, assemble the corpus
/// context, call the model with the service-side history, record the outcome.
///
/// The session lock is held only for state transitions, never across the LLM
/// call; an overlapping submit observes `AwaitingReply` and is rejected.
pub async fn run_turn(
    session: &Mutex<ChatSession>,
    assembler: &dyn ContextAssembler,
    llm: &dyn TextGenerator,
    user_text: &str,
) -> Result<String, AppError> {
    let pending = session.lock().await.begin(user_text)?;

    let outcome = generate_reply(assembler, llm, &pending.history, user_text).await;

    let mut session = session.lock().await;
    match outcome {
        Ok((prompt, reply)) => {
            session.complete(&pending, prompt, reply.clone());
            Ok(reply)
        }
        Err(e) => {
            session.fail(&pending);
            Err(e)
        }
    }
}

async fn generate_reply(
    assembler: &dyn ContextAssembler,
    llm: &dyn TextGenerator,
    history: &[Turn],
    user_text: &str,
) -> Result<(String, String), AppError> {
    let context = assembler.assemble().await?;
    let prompt = compose_turn_prompt(&context, user_text);
    let reply = llm.reply(history, &prompt).await?;
    Ok((prompt, reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::LlmError;
    use crate::models::document::{FileType, NewDocument};
    use crate::store::DocumentStore;
    use async_trait::async_trait;

    struct StaticAssembler(&'static str);

    #[async_trait]
    impl ContextAssembler for StaticAssembler {
        async fn assemble(&self) -> Result<String, AppError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingAssembler;

    #[async_trait]
    impl ContextAssembler for FailingAssembler {
        async fn assemble(&self) -> Result<String, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("store offline")))
        }
    }

    #[tokio::test]
    async fn test_turn_sends_context_enriched_prompt() {
        let session = Mutex::new(ChatSession::new());
        let assembler = StaticAssembler("CORPUS");
        let llm = ScriptedGenerator::new(vec![Ok("the reply".to_string())]);

        let reply = run_turn(&session, &assembler, &llm, "Who fits the role?")
            .await
            .unwrap();
        assert_eq!(reply, "the reply");

        let seen = llm.seen.lock().unwrap();
        let (history, prompt) = &seen[0];
        assert!(history.is_empty());
        assert_eq!(
            prompt,
            "CV Database Context:\nCORPUS\n\nUser Query: Who fits the role?"
        );

        let session = session.into_inner();
        assert_eq!(
            session.turns(),
            &[Turn::user("Who fits the role?"), Turn::assistant("the reply")]
        );
    }

    #[tokio::test]
    async fn test_second_turn_replays_enhanced_history() {
        let session = Mutex::new(ChatSession::new());
        let assembler = StaticAssembler("CORPUS");
        let llm =
            ScriptedGenerator::new(vec![Ok("r1".to_string()), Ok("r2".to_string())]);

        run_turn(&session, &assembler, &llm, "m1").await.unwrap();
        run_turn(&session, &assembler, &llm, "m2").await.unwrap();

        let seen = llm.seen.lock().unwrap();
        let (history, _) = &seen[1];
        assert_eq!(
            history,
            &vec![
                Turn::user("CV Database Context:\nCORPUS\n\nUser Query: m1"),
                Turn::assistant("r1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_call_keeps_session_usable() {
        let session = Mutex::new(ChatSession::new());
        let assembler = StaticAssembler("CORPUS");
        let llm = ScriptedGenerator::new(vec![
            Err(LlmError::EmptyContent),
            Ok("r2".to_string()),
        ]);

        let err = run_turn(&session, &assembler, &llm, "m1").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));

        let reply = run_turn(&session, &assembler, &llm, "m2").await.unwrap();
        assert_eq!(reply, "r2");

        // failed turn: user message kept, no reply, nothing replayed
        let seen = llm.seen.lock().unwrap();
        assert!(seen[1].0.is_empty());
        let session = session.into_inner();
        assert_eq!(
            session.turns(),
            &[Turn::user("m1"), Turn::user("m2"), Turn::assistant("r2")]
        );
    }

    #[tokio::test]
    async fn test_assembler_failure_fails_the_turn() {
        let session = Mutex::new(ChatSession::new());
        let llm = ScriptedGenerator::new(vec![Ok("never sent".to_string())]);

        let err = run_turn(&session, &FailingAssembler, &llm, "m1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        // the LLM is never reached, the user turn stays recorded
        assert!(llm.seen.lock().unwrap().is_empty());
        let session = session.into_inner();
        assert_eq!(session.turns(), &[Turn::user("m1")]);
    }

    #[tokio::test]
    async fn test_context_is_read_fresh_every_turn() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("cvs.db")).await.unwrap();
        let assembler = context::FullCorpusAssembler::new(store.clone());
        let session = Mutex::new(ChatSession::new());
        let llm =
            ScriptedGenerator::new(vec![Ok("r1".to_string()), Ok("r2".to_string())]);

        run_turn(&session, &assembler, &llm, "m1").await.unwrap();

        store
            .create(NewDocument {
                filename: "jane.txt".to_string(),
                content: "Jane Doe".to_string(),
                file_type: FileType::Txt,
                candidate_name: None,
                summary: None,
            })
            .await
            .unwrap();

        run_turn(&session, &assembler, &llm, "m2").await.unwrap();

        let seen = llm.seen.lock().unwrap();
        assert!(seen[0].1.contains("No CVs are currently uploaded"));
        assert!(seen[1].1.contains("CV ID: 1"));
        assert!(seen[1].1.contains("Filename: jane.txt"));
    }
}
