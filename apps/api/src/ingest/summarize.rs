use tracing::warn;

use crate::ingest::prompts::build_summary_prompt;
use crate::llm_client::TextGenerator;

/// Outcome of the one-shot summary call made at ingestion time.
/// Summaries are best-effort: a failed call downgrades to `Unavailable`
/// instead of failing the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Available(String),
    Unavailable,
}

impl Summary {
    /// `Unavailable` persists as NULL.
    pub fn into_option(self) -> Option<String> {
        match self {
            Summary::Available(text) => Some(text),
            Summary::Unavailable => None,
        }
    }
}

/// Asks the LLM for a 2-3 sentence synopsis of the extracted content.
pub async fn summarize(llm: &dyn TextGenerator, filename: &str, content: &str) -> Summary {
    let prompt = build_summary_prompt(content);
    match llm.generate(&prompt).await {
        Ok(text) => Summary::Available(text),
        Err(e) => {
            warn!("Summary generation failed for '{filename}': {e}");
            Summary::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::LlmError;

    #[tokio::test]
    async fn test_successful_call_yields_available_summary() {
        let llm = ScriptedGenerator::new(vec![Ok("A strong Rust candidate.".to_string())]);

        let summary = summarize(&llm, "jane.txt", "Jane Doe\nSkills: Go, Rust").await;

        assert_eq!(summary, Summary::Available("A strong Rust candidate.".to_string()));
    }

    #[tokio::test]
    async fn test_failed_call_downgrades_to_unavailable() {
        let llm = ScriptedGenerator::new(vec![Err(LlmError::EmptyContent)]);

        let summary = summarize(&llm, "jane.txt", "Jane Doe").await;

        assert_eq!(summary, Summary::Unavailable);
    }

    #[tokio::test]
    async fn test_prompt_contains_truncated_content() {
        let llm = ScriptedGenerator::new(vec![Ok("ok".to_string())]);
        let content = "y".repeat(3000);

        summarize(&llm, "long.txt", &content).await;

        let seen = llm.seen.lock().unwrap();
        let (history, prompt) = &seen[0];
        assert!(history.is_empty());
        assert!(prompt.contains(&"y".repeat(2000)));
        assert!(!prompt.contains(&"y".repeat(2001)));
    }

    #[test]
    fn test_into_option_maps_unavailable_to_none() {
        assert_eq!(Summary::Available("text".to_string()).into_option(), Some("text".to_string()));
        assert_eq!(Summary::Unavailable.into_option(), None);
    }
}
