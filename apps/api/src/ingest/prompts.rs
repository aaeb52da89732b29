// Ingestion prompt templates.

/// CV content included in the summary prompt is capped at this many
/// characters to bound prompt cost.
const SUMMARY_CONTENT_CHARS: usize = 2000;

const SUMMARY_INSTRUCTION: &str = "Analyze this CV and provide a brief summary \
    (2-3 sentences) highlighting key skills, experience, and qualifications:";

/// Builds the one-shot summary prompt from extracted CV content.
pub fn build_summary_prompt(content: &str) -> String {
    format!(
        "{SUMMARY_INSTRUCTION}\n\n{}",
        truncate_chars(content, SUMMARY_CONTENT_CHARS)
    )
}

/// First `limit` characters of `text`. Counts characters, not bytes; slicing
/// on a byte index could split a multibyte character.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_embeds_content_after_instruction() {
        let prompt = build_summary_prompt("Jane Doe\nSkills: Go, Rust");
        assert_eq!(
            prompt,
            "Analyze this CV and provide a brief summary (2-3 sentences) \
             highlighting key skills, experience, and qualifications:\n\n\
             Jane Doe\nSkills: Go, Rust"
        );
    }

    #[test]
    fn test_summary_prompt_caps_content_at_2000_chars() {
        let content = "x".repeat(5000);
        let prompt = build_summary_prompt(&content);
        let embedded = prompt.split("\n\n").nth(1).unwrap();
        assert_eq!(embedded.chars().count(), 2000);
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        let content = "é".repeat(2500);
        assert_eq!(truncate_chars(&content, 2000).chars().count(), 2000);
    }

    #[test]
    fn test_truncate_chars_keeps_short_text_whole() {
        assert_eq!(truncate_chars("short", 2000), "short");
    }
}
