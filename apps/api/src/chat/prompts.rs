// Chat prompt composition.

/// Builds the outbound prompt for one turn: the corpus context block followed
/// by the operator's message.
pub fn compose_turn_prompt(context: &str, user_text: &str) -> String {
    format!("CV Database Context:\n{context}\n\nUser Query: {user_text}")
}
