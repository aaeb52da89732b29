use crate::errors::AppError;
use crate::models::chat::{Role, Turn};

/// Session lifecycle. `AwaitingReply` covers the window between a submitted
/// message and the reply (or failure) that resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingReply,
}

/// Token handed out by `begin`: the service-side history snapshot the caller
/// needs for the LLM call, plus the epoch that ties the eventual outcome back
/// to this turn. A `reset` in between makes the token stale.
#[derive(Debug)]
pub struct PendingTurn {
    epoch: u64,
    pub history: Vec<Turn>,
}

/// In-memory conversation state. Two histories are kept:
///
/// - the **transcript**: the raw messages the operator typed and the replies,
///   as shown by the history and export endpoints;
/// - the **service history**: the context-enriched prompts actually sent to
///   the model. Only successful turns land here, so a failed turn is never
///   replayed to the model.
///
/// Nothing is persisted; a process restart starts a fresh conversation.
#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<Turn>,
    service_history: Vec<Turn>,
    state: SessionState,
    epoch: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The transcript, oldest turn first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Records the user's message and moves to `AwaitingReply`. Rejected when
    /// a previous turn is still in flight.
    ///
    /// The user turn is recorded before the outcome is known and is kept even
    /// if the turn later fails.
    pub fn begin(&mut self, user_text: &str) -> Result<PendingTurn, AppError> {
        if self.state == SessionState::AwaitingReply {
            return Err(AppError::ChatBusy);
        }
        self.epoch += 1;
        self.turns.push(Turn::user(user_text));
        self.state = SessionState::AwaitingReply;
        Ok(PendingTurn {
            epoch: self.epoch,
            history: self.service_history.clone(),
        })
    }

    /// Resolves the turn begun by `pending` with a successful reply. The
    /// composed prompt and the reply extend the service history; the
    /// transcript gets the reply. A stale token is discarded without effect.
    pub fn complete(&mut self, pending: &PendingTurn, prompt: String, reply: String) {
        if !self.accepts(pending) {
            return;
        }
        self.service_history.push(Turn::user(prompt));
        self.service_history.push(Turn::assistant(reply.clone()));
        self.turns.push(Turn::assistant(reply));
        self.state = SessionState::Idle;
    }

    /// Resolves the turn begun by `pending` as failed: no assistant turn, the
    /// user message stays in the transcript, and the session accepts new
    /// submissions.
    pub fn fail(&mut self, pending: &PendingTurn) {
        if !self.accepts(pending) {
            return;
        }
        self.state = SessionState::Idle;
    }

    fn accepts(&self, pending: &PendingTurn) -> bool {
        self.state == SessionState::AwaitingReply && pending.epoch == self.epoch
    }

    /// Clears both histories and returns to `Idle`. Permitted in either
    /// state; a reply still in flight is discarded when it lands.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.service_history.clear();
        self.state = SessionState::Idle;
        self.epoch += 1;
    }

    /// Renders the transcript as a plain-text log, one labeled paragraph per
    /// turn.
    pub fn export(&self) -> String {
        let mut log = String::new();
        for turn in &self.turns {
            let label = match turn.role {
                Role::User => "You",
                Role::Assistant => "Gemini",
            };
            log.push_str(&format!("{label}: {}\n\n", turn.content));
        }
        log
    }
}
