//! Caller-owned conversation transcript.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// Append-only sequence of turns. The router only ever sees the rendered
/// transcript, never the context itself.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    session_id: Uuid,
    turns: Vec<Turn>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            turns: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            text: text.into(),
        });
    }

    /// Records one full exchange.
    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.push(Speaker::User, question);
        self.push(Speaker::Assistant, answer);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Renders the transcript handed to the model, one `"\n{Speaker}: {text}"`
    /// line per turn. `last_turns` limits the rendering to the most recent
    /// turns; the stored history is untouched.
    pub fn transcript(&self, last_turns: Option<usize>) -> String {
        let skip = last_turns
            .map(|n| self.turns.len().saturating_sub(n))
            .unwrap_or(0);

        let mut out = String::new();
        for turn in &self.turns[skip..] {
            out.push('\n');
            out.push_str(turn.speaker.label());
            out.push_str(": ");
            out.push_str(&turn.text);
        }
        out
    }

    /// Starts a fresh session.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.session_id = Uuid::new_v4();
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}
