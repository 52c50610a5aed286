use std::sync::Arc;

use super::router::{Reply, ReplySource, Router};
use crate::ai::Generator;
use crate::context::{ConversationContext, Turn};

/// Reply for blank input; the context is left untouched.
pub const EMPTY_INPUT_REPLY: &str = "How can I help you?";

/// Caller side of the router: owns the conversation and records each turn.
pub struct ChatAgent {
    router: Router,
    generator: Arc<dyn Generator>,
    context: ConversationContext,
    history_turns: Option<usize>,
}

impl ChatAgent {
    pub fn new(router: Router, generator: Arc<dyn Generator>, history_turns: Option<usize>) -> Self {
        let context = ConversationContext::new();
        log::info!(
            "🤖 Agent ready for {}: backend={}, match mode={:?}, session={}",
            router.knowledge().company_name,
            generator.name(),
            router.match_mode(),
            context.session_id()
        );
        Self {
            router,
            generator,
            context,
            history_turns,
        }
    }

    pub async fn respond(&mut self, user_input: &str) -> Reply {
        if user_input.trim().is_empty() {
            return Reply {
                text: EMPTY_INPUT_REPLY.to_string(),
                source: ReplySource::EmptyInput,
            };
        }

        if self.context.is_empty() {
            log::debug!("🆕 First question of session {}", self.context.session_id());
        }

        let transcript = self.context.transcript(self.history_turns);
        let reply = self
            .router
            .resolve(user_input, &transcript, self.generator.as_ref())
            .await;

        let origin = if reply.source.is_canned() { "knowledge base" } else { "fallback" };
        log::info!(
            "💬 [{}] turn {} answered from {} ({})",
            self.context.session_id(),
            self.context.len() / 2 + 1,
            origin,
            reply.source
        );
        self.context.push_exchange(user_input, &reply.text);
        reply
    }

    pub fn clear_history(&mut self) {
        self.context.clear();
        log::info!("🗑️ Conversation cleared, new session {}", self.context.session_id());
    }

    pub fn history(&self) -> &[Turn] {
        self.context.turns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{FailingGenerator, StubGenerator};
    use crate::context::Speaker;
    use crate::knowledge::tests::shipped;

    fn agent_with(generator: Arc<dyn Generator>, history_turns: Option<usize>) -> ChatAgent {
        ChatAgent::new(Router::new(Arc::new(shipped())), generator, history_turns)
    }

    #[tokio::test]
    async fn test_blank_input_leaves_context_alone() {
        let stub = Arc::new(StubGenerator::new("x"));
        let mut agent = agent_with(stub.clone(), None);
        let reply = agent.respond("   ").await;
        assert_eq!(reply.text, EMPTY_INPUT_REPLY);
        assert_eq!(reply.source, ReplySource::EmptyInput);
        assert!(agent.history().is_empty());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_each_exchange_appends_two_turns() {
        let stub = Arc::new(StubGenerator::new("Sunny."));
        let mut agent = agent_with(stub.clone(), None);

        agent.respond("Hello there").await;
        let reply = agent.respond("What is the weather today?").await;
        assert_eq!(reply.text, "Sunny.");

        let history = agent.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].speaker, Speaker::User);
        assert_eq!(history[3].speaker, Speaker::Assistant);
        assert_eq!(history[3].text, "Sunny.");

        // the fallback saw the transcript from before this turn
        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0,
            "\nUser: Hello there\nAI: Hello, I am an AI assistant from Vertex AI Solutions. How can I help you?"
        );
        assert_eq!(calls[0].1, "What is the weather today?");
    }

    #[tokio::test]
    async fn test_history_limit_only_shortens_prompt() {
        let stub = Arc::new(StubGenerator::new("ok"));
        let mut agent = agent_with(stub.clone(), Some(2));

        agent.respond("first question here?").await;
        agent.respond("second question here?").await;
        agent.respond("another question here?").await;

        let calls = stub.calls();
        assert_eq!(calls[2].0, "\nUser: second question here?\nAI: ok");
        assert_eq!(agent.history().len(), 6);
    }

    #[tokio::test]
    async fn test_failures_are_recorded_as_apologies() {
        let mut agent = agent_with(Arc::new(FailingGenerator), None);
        let reply = agent.respond("What is the weather today?").await;
        assert_eq!(reply.source, ReplySource::Unavailable);
        assert_eq!(agent.history()[1].text, reply.text);
    }

    #[tokio::test]
    async fn test_clear_history() {
        let mut agent = agent_with(Arc::new(StubGenerator::new("ok")), None);
        agent.respond("How can I contact you?").await;
        agent.clear_history();
        assert!(agent.history().is_empty());
    }
}
