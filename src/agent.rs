use crate::config::responses::KeywordResponses;
use crate::error::ChatError;
use crate::history::{ initialize_history_store, HistoryStore };
use crate::models::chat::ChatMessage;

use log::{ debug, info };
use std::sync::Arc;

#[derive(Clone)]
pub struct ChatAgent {
    responses: Arc<KeywordResponses>,
    history_store: Arc<dyn HistoryStore>,
}

impl ChatAgent {
    pub fn new(responses: Arc<KeywordResponses>) -> Self {
        Self::with_history_store(responses, initialize_history_store())
    }

    pub fn with_history_store(
        responses: Arc<KeywordResponses>,
        history_store: Arc<dyn HistoryStore>
    ) -> Self {
        Self { responses, history_store }
    }

    pub fn responses(&self) -> &KeywordResponses {
        &self.responses
    }

    /// Records the trimmed message and its reply, then returns the reply.
    /// Blank input is rejected before anything is written.
    pub async fn process_message(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let user_message = ChatMessage::user(message);
        let reply = self.responses.reply_for(message);
        let assistant_message = ChatMessage::assistant(reply.clone());
        debug!("Reply for '{}': '{}'", message, reply);

        self.history_store.append_exchange(user_message, assistant_message).await?;
        Ok(reply)
    }

    pub async fn history(&self) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.history_store.get_history().await?)
    }

    pub async fn clear_history(&self) -> Result<(), ChatError> {
        self.history_store.clear().await?;
        info!("Conversation history cleared");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::history::HistoryError;
    use crate::models::chat::Role;
    use async_trait::async_trait;

    /// Store that refuses every operation.
    pub(crate) struct BrokenHistoryStore;

    #[async_trait]
    impl HistoryStore for BrokenHistoryStore {
        async fn append_exchange(
            &self,
            _user: ChatMessage,
            _assistant: ChatMessage
        ) -> Result<(), HistoryError> {
            Err(HistoryError::Unavailable("append refused".into()))
        }

        async fn get_history(&self) -> Result<Vec<ChatMessage>, HistoryError> {
            Err(HistoryError::Unavailable("read refused".into()))
        }

        async fn clear(&self) -> Result<(), HistoryError> {
            Err(HistoryError::Unavailable("clear refused".into()))
        }
    }

    fn agent() -> ChatAgent {
        ChatAgent::new(Arc::new(KeywordResponses::default()))
    }

    #[tokio::test]
    async fn exchange_appends_user_then_assistant() {
        let agent = agent();
        let reply = agent.process_message("  tell me something  ").await.unwrap();
        assert!(!reply.is_empty());

        let history = agent.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "tell me something");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content, reply);
        assert!(history[0].timestamp <= history[1].timestamp);
    }

    #[tokio::test]
    async fn blank_messages_are_rejected_without_mutation() {
        let agent = agent();
        for input in ["", "   ", "\n\t"] {
            let err = agent.process_message(input).await.unwrap_err();
            assert!(matches!(err, ChatError::EmptyMessage));
        }
        assert!(agent.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keyword_lookup_ignores_case() {
        let reply = agent().process_message("HELLO there").await.unwrap();
        assert_eq!(reply, "Hello! 👋 How can I help you today?");
    }

    #[tokio::test]
    async fn unmatched_reply_contains_input() {
        let reply = agent().process_message("xyz123").await.unwrap();
        assert!(reply.contains("xyz123"));
    }

    #[tokio::test]
    async fn two_exchanges_alternate_roles_in_call_order() {
        let agent = agent();
        agent.process_message("first").await.unwrap();
        agent.process_message("second").await.unwrap();

        let history = agent.history().await.unwrap();
        let roles: Vec<_> = history.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[2].content, "second");
    }

    #[tokio::test]
    async fn clear_then_history_is_empty() {
        let agent = agent();
        agent.process_message("bye").await.unwrap();
        agent.clear_history().await.unwrap();
        assert!(agent.history().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_exchanges_stay_paired() {
        let agent = agent();
        let mut handles = Vec::new();
        for i in 0..64 {
            let agent = agent.clone();
            handles.push(tokio::spawn(async move {
                agent.process_message(&format!("msg-{}", i)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let history = agent.history().await.unwrap();
        assert_eq!(history.len(), 128);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            let expected = agent.responses().default_template().replace("{message}", &pair[0].content);
            assert_eq!(pair[1].content, expected);
        }
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_internal_error() {
        let agent = ChatAgent::with_history_store(
            Arc::new(KeywordResponses::default()),
            Arc::new(BrokenHistoryStore)
        );
        let err = agent.process_message("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::History(_)));
        assert!(!err.is_validation());
    }
}
