use async_trait::async_trait;
use crate::history::{ HistoryError, HistoryStore };
use crate::models::chat::ChatMessage;
use tokio::sync::Mutex;

/// Process-lifetime log. Lost on restart.
#[derive(Default)]
pub struct MemoryHistoryStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append_exchange(
        &self,
        user: ChatMessage,
        assistant: ChatMessage
    ) -> Result<(), HistoryError> {
        let mut messages = self.messages.lock().await;
        messages.push(user);
        messages.push(assistant);
        Ok(())
    }

    async fn get_history(&self) -> Result<Vec<ChatMessage>, HistoryError> {
        Ok(self.messages.lock().await.clone())
    }

    async fn clear(&self) -> Result<(), HistoryError> {
        self.messages.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    #[tokio::test]
    async fn appends_pairs_in_order() {
        let store = MemoryHistoryStore::new();
        store.append_exchange(ChatMessage::user("a"), ChatMessage::assistant("b")).await.unwrap();
        store.append_exchange(ChatMessage::user("c"), ChatMessage::assistant("d")).await.unwrap();

        let history = store.get_history().await.unwrap();
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["a", "b", "c", "d"]);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn clear_empties_the_log() {
        let store = MemoryHistoryStore::new();
        store.append_exchange(ChatMessage::user("a"), ChatMessage::assistant("b")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.get_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn snapshot_is_detached_from_later_writes() {
        let store = MemoryHistoryStore::new();
        let before = store.get_history().await.unwrap();
        store.append_exchange(ChatMessage::user("a"), ChatMessage::assistant("b")).await.unwrap();
        assert!(before.is_empty());
    }
}
