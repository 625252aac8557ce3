mod memory;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use thiserror::Error;
use crate::models::chat::ChatMessage;

pub use memory::MemoryHistoryStore;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a user turn and its reply as a single step; readers never
    /// see one without the other.
    async fn append_exchange(
        &self,
        user: ChatMessage,
        assistant: ChatMessage
    ) -> Result<(), HistoryError>;

    async fn get_history(&self) -> Result<Vec<ChatMessage>, HistoryError>;

    async fn clear(&self) -> Result<(), HistoryError>;
}

pub fn initialize_history_store() -> Arc<dyn HistoryStore> {
    info!("Chat history will be kept in memory for the lifetime of the process");
    Arc::new(MemoryHistoryStore::new())
}
