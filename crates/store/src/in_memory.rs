//! In-memory store: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use chrono::Utc;
use crowdwiz_core::error::StoreError;
use crowdwiz_core::store::{ConversationRecord, ConversationStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps records in a Vec, in insertion order.
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<ConversationRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    fn name(&self) -> &str { "in_memory" }

    async fn append(&self, user_prompt: &str, ai_response: &str) -> Result<ConversationRecord, StoreError> {
        let mut records = self.records.write().await;
        let id = records.last().map_or(1, |r| r.id + 1);
        let record = ConversationRecord {
            id,
            user_prompt: user_prompt.to_string(),
            ai_response: ai_response.to_string(),
            created_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ConversationRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.records.write().await.clear();
        Ok(())
    }
}
