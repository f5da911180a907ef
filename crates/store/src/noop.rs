//! No-op store: disables the conversation log entirely.

use async_trait::async_trait;
use chrono::Utc;
use crowdwiz_core::error::StoreError;
use crowdwiz_core::store::{ConversationRecord, ConversationStore};

/// A store that keeps nothing.
pub struct NoopStore;

#[async_trait]
impl ConversationStore for NoopStore {
    fn name(&self) -> &str { "none" }

    async fn append(&self, user_prompt: &str, ai_response: &str) -> Result<ConversationRecord, StoreError> {
        Ok(ConversationRecord {
            id: 0,
            user_prompt: user_prompt.to_string(),
            ai_response: ai_response.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<ConversationRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(0)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
