//! ConversationStore trait: the append-only log of interview turns.
//!
//! Each record pairs one user prompt with the generated reply. The log is
//! write-mostly: the interview engine never reads it back (state lives in
//! the caller's history), it exists for auditing and the `history` command.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::StoreError;

/// One persisted prompt/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Monotonic insertion id
    pub id: i64,

    /// What the user sent
    pub user_prompt: String,

    /// What the backend generated
    pub ai_response: String,

    /// When the pair was stored
    pub created_at: DateTime<Utc>,
}

/// The core ConversationStore trait.
///
/// Implementations: SQLite, in-memory (for testing), none (no-op).
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory", "none").
    fn name(&self) -> &str;

    /// Append a prompt/response pair and return the stored record.
    async fn append(&self, user_prompt: &str, ai_response: &str) -> std::result::Result<ConversationRecord, StoreError>;

    /// Most recent records, newest first.
    async fn recent(&self, limit: usize) -> std::result::Result<Vec<ConversationRecord>, StoreError>;

    /// Total number of stored records.
    async fn count(&self) -> std::result::Result<usize, StoreError>;

    /// Remove every record.
    async fn clear(&self) -> std::result::Result<(), StoreError>;
}
