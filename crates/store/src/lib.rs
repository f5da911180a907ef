//! Conversation log backends for CrowdWiz.

pub mod noop;
pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use noop::NoopStore;
pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crowdwiz_config::StoreConfig;
use crowdwiz_core::error::StoreError;
use crowdwiz_core::store::ConversationStore;
use std::sync::Arc;

/// Open the backend named in `[store]`.
pub async fn build_from_config(config: &StoreConfig) -> Result<Arc<dyn ConversationStore>, StoreError> {
    match config.backend.as_str() {
        "none" => Ok(Arc::new(NoopStore)),
        "in_memory" => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(SqliteStore::open(&config.database_path()).await?)),
        other => Err(StoreError::Storage(format!("Unsupported store backend '{other}'"))),
    }
}
