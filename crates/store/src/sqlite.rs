//! SQLite conversation log.
//!
//! One table, `conversations`, with an autoincrement id, the user prompt,
//! the generated reply and an RFC 3339 timestamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crowdwiz_core::error::StoreError;
use crowdwiz_core::store::{ConversationRecord, ConversationStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A SQLite-backed [`ConversationStore`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a store from a connection string.
    ///
    /// Pass `"sqlite::memory:"` for an ephemeral database.
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?;
        let store = Self::connect(options).await?;
        info!("SQLite conversation store initialized at {url}");
        Ok(store)
    }

    /// Open (or create) the database file at `path`, creating parent
    /// directories as needed.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Storage(format!("Failed to create {}: {e}", parent.display())))?;
        }

        let options = SqliteConnectOptions::new().filename(path);
        let store = Self::connect(options).await?;
        info!(path = %path.display(), "SQLite conversation store initialized");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, StoreError> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        Self::from_pool(pool).await
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                user_prompt  TEXT NOT NULL,
                ai_response  TEXT NOT NULL,
                timestamp    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("conversations table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ConversationRecord, StoreError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let user_prompt: String = row
            .try_get("user_prompt")
            .map_err(|e| StoreError::QueryFailed(format!("user_prompt column: {e}")))?;
        let ai_response: String = row
            .try_get("ai_response")
            .map_err(|e| StoreError::QueryFailed(format!("ai_response column: {e}")))?;
        let timestamp: String = row
            .try_get("timestamp")
            .map_err(|e| StoreError::QueryFailed(format!("timestamp column: {e}")))?;

        let created_at = DateTime::parse_from_rfc3339(&timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|e| {
                warn!(id, %timestamp, "Unparseable timestamp: {e}");
                DateTime::<Utc>::UNIX_EPOCH
            });

        Ok(ConversationRecord {
            id,
            user_prompt,
            ai_response,
            created_at,
        })
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append(&self, user_prompt: &str, ai_response: &str) -> Result<ConversationRecord, StoreError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO conversations (user_prompt, ai_response, timestamp) VALUES (?1, ?2, ?3)",
        )
        .bind(user_prompt)
        .bind(ai_response)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(id, "Conversation stored");

        Ok(ConversationRecord {
            id,
            user_prompt: user_prompt.to_string(),
            ai_response: ai_response.to_string(),
            created_at,
        })
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ConversationRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query("SELECT * FROM conversations ORDER BY id DESC LIMIT ?1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT recent: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM conversations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("COUNT: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::QueryFailed(format!("cnt column: {e}")))?;

        Ok(cnt as usize)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM conversations")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("CLEAR failed: {e}")))?;

        Ok(())
    }
}
