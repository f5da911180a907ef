//! Error types for the CrowdWiz domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all CrowdWiz operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Interview engine errors ---
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Malformed input handed to the interview engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// A system turn mentions `question_asked` but does not split into
    /// exactly two `": "`-delimited parts.
    #[error("Malformed stage marker at turn {position}: {content:?}")]
    MalformedMarker { position: usize, content: String },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}
