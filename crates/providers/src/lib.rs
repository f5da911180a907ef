//! Generation backend implementations for CrowdWiz.
//!
//! All providers implement the `crowdwiz_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod ollama;
pub mod openai_compat;
pub mod router;

pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
