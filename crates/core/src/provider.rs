//! Provider trait: the abstraction over text-generation backends.
//!
//! A Provider takes one flat prompt string and returns the generated text.
//! The interview engine never calls a provider itself; the gateway and CLI
//! do, after assembling the prompt.
//!
//! Implementations: Ollama (native `/api/generate`), OpenAI-compatible.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The model to use (e.g., "qwen3:latest", "gpt-4o-mini")
    pub model: String,

    /// The fully assembled prompt
    pub prompt: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated text, trimmed of surrounding whitespace
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Calls are made once; a failure surfaces to the caller as a
/// [`ProviderError`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Send a prompt and get the generated text.
    async fn generate(&self, request: GenerateRequest) -> std::result::Result<GenerateResponse, ProviderError>;

    /// List available models for this provider.
    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }

    /// Whether the provider is reachable.
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
            Ok(GenerateResponse {
                text: request.prompt,
                model: request.model,
                usage: None,
            })
        }
    }

    #[test]
    fn generate_request_defaults() {
        let req = GenerateRequest::new("qwen3:latest", "Hello");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());

        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("max_tokens"));
    }

    #[tokio::test]
    async fn default_trait_methods() {
        let provider = EchoProvider;
        assert!(provider.health_check().await.unwrap());
        assert!(provider.list_models().await.unwrap().is_empty());

        let resp = provider
            .generate(GenerateRequest::new("m", "ping").with_temperature(0.0))
            .await
            .unwrap();
        assert_eq!(resp.text, "ping");
    }
}
