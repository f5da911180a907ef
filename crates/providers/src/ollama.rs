//! Native Ollama provider.
//!
//! Talks to Ollama's `/api/generate` endpoint, which takes a single flat
//! prompt, the shape the interview engine produces.

use async_trait::async_trait;
use crowdwiz_core::error::ProviderError;
use crowdwiz_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default local Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// An Ollama provider using the non-streaming generate API.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a provider for the Ollama server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Provider for the default local server.
    pub fn local() -> Self {
        Self::new(DEFAULT_OLLAMA_URL)
    }

    fn to_api_request(request: &GenerateRequest) -> ApiGenerateRequest<'_> {
        ApiGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: ApiOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<GenerateResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        debug!(
            model = %request.model,
            prompt_preview = %preview(&request.prompt, 300),
            "Sending generate request to Ollama"
        );

        let response = self
            .client
            .post(&url)
            .json(&Self::to_api_request(&request))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Ollama returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiGenerateResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let text = api_response.response.trim().to_string();
        debug!(response_preview = %preview(&text, 200), "Ollama response received");

        let usage = match (api_response.prompt_eval_count, api_response.eval_count) {
            (Some(prompt_tokens), Some(completion_tokens)) => Some(Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
            _ => None,
        };

        Ok(GenerateResponse {
            text,
            model: api_response.model.unwrap_or(request.model),
            usage,
        })
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let tags: ApiTagsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

/// First `max` characters of `text`, for log lines.
pub(crate) fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

// --- Ollama API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
struct ApiOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiGenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiTagsResponse {
    #[serde(default)]
    models: Vec<ApiTag>,
}

#[derive(Debug, Deserialize)]
struct ApiTag {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn local_constructor() {
        let provider = OllamaProvider::local();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.base_url, "http://localhost:11434");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = OllamaProvider::new("http://gpu-box:11434/");
        assert_eq!(provider.base_url, "http://gpu-box:11434");
    }

    #[test]
    fn request_body_is_non_streaming() {
        let request = GenerateRequest::new("qwen3:latest", "Hello");
        let body = serde_json::to_value(OllamaProvider::to_api_request(&request)).unwrap();
        assert_eq!(body["model"], "qwen3:latest");
        assert_eq!(body["prompt"], "Hello");
        assert_eq!(body["stream"], false);
        assert!(body["options"].get("num_predict").is_none());
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("héllo wörld", 4), "héll...");
    }

    #[tokio::test]
    async fn generate_trims_response_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "qwen3:latest",
                "prompt": "Describe it",
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"model":"qwen3:latest","response":"  Please describe your challenge.\n","done":true,"prompt_eval_count":12,"eval_count":6}"#,
            )
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url());
        let resp = provider
            .generate(GenerateRequest::new("qwen3:latest", "Describe it"))
            .await
            .unwrap();

        assert_eq!(resp.text, "Please describe your challenge.");
        assert_eq!(resp.usage.unwrap().total_tokens, 18);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_maps_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("model crashed")
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url());
        let err = provider
            .generate(GenerateRequest::new("qwen3:latest", "hi"))
            .await
            .unwrap_err();

        match err {
            ProviderError::ApiError { status_code, message } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "model crashed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_model_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url());
        let err = provider
            .generate(GenerateRequest::new("nope:latest", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotFound(m) if m == "nope:latest"));
    }

    #[tokio::test]
    async fn list_models_reads_tags() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"models":[{"name":"qwen3:latest"},{"name":"llama3.1:8b"}]}"#)
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url());
        let models = provider.list_models().await.unwrap();
        assert_eq!(models, vec!["qwen3:latest", "llama3.1:8b"]);
        assert!(provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 9 (discard) is not an HTTP server
        let provider = OllamaProvider::new("http://127.0.0.1:9");
        let err = provider
            .generate(GenerateRequest::new("qwen3:latest", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
