//! Interview endpoints: `/generate` and `/generate_narrative`.
//!
//! Both handlers are stateless. The caller sends the whole history on every
//! request and the stage is recomputed from its markers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crowdwiz_core::{
    build_narrative_prompt, build_prompt, extract_answers, GenerateRequest, Progress, Turn,
    WizardError,
};

use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct GeneratePayload {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub context: Option<Vec<Turn>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateReply {
    pub response: String,
    pub stage: Progress,
    /// The assembled prompt, shown by the front-end for transparency.
    pub thought_process: String,
}

#[derive(Debug, Deserialize)]
pub struct NarrativePayload {
    #[serde(default)]
    pub context: Option<Vec<Turn>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NarrativeReply {
    pub narrative: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection, "Rejected request body");
    no_input()
}

fn no_input() -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "No input data provided")
}

fn bad_marker(err: WizardError) -> ApiError {
    warn!(error = %err, "Malformed conversation history");
    api_error(StatusCode::BAD_REQUEST, err.to_string())
}

pub async fn generate_handler(
    State(state): State<SharedState>,
    payload: Result<Json<GeneratePayload>, JsonRejection>,
) -> Result<Json<GenerateReply>, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;

    // `{}` and `[]` carry nothing at all
    if payload.prompt.is_none() && payload.context.is_none() {
        warn!("Empty request body");
        return Err(no_input());
    }

    let prompt = match payload.prompt {
        Some(p) if !p.is_empty() => p,
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "No prompt provided")),
    };
    let context = payload.context.unwrap_or_default();

    let assembled = build_prompt(&prompt, &context).map_err(bad_marker)?;
    info!(
        stage = %assembled.stage,
        history_len = context.len(),
        "Interview turn"
    );

    let request = GenerateRequest::new(&state.model, assembled.prompt.clone())
        .with_temperature(state.temperature);

    let generated = state.provider.generate(request).await.map_err(|e| {
        error!(provider = state.provider.name(), error = %e, "Generation failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Could not connect to the generation backend. Is it running? Details: {e}"),
        )
    })?;

    match state.store.append(&prompt, &generated.text).await {
        Ok(record) => debug!(id = record.id, store = state.store.name(), "Turn persisted"),
        Err(e) => warn!(error = %e, "Failed to persist conversation turn"),
    }

    Ok(Json(GenerateReply {
        response: generated.text,
        stage: assembled.stage,
        thought_process: assembled.prompt,
    }))
}

pub async fn narrative_handler(
    State(state): State<SharedState>,
    payload: Result<Json<NarrativePayload>, JsonRejection>,
) -> Result<Json<NarrativeReply>, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let Some(context) = payload.context else {
        warn!("Narrative requested without a history");
        return Err(no_input());
    };

    let answers = extract_answers(&context).map_err(bad_marker)?;
    info!(answered = answers.answered(), "Narrative requested");

    let request = GenerateRequest::new(&state.model, build_narrative_prompt(&answers))
        .with_temperature(state.temperature);

    let generated = state.provider.generate(request).await.map_err(|e| {
        error!(provider = state.provider.name(), error = %e, "Narrative generation failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!(
                "Could not connect to the generation backend for narrative. Is it running? Details: {e}"
            ),
        )
    })?;

    Ok(Json(NarrativeReply {
        narrative: generated.text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_router, GatewayState};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use crowdwiz_core::error::{ProviderError, StoreError};
    use crowdwiz_core::{
        ConversationRecord, ConversationStore, GenerateResponse, Provider, Stage, COMPLETION_MESSAGE,
    };
    use crowdwiz_store::InMemoryStore;
    use http_body_util::BodyExt;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Replies with a fixed text and remembers every prompt it saw.
    struct MockProvider {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
            self.prompts.lock().unwrap().push(request.prompt);
            Ok(GenerateResponse {
                text: self.reply.clone(),
                model: request.model,
                usage: None,
            })
        }
    }

    struct DownProvider;

    #[async_trait]
    impl Provider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ConversationStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        async fn append(&self, _p: &str, _r: &str) -> Result<ConversationRecord, StoreError> {
            Err(StoreError::Storage("disk full".into()))
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

    fn state_with(provider: Arc<dyn Provider>, store: Arc<dyn ConversationStore>) -> SharedState {
        Arc::new(GatewayState {
            provider,
            store,
            model: "mock-model".into(),
            temperature: 0.7,
            allowed_origins: Vec::new(),
        })
    }

    async fn post_json(state: SharedState, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = build_router(state).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn all_markers() -> Vec<serde_json::Value> {
        Stage::ALL
            .iter()
            .map(|s| serde_json::json!({"role": "system", "content": format!("question_asked: {}", s.id())}))
            .collect()
    }

    #[tokio::test]
    async fn first_turn_asks_for_description() {
        let provider = Arc::new(MockProvider::new("Please describe your challenge."));
        let store = Arc::new(InMemoryStore::new());
        let state = state_with(provider.clone(), store.clone());

        let (status, json) = post_json(
            state,
            "/generate",
            serde_json::json!({"prompt": "I want to run a challenge", "context": []}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stage"], "description");
        assert_eq!(json["response"], "Please describe your challenge.");
        assert_eq!(json["thought_process"], provider.last_prompt());
        assert!(provider
            .last_prompt()
            .ends_with(Stage::Description.question()));

        let records = store.recent(5).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_prompt, "I want to run a challenge");
    }

    #[tokio::test]
    async fn stage_follows_markers() {
        let state = state_with(Arc::new(MockProvider::new("ok")), Arc::new(InMemoryStore::new()));
        let (status, json) = post_json(
            state,
            "/generate",
            serde_json::json!({
                "prompt": "An ideation challenge",
                "context": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "Describe it"},
                    {"role": "system", "content": "question_asked: description"},
                    {"role": "user", "content": "Water purification"},
                    {"role": "assistant", "content": "What type?"},
                    {"role": "system", "content": "question_asked: type"}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stage"], "goals");
    }

    #[tokio::test]
    async fn complete_history_reports_complete() {
        let provider = Arc::new(MockProvider::new("Shall we review?"));
        let state = state_with(provider.clone(), Arc::new(InMemoryStore::new()));
        let (status, json) = post_json(
            state,
            "/generate",
            serde_json::json!({"prompt": "done?", "context": all_markers()}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stage"], "complete");
        assert!(provider.last_prompt().ends_with(COMPLETION_MESSAGE));
    }

    #[tokio::test]
    async fn missing_prompt_is_rejected() {
        let provider = Arc::new(MockProvider::new("unused"));
        let state = state_with(provider.clone(), Arc::new(InMemoryStore::new()));

        let (status, json) = post_json(state.clone(), "/generate", serde_json::json!({"context": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No prompt provided");

        let (status, _) = post_json(state, "/generate", serde_json::json!({"prompt": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_marker_is_bad_request() {
        let state = state_with(Arc::new(MockProvider::new("unused")), Arc::new(InMemoryStore::new()));
        let (status, json) = post_json(
            state,
            "/generate",
            serde_json::json!({
                "prompt": "hello",
                "context": [{"role": "system", "content": "question_asked"}]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Malformed stage marker"));
    }

    #[tokio::test]
    async fn invalid_body_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/generate")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let state = state_with(Arc::new(MockProvider::new("unused")), Arc::new(InMemoryStore::new()));

        let response = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_generate_body_is_bad_request() {
        let provider = Arc::new(MockProvider::new("unused"));
        let state = state_with(provider.clone(), Arc::new(InMemoryStore::new()));

        for body in [serde_json::json!({}), serde_json::json!([])] {
            let (status, json) = post_json(state.clone(), "/generate", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "No input data provided");
        }
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn narrative_empty_body_is_bad_request() {
        let provider = Arc::new(MockProvider::new("unused"));
        let state = state_with(provider.clone(), Arc::new(InMemoryStore::new()));

        for body in [serde_json::json!({}), serde_json::json!([])] {
            let (status, json) = post_json(state.clone(), "/generate_narrative", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "No input data provided");
        }
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_server_error() {
        let state = state_with(Arc::new(DownProvider), Arc::new(InMemoryStore::new()));
        let (status, json) = post_json(state, "/generate", serde_json::json!({"prompt": "hi"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = json["error"].as_str().unwrap();
        assert!(message.starts_with("Could not connect to the generation backend"));
        assert!(message.contains("connection refused"));
    }

    #[tokio::test]
    async fn store_failure_does_not_fail_the_turn() {
        let state = state_with(Arc::new(MockProvider::new("still here")), Arc::new(BrokenStore));
        let (status, json) = post_json(state, "/generate", serde_json::json!({"prompt": "hi"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], "still here");
    }

    #[tokio::test]
    async fn narrative_uses_extracted_answers() {
        let provider = Arc::new(MockProvider::new("Once upon a challenge..."));
        let store = Arc::new(InMemoryStore::new());
        let state = state_with(provider.clone(), store.clone());

        let (status, json) = post_json(
            state,
            "/generate_narrative",
            serde_json::json!({
                "context": [
                    {"role": "system", "content": "question_asked: prize"},
                    {"role": "user", "content": "$10k for first place"}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["narrative"], "Once upon a challenge...");

        let prompt = provider.last_prompt();
        assert!(prompt.contains("Prize Structure: $10k for first place\n"));
        assert!(prompt.contains("Description: Not provided\n"));
        assert!(prompt.ends_with("Please generate the challenge narrative:"));

        // Narratives are not logged
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn narrative_backend_failure_is_server_error() {
        let state = state_with(Arc::new(DownProvider), Arc::new(InMemoryStore::new()));
        let (status, json) = post_json(state, "/generate_narrative", serde_json::json!({"context": []})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("for narrative"));
    }
}
