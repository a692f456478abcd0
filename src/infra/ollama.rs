use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::provider::ProviderKey;
use crate::error::{AppError, AppResult};
use crate::infra::{ChatMessage, conversation};
use crate::services::GenerationProvider;

pub const DEFAULT_LOCAL_MODEL: &str = "llama3";
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

/// Local inference server speaking the Ollama chat API.
pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Names of the models the server has pulled.
    pub async fn list_models(&self) -> AppResult<Vec<String>> {
        let unavailable = |reason: String| AppError::ProviderUnavailable {
            provider: ProviderKey::Local,
            reason,
        };

        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|err| unavailable(format!("failed to reach Ollama: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("Ollama responded with {status}")));
        }

        let tags: OllamaTags = response
            .json()
            .await
            .map_err(|err| unavailable(format!("failed to parse Ollama response: {err}")))?;
        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }
}

#[async_trait]
impl GenerationProvider for OllamaClient {
    fn key(&self) -> ProviderKey {
        ProviderKey::Local
    }

    fn default_model(&self) -> &str {
        DEFAULT_LOCAL_MODEL
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_content: &str,
        model_override: Option<&str>,
    ) -> AppResult<String> {
        let model = self.resolve_model(model_override);
        info!(%model, "requesting local completion");

        let request_body = OllamaChatRequest {
            model: &model,
            messages: conversation(system_prompt, user_content),
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request_body)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await
            .map_err(|err| {
                AppError::generation(ProviderKey::Local, format!("failed to call Ollama: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::generation(
                ProviderKey::Local,
                format!("Ollama responded with {status}: {body}"),
            ));
        }

        let payload: OllamaChatResponse = response.json().await.map_err(|err| {
            AppError::generation(
                ProviderKey::Local,
                format!("failed to parse Ollama response: {err}"),
            )
        })?;

        let content = payload
            .message
            .and_then(|message| message.content)
            .unwrap_or_default();
        debug!(chars = content.len(), "local completion received");
        Ok(content)
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::spawn_stub;

    fn chat_router(seen: Arc<Mutex<Option<Value>>>, status: StatusCode, reply: Value) -> Router {
        Router::new().route(
            "/api/chat",
            post(move |Json(body): Json<Value>| {
                let seen = seen.clone();
                let reply = reply.clone();
                async move {
                    *seen.lock().unwrap() = Some(body);
                    (status, Json(reply))
                }
            }),
        )
    }

    #[tokio::test]
    async fn posts_non_streaming_chat() {
        let seen = Arc::new(Mutex::new(None));
        let reply = json!({ "model": "llama3", "message": { "role": "assistant", "content": "plan body" }, "done": true });
        let base = spawn_stub(chat_router(seen.clone(), StatusCode::OK, reply)).await;

        let client = OllamaClient::new(format!("{base}/"));
        let content = client.generate("system", "user", None).await.unwrap();
        assert_eq!(content, "plan body");

        let body = seen.lock().unwrap().take().unwrap();
        assert_eq!(body["model"], DEFAULT_LOCAL_MODEL);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
    }

    #[tokio::test]
    async fn missing_message_content_is_empty() {
        let seen = Arc::new(Mutex::new(None));
        let base = spawn_stub(chat_router(seen, StatusCode::OK, json!({ "done": true }))).await;

        let content = OllamaClient::new(base)
            .generate("system", "user", Some("mistral"))
            .await
            .unwrap();
        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn server_error_is_generation_error() {
        let seen = Arc::new(Mutex::new(None));
        let reply = json!({ "error": "model 'llama3' not found" });
        let base = spawn_stub(chat_router(seen, StatusCode::NOT_FOUND, reply)).await;

        let err = OllamaClient::new(base)
            .generate("system", "user", None)
            .await
            .unwrap_err();
        match err {
            AppError::Generation { provider, message } => {
                assert_eq!(provider, ProviderKey::Local);
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_generation_error() {
        let err = OllamaClient::new("http://127.0.0.1:1".to_string())
            .generate("system", "user", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Generation {
                provider: ProviderKey::Local,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn lists_pulled_models() {
        let router = Router::new().route(
            "/api/tags",
            get(|| async {
                Json(json!({ "models": [{ "name": "llama3:latest" }, { "name": "mistral:7b" }] }))
            }),
        );
        let base = spawn_stub(router).await;

        let models = OllamaClient::new(base).list_models().await.unwrap();
        assert_eq!(models, vec!["llama3:latest", "mistral:7b"]);
    }
}
