use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::provider::ProviderKey;
use crate::error::{AppError, AppResult};
use crate::infra::{ChatMessage, conversation};
use crate::services::GenerationProvider;

pub const DEFAULT_HOSTED_MODEL: &str = "llama-3.3-70b-versatile";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4096;

/// Hosted chat-completions backend (Groq's OpenAI-compatible API).
pub struct GroqClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: Option<String>, base_url: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::ProviderUnavailable {
                provider: ProviderKey::Hosted,
                reason: "GROQ_API_KEY not configured".to_string(),
            })
    }

    fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl GenerationProvider for GroqClient {
    fn key(&self) -> ProviderKey {
        ProviderKey::Hosted
    }

    fn default_model(&self) -> &str {
        DEFAULT_HOSTED_MODEL
    }

    fn ensure_available(&self) -> AppResult<()> {
        self.api_key().map(|_| ())
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_content: &str,
        model_override: Option<&str>,
    ) -> AppResult<String> {
        let api_key = self.api_key()?;

        let model = self.resolve_model(model_override);
        info!(%model, "requesting hosted completion");

        let request_body = ChatCompletionRequest {
            model: &model,
            messages: conversation(system_prompt, user_content),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(self.completions_endpoint())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                AppError::generation(ProviderKey::Hosted, format!("failed to call Groq: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::generation(
                ProviderKey::Hosted,
                format!("Groq responded with {status}: {body}"),
            ));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::generation(
                ProviderKey::Hosted,
                format!("failed to parse Groq response: {err}"),
            )
        })?;

        let choice = payload.choices.into_iter().next().ok_or_else(|| {
            AppError::generation(ProviderKey::Hosted, "Groq response contained no choices")
        })?;
        let content = choice.message.content.unwrap_or_default();
        debug!(chars = content.len(), "hosted completion received");
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
