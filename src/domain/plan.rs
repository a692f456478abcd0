use serde::Serialize;

use crate::domain::provider::ProviderKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_content: String,
    pub provider_key: ProviderKey,
    pub model_override: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: Prompt, provider_key: ProviderKey, model_override: Option<String>) -> Self {
        Self {
            system_prompt: prompt.system,
            user_content: prompt.user,
            provider_key,
            model_override,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub content: String,
    pub provider_key: ProviderKey,
    pub resolved_model: String,
}
