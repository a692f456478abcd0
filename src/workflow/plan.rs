use std::sync::Arc;

use tracing::info;

use crate::domain::plan::{GenerationRequest, GenerationResult};
use crate::error::AppResult;
use crate::services::{IssueTrackerService, ProviderRegistry};
use crate::workflow::prompt::{build_prompt, resolve_template};

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub ticket_id: String,
    pub template_text: Option<String>,
    pub provider: String,
    pub model_override: Option<String>,
}

/// Runs ticket fetch, prompt assembly and generation for one request.
pub struct PlanSynthesizer {
    issue_tracker: Arc<dyn IssueTrackerService>,
    providers: Arc<ProviderRegistry>,
}

impl PlanSynthesizer {
    pub fn new(issue_tracker: Arc<dyn IssueTrackerService>, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            issue_tracker,
            providers,
        }
    }

    pub async fn synthesize(&self, request: PlanRequest) -> AppResult<GenerationResult> {
        // Checked before the fetch so a bad key or an unconfigured provider
        // never reaches the network.
        let provider = self.providers.resolve(&request.provider)?;
        provider.ensure_available()?;

        let ticket = self.issue_tracker.fetch_ticket(&request.ticket_id).await?;
        let template_text = resolve_template(request.template_text);
        let prompt = build_prompt(&ticket, &template_text);

        let generation = GenerationRequest::new(prompt, provider.key(), request.model_override);
        let resolved_model = provider.resolve_model(generation.model_override.as_deref());
        info!(
            ticket = %ticket.key,
            provider = %generation.provider_key,
            model = %resolved_model,
            "generating test plan"
        );

        let content = provider
            .generate(
                &generation.system_prompt,
                &generation.user_content,
                generation.model_override.as_deref(),
            )
            .await?;

        Ok(GenerationResult {
            content,
            provider_key: generation.provider_key,
            resolved_model,
        })
    }
}
