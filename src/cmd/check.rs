use tracing::warn;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::infra::groq::GroqClient;
use crate::infra::jira::JiraClient;
use crate::infra::ollama::OllamaClient;

/// Probes each upstream once and reports the outcome per service.
pub async fn run(cfg: &AppConfig) -> AppResult<()> {
    let mut failures = 0;

    match cfg.tracker() {
        Ok(settings) => match JiraClient::new(settings).current_user().await {
            Ok(user) => println!(
                "Jira: connected as {} ({})",
                user.display_name.as_deref().unwrap_or("<unknown>"),
                user.email_address.as_deref().unwrap_or("<hidden>")
            ),
            Err(err) => {
                failures += 1;
                println!("Jira: {err}");
            }
        },
        Err(err) => {
            failures += 1;
            println!("Jira: {err}");
        }
    }

    let groq = GroqClient::new(cfg.groq_api_key.clone(), cfg.groq_base_url.clone());
    if groq.is_configured() {
        println!("Groq: API key configured");
    } else {
        failures += 1;
        println!("Groq: GROQ_API_KEY not configured");
    }

    match OllamaClient::new(cfg.ollama_base_url.clone()).list_models().await {
        Ok(models) if models.is_empty() => println!("Ollama: reachable, no models pulled"),
        Ok(models) => println!("Ollama: {} models ({})", models.len(), models.join(", ")),
        Err(err) => {
            failures += 1;
            println!("Ollama: {err}");
        }
    }

    if failures > 0 {
        warn!(failures, "connectivity check found problems");
        return Err(AppError::Configuration(format!(
            "{failures} service check(s) failed"
        )));
    }
    Ok(())
}
