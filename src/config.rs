use std::env;

use crate::error::{AppError, AppResult};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_PROVIDER: &str = "hosted";

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub ollama_base_url: String,
    pub default_provider: String,
}

/// Connection details required to talk to the tracker.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub base_url: String,
    pub email: String,
    pub token: String,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Ok(Self::from_lookup(|name| env::var(name).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            jira_base_url: read("JIRA_BASE_URL"),
            jira_email: read("JIRA_EMAIL"),
            jira_token: read("JIRA_API_TOKEN"),
            groq_api_key: read("GROQ_API_KEY"),
            groq_base_url: read("GROQ_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            ollama_base_url: read("OLLAMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            default_provider: read("NEXUS_DEFAULT_PROVIDER")
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
        }
    }

    pub fn tracker(&self) -> AppResult<TrackerSettings> {
        let base_url = self
            .jira_base_url
            .clone()
            .ok_or_else(|| AppError::Configuration("JIRA_BASE_URL not configured".to_string()))?;
        let email = self
            .jira_email
            .clone()
            .ok_or_else(|| AppError::Configuration("JIRA_EMAIL not configured".to_string()))?;
        let token = self
            .jira_token
            .clone()
            .ok_or_else(|| AppError::Configuration("JIRA_API_TOKEN not configured".to_string()))?;
        Ok(TrackerSettings {
            base_url,
            email,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn applies_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.groq_base_url, DEFAULT_GROQ_BASE_URL);
        assert_eq!(cfg.ollama_base_url, DEFAULT_OLLAMA_BASE_URL);
        assert_eq!(cfg.default_provider, DEFAULT_PROVIDER);
        assert!(cfg.groq_api_key.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config_from(&[("GROQ_API_KEY", "   "), ("OLLAMA_BASE_URL", "")]);
        assert!(cfg.groq_api_key.is_none());
        assert_eq!(cfg.ollama_base_url, DEFAULT_OLLAMA_BASE_URL);
    }

    #[test]
    fn tracker_requires_all_credentials() {
        let cfg = config_from(&[
            ("JIRA_BASE_URL", "https://company.atlassian.net"),
            ("JIRA_EMAIL", "qa@company.test"),
        ]);
        let err = cfg.tracker().unwrap_err();
        assert!(err.to_string().contains("JIRA_API_TOKEN"));

        let cfg = config_from(&[
            ("JIRA_BASE_URL", "https://company.atlassian.net"),
            ("JIRA_EMAIL", "qa@company.test"),
            ("JIRA_API_TOKEN", " secret "),
        ]);
        let tracker = cfg.tracker().unwrap();
        assert_eq!(tracker.token, "secret");
    }
}
