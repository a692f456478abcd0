use crate::config::AppConfig;
use crate::error::AppResult;

pub fn run(cfg: &AppConfig) -> AppResult<()> {
    print!("{}", render(cfg));
    Ok(())
}

fn render(cfg: &AppConfig) -> String {
    [
        format!("Jira base URL: {}", display_value(&cfg.jira_base_url)),
        format!("Jira email: {}", display_value(&cfg.jira_email)),
        format!("Jira API token: {}", mask_secret(&cfg.jira_token)),
        format!("Groq API key: {}", mask_secret(&cfg.groq_api_key)),
        format!("Groq base URL: {}", cfg.groq_base_url),
        format!("Ollama base URL: {}", cfg.ollama_base_url),
        format!("Default provider: {}", cfg.default_provider),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret(&Some("gsk_abcdef123".to_string())), "gsk***123");
        assert_eq!(mask_secret(&Some("short".to_string())), "***");
        assert_eq!(mask_secret(&None), "<not set>");
    }

    #[test]
    fn renders_without_leaking_tokens() {
        let cfg = AppConfig::from_lookup(|name| match name {
            "JIRA_BASE_URL" => Some("https://company.atlassian.net".to_string()),
            "JIRA_API_TOKEN" => Some("ATATT3xFfGF0secretvalue".to_string()),
            _ => None,
        });
        let output = render(&cfg);
        assert!(output.contains("Jira base URL: https://company.atlassian.net\n"));
        assert!(output.contains("Jira email: <not set>\n"));
        assert!(output.contains("Jira API token: ATA***lue\n"));
        assert!(!output.contains("secretvalue"));
        assert!(output.contains("Default provider: hosted\n"));
    }
}
