pub mod groq;
pub mod jira;
pub mod ollama;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// The two-message conversation both generation backends receive.
pub(crate) fn conversation<'a>(system_prompt: &'a str, user_content: &'a str) -> Vec<ChatMessage<'a>> {
    vec![
        ChatMessage {
            role: "system",
            content: system_prompt,
        },
        ChatMessage {
            role: "user",
            content: user_content,
        },
    ]
}
