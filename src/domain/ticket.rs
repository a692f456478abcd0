use serde::Serialize;

pub const DEFAULT_SUMMARY: &str = "No Summary";
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";
pub const DEFAULT_PRIORITY: &str = "Medium";
pub const DEFAULT_STATUS: &str = "Unknown";
pub const DEFAULT_ASSIGNEE: &str = "Unassigned";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Canonical snapshot of a tracker issue. Every field is resolved to plain
/// text or a flat sequence by the time a `Ticket` exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub assignee: String,
    pub labels: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub mime_type: String,
}
