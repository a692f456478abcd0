use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, Url,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use serde_json::Value;
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::config::TrackerSettings;
use crate::domain::document::{flatten_value, parse_tree};
use crate::domain::ticket::{
    Attachment, DEFAULT_ASSIGNEE, DEFAULT_DESCRIPTION, DEFAULT_MIME_TYPE, DEFAULT_PRIORITY,
    DEFAULT_STATUS, DEFAULT_SUMMARY, Ticket,
};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const ISSUE_FIELDS: &str = "summary,description,priority,status,assignee,labels,attachment";
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    token: String,
}

/// The account the tracker credentials authenticate as.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerUser {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

impl JiraClient {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            email: settings.email,
            token: settings.token,
        }
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.email, self.token);
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    /// The issue URL with `ticket_id` escaped as a single path segment.
    fn issue_endpoint(&self, ticket_id: &str) -> AppResult<Url> {
        let invalid_base = || {
            AppError::ticket_fetch(
                ticket_id,
                None,
                format!("invalid tracker base URL: {}", self.base_url),
            )
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(["rest", "api", "3", "issue", ticket_id]);
        Ok(url)
    }

    /// Confirms the credentials by reading the authenticated user.
    pub async fn current_user(&self) -> AppResult<TrackerUser> {
        let url = format!("{}/rest/api/3/myself", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|err| {
                AppError::Configuration(format!("error connecting to tracker: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Configuration(format!(
                "tracker rejected credentials with {status}"
            )));
        }

        response.json::<TrackerUser>().await.map_err(|err| {
            AppError::Configuration(format!("failed to parse tracker response: {err}"))
        })
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn fetch_ticket(&self, ticket_id: &str) -> AppResult<Ticket> {
        let ticket_id = ticket_id.trim();
        if ticket_id.is_empty() {
            return Err(AppError::ticket_fetch(
                ticket_id,
                None,
                "ticket id must not be empty",
            ));
        }

        let url = self.issue_endpoint(ticket_id)?;
        debug!(ticket_id, %url, "fetching ticket");
        let response = self
            .http
            .get(url)
            .query(&[("fields", ISSUE_FIELDS)])
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|err| {
                AppError::ticket_fetch(ticket_id, None, format!("error connecting to tracker: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            warn!(ticket_id, %status, body = %body, "tracker rejected ticket fetch");
            return Err(AppError::ticket_fetch(
                ticket_id,
                Some(status.as_u16()),
                format!("tracker responded with {status}"),
            ));
        }

        let payload: JiraIssueResponse = response.json().await.map_err(|err| {
            AppError::ticket_fetch(
                ticket_id,
                Some(status.as_u16()),
                format!("failed to parse tracker response: {err}"),
            )
        })?;

        Ok(payload.into_ticket(ticket_id))
    }
}

#[derive(Deserialize)]
struct JiraIssueResponse {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    fields: Option<JiraIssueFields>,
}

#[derive(Default, Deserialize)]
struct JiraIssueFields {
    #[serde(default)]
    summary: Option<String>,
    // Kept raw so a deeply nested tree cannot fail the whole response.
    #[serde(default)]
    description: Option<Box<RawValue>>,
    #[serde(default)]
    priority: Option<JiraNamed>,
    #[serde(default)]
    status: Option<JiraNamed>,
    #[serde(default)]
    assignee: Option<JiraUser>,
    #[serde(default)]
    labels: Option<Vec<String>>,
    #[serde(default)]
    attachment: Option<Vec<JiraAttachment>>,
}

#[derive(Deserialize)]
struct JiraNamed {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraUser {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraAttachment {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl JiraIssueResponse {
    fn into_ticket(self, requested_id: &str) -> Ticket {
        let fields = self.fields.unwrap_or_default();

        let key = self
            .key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| requested_id.to_string());

        let description = describe(&key, fields.description.as_deref());

        let attachments = fields
            .attachment
            .unwrap_or_default()
            .into_iter()
            .map(|attachment| Attachment {
                filename: attachment.filename.unwrap_or_default(),
                url: attachment.content.unwrap_or_default(),
                mime_type: attachment
                    .mime_type
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            })
            .collect();

        Ticket {
            key,
            summary: fields
                .summary
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            description,
            priority: named_or(fields.priority, DEFAULT_PRIORITY),
            status: named_or(fields.status, DEFAULT_STATUS),
            assignee: fields
                .assignee
                .and_then(|user| user.display_name)
                .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string()),
            labels: fields.labels.unwrap_or_default(),
            // The tracker exposes acceptance criteria only through
            // instance-specific custom fields, so none are extracted.
            acceptance_criteria: Vec::new(),
            attachments,
        }
    }
}

/// Flattens the description tree. Absent or empty trees get the placeholder;
/// trees that cannot be read yield empty text instead of failing the fetch.
fn describe(key: &str, raw: Option<&RawValue>) -> String {
    // An explicit JSON null deserializes to `None` as well.
    let Some(raw) = raw else {
        return DEFAULT_DESCRIPTION.to_string();
    };

    match parse_tree(raw.get()) {
        Ok(Some(tree)) if is_empty_tree(&tree) => DEFAULT_DESCRIPTION.to_string(),
        Ok(Some(tree)) => flatten_value(&tree),
        Ok(None) => {
            warn!(ticket = key, "description nested too deeply, skipped");
            String::new()
        }
        Err(err) => {
            warn!(ticket = key, error = %err, "unreadable description, skipped");
            String::new()
        }
    }
}

fn is_empty_tree(tree: &Value) -> bool {
    match tree {
        Value::Null | Value::Bool(false) => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn named_or(value: Option<JiraNamed>, fallback: &str) -> String {
    value
        .and_then(|named| named.name)
        .unwrap_or_else(|| fallback.to_string())
}
