use async_trait::async_trait;

use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Reads one issue and resolves it into a canonical `Ticket`.
    async fn fetch_ticket(&self, ticket_id: &str) -> AppResult<Ticket>;
}
