use std::io;

use thiserror::Error;

use crate::domain::provider::ProviderKey;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to fetch ticket {ticket_id}: {message}")]
    TicketFetch {
        ticket_id: String,
        status: Option<u16>,
        message: String,
    },
    #[error("invalid provider: {0}")]
    InvalidProvider(String),
    #[error("provider {provider} unavailable: {reason}")]
    ProviderUnavailable {
        provider: ProviderKey,
        reason: String,
    },
    #[error("{provider} generation failed: {message}")]
    Generation {
        provider: ProviderKey,
        message: String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn ticket_fetch(ticket_id: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::TicketFetch {
            ticket_id: ticket_id.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn generation(provider: ProviderKey, message: impl Into<String>) -> Self {
        AppError::Generation {
            provider,
            message: message.into(),
        }
    }

    /// Errors caused by what the caller asked for, as opposed to an upstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidProvider(_) | AppError::Configuration(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
