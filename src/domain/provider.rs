use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKey {
    Hosted,
    Local,
}

impl ProviderKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKey::Hosted => "hosted",
            ProviderKey::Local => "local",
        }
    }
}

impl FromStr for ProviderKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "hosted" | "groq" => Ok(ProviderKey::Hosted),
            "local" | "ollama" => Ok(ProviderKey::Local),
            _ => Err(AppError::InvalidProvider(value.to_string())),
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
