//! Registry error types.

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur talking to the remote registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry could not be reached (DNS, connect, timeout, broken body).
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Credentials missing, expired or refused.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The registry answered but is temporarily unable to serve.
    #[error("registry unavailable (HTTP {status}): {message}")]
    Unavailable { status: u16, message: String },

    /// The addressed record or project does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The registry rejected the request.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Moving file content to remote storage failed.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RegistryError {
    /// Maps an HTTP error status to the matching variant.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Auth(message),
            404 => Self::NotFound(message),
            408 | 429 | 500..=599 => Self::Unavailable { status, message },
            _ => Self::Validation(message),
        }
    }

    /// Returns true if the failure is about reaching or authenticating with
    /// the registry rather than about the request itself.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Connectivity(_) | Self::Auth(_) | Self::Unavailable { .. }
        )
    }

    /// Returns true if re-running the same request later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Unavailable { .. })
    }
}
