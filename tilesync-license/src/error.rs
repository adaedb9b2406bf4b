//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Unknown license tier.
    #[error("invalid license tier: {0}")]
    InvalidTier(String),

    /// Token claims are malformed or missing required fields.
    #[error("invalid license payload: {0}")]
    InvalidPayload(String),

    /// The token verifier rejected the license token.
    #[error("license token rejected: {0}")]
    Rejected(String),

    /// More local entries than the license allows.
    #[error("dataset quota exceeded: {observed} local entries, license allows {allowance}")]
    QuotaExceeded { allowance: u64, observed: u64 },

    /// The license file could not be read.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
