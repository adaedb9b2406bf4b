//! License descriptors and tiers.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dataset allowance for guest licenses.
pub const GUEST_DATASET_ALLOWANCE: u64 = 10;

/// Dataset allowance for unrestricted tiers. Large enough to never bind.
pub const UNRESTRICTED_DATASET_ALLOWANCE: u64 = 1_000_000;

/// The license tier (aligned with the token `permissions` claim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    /// Administrator.
    Admin,
    /// Paid subscription.
    Subscription,
    /// Unlicensed or trial use, subject to a dataset quota.
    Guest,
}

impl LicenseTier {
    /// Returns true if the quota gate applies to this tier.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Returns the number of datasets this tier allows by default.
    #[must_use]
    pub fn default_allowance(&self) -> u64 {
        match self {
            Self::Admin | Self::Subscription => UNRESTRICTED_DATASET_ALLOWANCE,
            Self::Guest => GUEST_DATASET_ALLOWANCE,
        }
    }

    /// Returns the lowercase tier name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Subscription => "subscription",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseTier {
    type Err = LicenseError;

    fn from_str(s: &str) -> LicenseResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "subscription" => Ok(Self::Subscription),
            "guest" => Ok(Self::Guest),
            other => Err(LicenseError::InvalidTier(other.to_string())),
        }
    }
}

/// Verified token claims (matches the license token JSON structure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseClaims {
    /// License tier.
    pub permissions: LicenseTier,
    /// License holder.
    pub username: String,
}

impl LicenseClaims {
    /// Decodes claims from a JSON payload.
    pub fn from_json(payload: &[u8]) -> LicenseResult<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| LicenseError::InvalidPayload(format!("invalid claims JSON: {e}")))
    }
}

/// The license descriptor consumed by the quota gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License tier.
    pub tier: LicenseTier,
    /// Maximum number of datasets, enforced only for restricted tiers.
    pub allowance: u64,
    /// License holder.
    pub holder: String,
}

impl License {
    /// The license used when none is configured.
    #[must_use]
    pub fn guest() -> Self {
        Self::for_tier(LicenseTier::Guest, "guest")
    }

    /// Creates a license with the tier's default allowance.
    #[must_use]
    pub fn for_tier(tier: LicenseTier, holder: impl Into<String>) -> Self {
        Self {
            tier,
            allowance: tier.default_allowance(),
            holder: holder.into(),
        }
    }

    /// Overrides the allowance.
    #[must_use]
    pub fn with_allowance(mut self, allowance: u64) -> Self {
        self.allowance = allowance;
        self
    }

    /// Returns true if the quota gate applies.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.tier.is_restricted()
    }
}

impl From<LicenseClaims> for License {
    fn from(claims: LicenseClaims) -> Self {
        Self::for_tier(claims.permissions, claims.username)
    }
}
