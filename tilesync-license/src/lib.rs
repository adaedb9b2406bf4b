//! Licensing and dataset quota enforcement for tilesync.
//!
//! This module handles:
//! - License descriptors (tier, dataset allowance, holder)
//! - Loading the license for a synced directory
//! - The quota gate that runs before any registry mutation
//!
//! # Tiers
//!
//! `admin` and `subscription` licenses are unrestricted. `guest` licenses may
//! hold at most [`GUEST_DATASET_ALLOWANCE`] datasets. A directory with no
//! license at all is synced as a guest.
//!
//! Token signature verification is delegated to a [`TokenVerifier`]
//! supplied by the caller; this crate only interprets verified claims.

mod error;
mod license;
mod provider;
mod quota;

pub use error::{LicenseError, LicenseResult};
pub use license::{
    License, LicenseClaims, LicenseTier, GUEST_DATASET_ALLOWANCE, UNRESTRICTED_DATASET_ALLOWANCE,
};
pub use provider::{
    LicenseFile, LicenseProvider, StaticLicense, TokenVerifier, LICENSE_ENV_VAR,
};
pub use quota::check_quota;
