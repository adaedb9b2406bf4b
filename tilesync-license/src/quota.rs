//! The quota gate.
//!
//! Runs once per reconciliation, before any registry mutation, against the
//! number of local entries. Every local entry is assumed to become a remote
//! dataset, so the check is pessimistic.

use crate::error::{LicenseError, LicenseResult};
use crate::license::License;
use tracing::{debug, warn};

/// Checks that `local_entry_count` datasets fit within the license.
///
/// # Errors
///
/// Returns [`LicenseError::QuotaExceeded`] for a restricted license whose
/// allowance is smaller than `local_entry_count`.
pub fn check_quota(local_entry_count: usize, license: &License) -> LicenseResult<()> {
    if !license.is_restricted() {
        debug!("Quota gate skipped for unrestricted {} license", license.tier);
        return Ok(());
    }

    let observed = local_entry_count as u64;
    if observed > license.allowance {
        warn!(
            "Dataset quota exceeded: {} local entries, {} license allows {}",
            observed, license.tier, license.allowance
        );
        return Err(LicenseError::QuotaExceeded {
            allowance: license.allowance,
            observed,
        });
    }

    debug!("Quota gate passed: {}/{}", observed, license.allowance);
    Ok(())
}
