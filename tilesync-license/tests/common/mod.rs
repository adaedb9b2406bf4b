//! Shared test helpers for license tests.

#![allow(dead_code)]

use tilesync_license::{LicenseClaims, LicenseError, LicenseResult, TokenVerifier};

/// Treats the token as plain JSON claims. Stands in for a signature check.
pub struct JsonClaimsVerifier;

impl TokenVerifier for JsonClaimsVerifier {
    fn verify(&self, token: &str) -> LicenseResult<LicenseClaims> {
        LicenseClaims::from_json(token.as_bytes())
    }
}

/// Rejects every token.
pub struct RejectAllVerifier;

impl TokenVerifier for RejectAllVerifier {
    fn verify(&self, _token: &str) -> LicenseResult<LicenseClaims> {
        Err(LicenseError::Rejected("incorrectly signed license".to_string()))
    }
}

/// Builds a claims token for the given tier.
pub fn claims_token(permissions: &str, username: &str) -> String {
    format!(r#"{{"permissions":"{permissions}","username":"{username}"}}"#)
}
