//! License providers.
//!
//! The engine treats the license as an opaque read through
//! [`LicenseProvider`]. [`LicenseFile`] resolves the license of a synced
//! directory from its metadata folder, falling back to an environment
//! variable and finally to the guest license.

use crate::error::{LicenseError, LicenseResult};
use crate::license::{License, LicenseClaims};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};
use tracing::{debug, info};

/// Environment variable consulted when no license file exists.
pub const LICENSE_ENV_VAR: &str = "TILESYNC_LICENSE";

/// Supplies the license descriptor for a reconciliation run.
pub trait LicenseProvider: Send + Sync {
    /// Returns the current license.
    fn get_license(&self) -> LicenseResult<License>;
}

/// Verifies a license token and returns its claims.
///
/// Signature schemes and key management live outside this crate.
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token` and decodes its claims.
    fn verify(&self, token: &str) -> LicenseResult<LicenseClaims>;
}

/// A fixed license, for callers that resolved it elsewhere.
#[derive(Debug, Clone)]
pub struct StaticLicense(License);

impl StaticLicense {
    /// Wraps a license descriptor.
    #[must_use]
    pub fn new(license: License) -> Self {
        Self(license)
    }
}

impl LicenseProvider for StaticLicense {
    fn get_license(&self) -> LicenseResult<License> {
        Ok(self.0.clone())
    }
}

/// Reads a license token from a file.
///
/// - empty file: guest license
/// - missing file: the environment variable, else guest license
/// - otherwise: the token is verified and its claims become the license
pub struct LicenseFile {
    path: PathBuf,
    env_var: Option<String>,
    verifier: Arc<dyn TokenVerifier>,
}

impl LicenseFile {
    /// Creates a provider reading `path` and falling back to [`LICENSE_ENV_VAR`].
    pub fn new(path: impl Into<PathBuf>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            path: path.into(),
            env_var: Some(LICENSE_ENV_VAR.to_string()),
            verifier,
        }
    }

    /// Disables the environment variable fallback.
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.env_var = None;
        self
    }

    /// Returns the license file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn from_token(&self, token: &str) -> LicenseResult<License> {
        let claims = self.verifier.verify(token)?;
        info!("Loaded {} license for {}", claims.permissions, claims.username);
        Ok(License::from(claims))
    }

    fn from_env(&self) -> LicenseResult<License> {
        let token = self
            .env_var
            .as_deref()
            .and_then(|name| env::var(name).ok())
            .filter(|token| !token.trim().is_empty());

        match token {
            Some(token) => self.from_token(token.trim()),
            None => {
                info!("No license configured, using guest license");
                Ok(License::guest())
            }
        }
    }
}

impl LicenseProvider for LicenseFile {
    fn get_license(&self) -> LicenseResult<License> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let token = text.trim();
                if token.is_empty() {
                    debug!("Empty license file {}, using guest license", self.path.display());
                    return Ok(License::guest());
                }
                self.from_token(token)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("License file {} not found", self.path.display());
                self.from_env()
            }
            Err(e) => Err(LicenseError::Storage(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }
}
