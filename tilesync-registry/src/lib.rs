//! Remote dataset registry client for tilesync.
//!
//! The registry holds a hierarchy of records per project: folders and data
//! files, each pointing at its containing folder by id. This crate defines
//! the narrow interface the reconciliation engine drives, plus an HTTP
//! implementation.
//!
//! - [`RegistryClient`]: list, create, update and delete records
//! - [`Transfer`]: move a local file to remote storage (upload mode only)
//! - [`HttpRegistry`]: `RegistryClient` over the registry's REST API
//!
//! # Errors
//!
//! [`RegistryError`] separates connectivity and authentication failures from
//! "not found" and validation failures, so callers can decide whether a whole
//! run is worth retrying.

mod client;
mod error;
pub mod http;
mod transfer;

pub use client::{NewFile, RegistryClient};
pub use error::{RegistryError, RegistryResult};
pub use http::{HttpRegistry, HttpRegistryConfig};
pub use transfer::Transfer;
