//! Dataset tree reconciliation for tilesync.
//!
//! Converges a registry project toward a local directory tree in one
//! sequential pass:
//!
//! 1. [`scan()`] the local tree into path-keyed [`LocalEntry`] values, folding
//!    sidecar index files into their primaries
//! 2. run the quota gate against the local entry count
//! 3. [`RemoteTree::reconstruct`] full paths from the registry's flat,
//!    parent-linked records
//! 4. diff both into a [`ReconciliationPlan`]
//! 5. execute it parent-before-child, folding new records back into the tree
//!
//! Deletion of stale remote records only happens when
//! [`SyncOptions::delete_stale`] is set.
//!
//! [`LocalEntry`]: tilesync_types::LocalEntry

pub mod config;
mod engine;
mod error;
pub mod plan;
mod remote_tree;
pub mod scan;

pub use config::{IndexRole, IndexSuffix, SyncConfig};
pub use engine::{SyncEngine, SyncOptions, SyncReport, SyncRequest, TransferMode};
pub use error::{IntegrityError, ScanError, SyncError, SyncResult};
pub use plan::{ReconciliationPlan, SyncOp};
pub use remote_tree::RemoteTree;
pub use scan::{associate_indexes, scan};
