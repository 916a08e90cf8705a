//! Seams to the outside world of a release.
//!
//! Deciding whether a package's own changes warrant a release, and listing
//! the tags previous releases left behind, both depend on tooling outside
//! this crate (commit analysis, a git repository, a registry). The planner
//! only talks to them through the two traits below.
//!
//! # Overview
//!
//! - [ReleaseEngine]: reports the intrinsic release type of a package
//! - [TagSource]: lists release tags and the commit each one points at
//!
//! [memory::InMemorySource] implements both from data supplied up front,
//! which is what the `plan` command and the tests use.
//!
//! ```rust
//! # use multi_release::engine::{InMemorySource, TagSource};
//! # use multi_release::domain::ReleaseType;
//! let source = InMemorySource::new()
//!     .with_tag("core@1.0.0", Some("4f2a9c1"))
//!     .with_next_type("core", ReleaseType::Minor);
//! assert_eq!(source.tags().unwrap(), vec!["core@1.0.0".to_string()]);
//! ```

pub mod memory;

pub use memory::InMemorySource;

use crate::domain::{BranchContext, NextType};
use crate::error::Result;
use crate::package::Package;

/// Decides the release type a package's own changes call for.
///
/// Implementations must be `Send + Sync`.
///
/// ## Error Handling
///
/// Failures to reach the underlying tooling are reported as
/// [crate::error::MultiReleaseError]; "nothing to release" is not an error
/// but [NextType::Undetermined] or [NextType::NoRelease].
pub trait ReleaseEngine: Send + Sync {
    /// Intrinsic release type of `package` on `branch`
    ///
    /// # Arguments
    /// * `package` - The package, with its last release already filled in
    /// * `branch` - The branch being released from
    ///
    /// # Returns
    /// * `Ok(NextType)` - Release type, or the absence of a decision
    /// * `Err` - If the engine cannot analyze the package
    fn next_type(&self, package: &Package, branch: &BranchContext) -> Result<NextType>;
}

/// Read access to release tags.
pub trait TagSource: Send + Sync {
    /// List all release tags
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names, in no particular order
    /// * `Err` - If the tags cannot be listed
    fn tags(&self) -> Result<Vec<String>>;

    /// Commit a tag points at
    ///
    /// # Returns
    /// * `Ok(Some(sha))` - The tag exists and its commit is known
    /// * `Ok(None)` - The tag or its commit is unknown
    /// * `Err` - If the lookup fails
    fn tag_head(&self, tag: &str) -> Result<Option<String>>;
}
