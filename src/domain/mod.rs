//! Domain logic - pure versioning rules independent of any I/O

pub mod branch;
pub mod prerelease;
pub mod range;
pub mod release_type;
pub mod strategy;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use prerelease::{get_pre_release_tag, PreRelease};
pub use range::{resolve_next_version, RangeShape};
pub use release_type::{NextType, ReleaseType};
pub use strategy::{BumpStrategy, RangePrefix, ReleaseStrategy};
pub use tag::{get_version_from_tag, TagFormat};
pub use version::{next_pre_version, next_version};
