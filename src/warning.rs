use std::fmt;

use serde::Serialize;

/// Non-fatal issues found while planning a release.
/// The plan is still produced; these are reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanWarning {
    /// Local dependencies loop back on themselves
    DependencyCycle { package: String, dependency: String },
    /// Tag looks like a release of the package but its version is invalid
    UnparsableTag { package: String, tag: String },
    /// No previous release found; the next release is the first one
    FirstRelease { package: String },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::DependencyCycle {
                package,
                dependency,
            } => {
                write!(
                    f,
                    "Dependency cycle: '{}' depends on '{}' which depends back on it",
                    package, dependency
                )
            }
            PlanWarning::UnparsableTag { package, tag } => {
                write!(f, "Cannot parse version of '{}' from tag '{}'", package, tag)
            }
            PlanWarning::FirstRelease { package } => {
                write!(f, "No previous release of '{}' found", package)
            }
        }
    }
}
