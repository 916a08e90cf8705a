//! Pre-release suffix handling
//!
//! A pre-release suffix is read as a channel identifier followed by an
//! optional counter, e.g. `beta.3` or `rc`. See https://semver.org/#spec-item-9

use std::fmt;

use semver::{Prerelease, Version};

use crate::error::{MultiReleaseError, Result};

/// Pre-release suffix split into channel and counter
///
/// # Examples
/// - "alpha" -> PreRelease { identifier: "alpha", iteration: None }
/// - "beta.1" -> PreRelease { identifier: "beta", iteration: Some(1) }
/// - "next.major.2" -> PreRelease { identifier: "next.major", iteration: Some(2) }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    /// The channel identifier (every segment before the first numeric one)
    pub identifier: String,
    /// Counter incremented on every release in the channel
    pub iteration: Option<u64>,
}

impl PreRelease {
    /// Create a new pre-release suffix
    pub fn new(identifier: impl Into<String>, iteration: Option<u64>) -> Self {
        PreRelease {
            identifier: identifier.into(),
            iteration,
        }
    }

    /// Parse a pre-release suffix from a string
    ///
    /// Accepts formats like "beta", "beta.1", "rc.2" or "custom-id.5".
    ///
    /// # Returns
    /// * `Ok(PreRelease)` - Parsed suffix
    /// * `Err` - If there is no identifier before the first numeric segment
    ///   or the counter is not a number
    pub fn parse(s: &str) -> Result<Self> {
        let segments: Vec<&str> = s.split('.').collect();
        let numeric_at = segments
            .iter()
            .position(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()));

        let identifier = match numeric_at {
            Some(index) => segments[..index].join("."),
            None => s.to_string(),
        };
        if identifier.is_empty() {
            return Err(MultiReleaseError::version(format!(
                "Pre-release '{}' has no channel identifier",
                s
            )));
        }

        let iteration = match numeric_at {
            Some(index) => Some(segments[index].parse::<u64>().map_err(|_| {
                MultiReleaseError::version(format!(
                    "Invalid pre-release counter: '{}'",
                    segments[index]
                ))
            })?),
            None => None,
        };

        Ok(PreRelease {
            identifier,
            iteration,
        })
    }

    /// Read the pre-release suffix of a version, if it has one
    pub fn from_version(version: &Version) -> Option<Self> {
        if version.pre.is_empty() {
            return None;
        }
        PreRelease::parse(version.pre.as_str()).ok()
    }

    /// Increment the counter
    ///
    /// A suffix without counter becomes counter 1. Fails when the counter is
    /// already `u64::MAX`.
    pub fn increment_iteration(&self) -> Result<Self> {
        let new_iteration = match self.iteration {
            Some(n) => n.checked_add(1).ok_or_else(|| {
                MultiReleaseError::version(format!("Pre-release counter of '{}' is exhausted", self))
            })?,
            None => 1,
        };

        Ok(PreRelease {
            identifier: self.identifier.clone(),
            iteration: Some(new_iteration),
        })
    }

    /// Convert to a semver pre-release field
    pub fn to_prerelease(&self) -> Result<Prerelease> {
        Prerelease::new(&self.to_string()).map_err(|e| {
            MultiReleaseError::version(format!("Invalid pre-release '{}': {}", self, e))
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(iter) = self.iteration {
            write!(f, ".{}", iter)?;
        }
        Ok(())
    }
}

/// Extract the channel identifier of a version's pre-release suffix.
///
/// Returns `None` when the version is missing, unparsable, or a plain release.
pub fn get_pre_release_tag(version: Option<&str>) -> Option<String> {
    let version = Version::parse(version?.trim()).ok()?;
    PreRelease::from_version(&version).map(|pre| pre.identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerelease_parse_with_iteration() {
        let pr = PreRelease::parse("beta.1").unwrap();
        assert_eq!(pr.identifier, "beta");
        assert_eq!(pr.iteration, Some(1));
    }

    #[test]
    fn test_prerelease_parse_no_iteration() {
        let pr = PreRelease::parse("alpha").unwrap();
        assert_eq!(pr.identifier, "alpha");
        assert_eq!(pr.iteration, None);
    }

    #[test]
    fn test_prerelease_parse_dotted_identifier() {
        let pr = PreRelease::parse("next.major.4").unwrap();
        assert_eq!(pr.identifier, "next.major");
        assert_eq!(pr.iteration, Some(4));
    }

    #[test]
    fn test_prerelease_parse_without_identifier() {
        assert!(PreRelease::parse("1").is_err());
        assert!(PreRelease::parse("").is_err());
    }

    #[test]
    fn test_prerelease_increment_with_iteration() {
        let pr = PreRelease::parse("dev.0").unwrap();
        let incremented = pr.increment_iteration().unwrap();
        assert_eq!(incremented.identifier, "dev");
        assert_eq!(incremented.iteration, Some(1));
    }

    #[test]
    fn test_prerelease_increment_from_none() {
        let pr = PreRelease::new("alpha", None);
        assert_eq!(pr.increment_iteration().unwrap().iteration, Some(1));
    }

    #[test]
    fn test_prerelease_increment_exhausted_counter() {
        let pr = PreRelease::new("beta", Some(u64::MAX));
        assert!(pr.increment_iteration().is_err());
    }

    #[test]
    fn test_prerelease_display() {
        assert_eq!(PreRelease::parse("rc.2").unwrap().to_string(), "rc.2");
        assert_eq!(PreRelease::new("alpha", None).to_string(), "alpha");
    }

    #[test]
    fn test_get_pre_release_tag() {
        assert_eq!(get_pre_release_tag(Some("1.0.0-dev.1")), Some("dev".to_string()));
        assert_eq!(get_pre_release_tag(Some("2.0.0-beta")), Some("beta".to_string()));
        assert_eq!(get_pre_release_tag(Some("1.0.0")), None);
        assert_eq!(get_pre_release_tag(Some("not-a-version")), None);
        assert_eq!(get_pre_release_tag(None), None);
    }
}
