//! Next-version computation from the last release and the resolved type.

use semver::{BuildMetadata, Prerelease, Version};
use tracing::warn;

use super::prerelease::PreRelease;
use super::release_type::{NextType, ReleaseType};
use crate::error::{MultiReleaseError, Result};

/// Version given to a package that was never released
pub const FIRST_RELEASE: &str = "1.0.0";

/// Bump a version according to release type.
///
/// Increments the matching component and resets lower ones:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// Pre-release and build metadata are dropped. Fails when the component to
/// increment is already `u64::MAX`.
pub fn bump_version(version: &Version, release: ReleaseType) -> Result<Version> {
    let overflow = || MultiReleaseError::version(format!("Cannot bump {} of '{}'", release, version));
    let mut next = Version::new(version.major, version.minor, version.patch);
    match release {
        ReleaseType::Major => {
            next.major = next.major.checked_add(1).ok_or_else(overflow)?;
            next.minor = 0;
            next.patch = 0;
        }
        ReleaseType::Minor => {
            next.minor = next.minor.checked_add(1).ok_or_else(overflow)?;
            next.patch = 0;
        }
        ReleaseType::Patch => {
            next.patch = next.patch.checked_add(1).ok_or_else(overflow)?;
        }
    }
    Ok(next)
}

fn parse_last_version(last_version: Option<&str>) -> Option<Version> {
    let raw = last_version?;
    match Version::parse(raw.trim()) {
        Ok(version) => Some(version),
        Err(e) => {
            warn!(version = raw, error = %e, "ignoring unparsable last release version");
            None
        }
    }
}

/// Next release version.
///
/// - never released: `1.0.0`
/// - no bump: the last version unchanged
/// - last version is a pre-release: that version without its suffix
/// - otherwise the regular semver increment, or the last version unchanged
///   when that component cannot grow any further
pub fn next_version(last_version: Option<&str>, next_type: NextType) -> String {
    let Some(last) = parse_last_version(last_version) else {
        return FIRST_RELEASE.to_string();
    };

    let Some(release) = next_type.release_type() else {
        return last.to_string();
    };

    if !last.pre.is_empty() {
        let mut finalized = last;
        finalized.pre = Prerelease::EMPTY;
        finalized.build = BuildMetadata::EMPTY;
        return finalized.to_string();
    }

    match bump_version(&last, release) {
        Ok(next) => next.to_string(),
        Err(e) => {
            warn!(version = %last, error = %e, "keeping last version");
            last.to_string()
        }
    }
}

/// Next pre-release version in `channel`.
///
/// Continuing the channel of the last version only increments its counter,
/// whatever the release type. Otherwise a new base is derived like
/// [`next_version`] and the counter starts at 1. An exhausted counter moves
/// the channel to the next base version, bumped by `next_type` (patch when
/// there is none).
pub fn next_pre_version(last_version: Option<&str>, next_type: NextType, channel: &str) -> String {
    let last = parse_last_version(last_version);

    if let Some(last) = &last {
        if let Some(pre) = PreRelease::from_version(last) {
            if pre.identifier == channel {
                let core = Version::new(last.major, last.minor, last.patch);
                match pre.increment_iteration().and_then(|pre| pre.to_prerelease()) {
                    Ok(prerelease) => {
                        let mut next = core;
                        next.pre = prerelease;
                        return next.to_string();
                    }
                    Err(e) => {
                        warn!(version = %last, error = %e, "starting a new pre-release base");
                        let release = next_type.release_type().unwrap_or(ReleaseType::Patch);
                        if let Ok(base) = bump_version(&core, release) {
                            return format!("{}-{}.1", base, channel);
                        }
                    }
                }
            }
        }
    }

    let base = match &last {
        Some(last) => next_version(Some(&last.to_string()), next_type),
        None => FIRST_RELEASE.to_string(),
    };
    format!("{}-{}.1", base, channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_version() {
        let v = Version::new(1, 2, 3);
        assert_eq!(bump_version(&v, ReleaseType::Major).unwrap(), Version::new(2, 0, 0));
        assert_eq!(bump_version(&v, ReleaseType::Minor).unwrap(), Version::new(1, 3, 0));
        assert_eq!(bump_version(&v, ReleaseType::Patch).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn test_bump_version_overflow() {
        let v = Version::new(1, 2, u64::MAX);
        assert!(bump_version(&v, ReleaseType::Patch).is_err());
        assert_eq!(bump_version(&v, ReleaseType::Minor).unwrap(), Version::new(1, 3, 0));
        assert!(bump_version(&Version::new(u64::MAX, 0, 0), ReleaseType::Major).is_err());

        let last = format!("1.2.{}", u64::MAX);
        assert_eq!(next_version(Some(&last), ReleaseType::Patch.into()), last);
    }

    #[test]
    fn test_next_pre_version_exhausted_counter() {
        let last = format!("1.0.0-beta.{}", u64::MAX);
        assert_eq!(
            next_pre_version(Some(&last), ReleaseType::Patch.into(), "beta"),
            "1.0.1-beta.1"
        );
        assert_eq!(
            next_pre_version(Some(&last), ReleaseType::Minor.into(), "beta"),
            "1.1.0-beta.1"
        );
    }

    #[test]
    fn test_next_version_first_release() {
        assert_eq!(next_version(None, NextType::Undetermined), "1.0.0");
        assert_eq!(next_version(None, ReleaseType::Major.into()), "1.0.0");
    }

    #[test]
    fn test_next_version_without_bump() {
        assert_eq!(next_version(Some("1.4.0"), NextType::NoRelease), "1.4.0");
        assert_eq!(next_version(Some("1.4.0"), NextType::Undetermined), "1.4.0");
    }

    #[test]
    fn test_next_version_increments() {
        assert_eq!(next_version(Some("1.0.0"), ReleaseType::Patch.into()), "1.0.1");
        assert_eq!(next_version(Some("1.0.0"), ReleaseType::Minor.into()), "1.1.0");
        assert_eq!(next_version(Some("1.0.0"), ReleaseType::Major.into()), "2.0.0");
    }

    #[test]
    fn test_next_version_finalizes_prerelease() {
        assert_eq!(next_version(Some("1.0.0-dev.1"), ReleaseType::Patch.into()), "1.0.0");
        assert_eq!(next_version(Some("2.1.0-beta.3"), ReleaseType::Minor.into()), "2.1.0");
        assert_eq!(next_version(Some("3.0.0-rc.1"), ReleaseType::Major.into()), "3.0.0");
    }

    #[test]
    fn test_next_version_unparsable_last_is_first_release() {
        assert_eq!(next_version(Some("v1"), ReleaseType::Patch.into()), "1.0.0");
    }

    #[test]
    fn test_next_pre_version_same_channel_bumps_counter() {
        assert_eq!(
            next_pre_version(Some("1.0.0-dev.0"), ReleaseType::Major.into(), "dev"),
            "1.0.0-dev.1"
        );
        assert_eq!(
            next_pre_version(Some("1.0.0-beta.9"), ReleaseType::Patch.into(), "beta"),
            "1.0.0-beta.10"
        );
    }

    #[test]
    fn test_next_pre_version_new_channel() {
        assert_eq!(
            next_pre_version(Some("1.0.0"), ReleaseType::Minor.into(), "beta"),
            "1.1.0-beta.1"
        );
        assert_eq!(
            next_pre_version(Some("1.0.0-alpha.3"), ReleaseType::Minor.into(), "beta"),
            "1.0.0-beta.1"
        );
    }

    #[test]
    fn test_next_pre_version_first_release() {
        assert_eq!(
            next_pre_version(None, ReleaseType::Patch.into(), "rc"),
            "1.0.0-rc.1"
        );
    }
}
