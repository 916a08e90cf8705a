use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{MultiReleaseError, Result};

/// Severity of a semantic version change, ordered `patch < minor < major`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Patch => "patch",
            ReleaseType::Minor => "minor",
            ReleaseType::Major => "major",
        }
    }
}

impl FromStr for ReleaseType {
    type Err = MultiReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "patch" => Ok(ReleaseType::Patch),
            "minor" => Ok(ReleaseType::Minor),
            "major" => Ok(ReleaseType::Major),
            other => Err(MultiReleaseError::version(format!(
                "Unknown release type: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next release decision for a package.
///
/// Serialized the way release engines report it: `null` (undetermined),
/// `false` (no release) or a release type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NextType {
    /// Not decided yet
    #[default]
    Undetermined,
    /// Explicitly no release
    NoRelease,
    /// A semantic bump
    Release(ReleaseType),
}

impl NextType {
    /// `true` for both `NoRelease` and `Release(_)`
    pub fn is_determined(&self) -> bool {
        !matches!(self, NextType::Undetermined)
    }

    pub fn release_type(&self) -> Option<ReleaseType> {
        match self {
            NextType::Release(release) => Some(*release),
            _ => None,
        }
    }

    pub fn is_release(&self) -> bool {
        self.release_type().is_some()
    }
}

impl From<ReleaseType> for NextType {
    fn from(release: ReleaseType) -> Self {
        NextType::Release(release)
    }
}

impl fmt::Display for NextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextType::Undetermined => f.write_str("-"),
            NextType::NoRelease => f.write_str("none"),
            NextType::Release(release) => write!(f, "{}", release),
        }
    }
}

impl Serialize for NextType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NextType::Undetermined => serializer.serialize_none(),
            NextType::NoRelease => serializer.serialize_bool(false),
            NextType::Release(release) => release.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for NextType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Type(ReleaseType),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(NextType::Undetermined),
            Some(Repr::Flag(false)) => Ok(NextType::NoRelease),
            Some(Repr::Flag(true)) => Err(de::Error::custom(
                "`true` is not a release type, expected \"patch\", \"minor\", \"major\" or false",
            )),
            Some(Repr::Type(release)) => Ok(NextType::Release(release)),
        }
    }
}
