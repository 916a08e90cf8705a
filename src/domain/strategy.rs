//! Dependency bump strategies.
//!
//! Unknown strategy names never fail: they fall back to the default variant
//! and a warning is logged.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::release_type::ReleaseType;

/// How a dependent's declared range is rewritten when a dependency is released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BumpStrategy {
    /// Replace the range with the next version
    #[default]
    Override,
    /// Keep the range while the next version satisfies it
    Satisfy,
    /// Rebuild the range in its current shape
    Inherit,
    /// Leave the range alone
    Ignore,
}

impl BumpStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpStrategy::Override => "override",
            BumpStrategy::Satisfy => "satisfy",
            BumpStrategy::Inherit => "inherit",
            BumpStrategy::Ignore => "ignore",
        }
    }
}

impl From<&str> for BumpStrategy {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "override" => BumpStrategy::Override,
            "satisfy" => BumpStrategy::Satisfy,
            "inherit" => BumpStrategy::Inherit,
            "ignore" => BumpStrategy::Ignore,
            other => {
                warn!(value = other, "unknown bump strategy, using override");
                BumpStrategy::default()
            }
        }
    }
}

impl From<String> for BumpStrategy {
    fn from(value: String) -> Self {
        BumpStrategy::from(value.as_str())
    }
}

impl From<BumpStrategy> for String {
    fn from(strategy: BumpStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl fmt::Display for BumpStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release type given to a package whose dependencies force a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReleaseStrategy {
    #[default]
    Patch,
    Minor,
    Major,
    /// Take the highest release type among the released dependencies
    Inherit,
}

impl ReleaseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStrategy::Patch => "patch",
            ReleaseStrategy::Minor => "minor",
            ReleaseStrategy::Major => "major",
            ReleaseStrategy::Inherit => "inherit",
        }
    }

    /// Release type for a dependent whose most severe dependency release is `highest`
    pub fn release_type_for(&self, highest: ReleaseType) -> ReleaseType {
        match self {
            ReleaseStrategy::Patch => ReleaseType::Patch,
            ReleaseStrategy::Minor => ReleaseType::Minor,
            ReleaseStrategy::Major => ReleaseType::Major,
            ReleaseStrategy::Inherit => highest,
        }
    }
}

impl From<&str> for ReleaseStrategy {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "patch" => ReleaseStrategy::Patch,
            "minor" => ReleaseStrategy::Minor,
            "major" => ReleaseStrategy::Major,
            "inherit" => ReleaseStrategy::Inherit,
            other => {
                warn!(value = other, "unknown release strategy, using patch");
                ReleaseStrategy::default()
            }
        }
    }
}

impl From<String> for ReleaseStrategy {
    fn from(value: String) -> Self {
        ReleaseStrategy::from(value.as_str())
    }
}

impl From<ReleaseStrategy> for String {
    fn from(strategy: ReleaseStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl fmt::Display for ReleaseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range operator prepended to overridden dependency versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RangePrefix {
    #[default]
    Exact,
    Caret,
    Tilde,
}

impl RangePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePrefix::Exact => "",
            RangePrefix::Caret => "^",
            RangePrefix::Tilde => "~",
        }
    }
}

impl From<&str> for RangePrefix {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" => RangePrefix::Exact,
            "^" => RangePrefix::Caret,
            "~" => RangePrefix::Tilde,
            other => {
                warn!(value = other, "unknown range prefix, using exact versions");
                RangePrefix::default()
            }
        }
    }
}

impl From<String> for RangePrefix {
    fn from(value: String) -> Self {
        RangePrefix::from(value.as_str())
    }
}

impl From<RangePrefix> for String {
    fn from(prefix: RangePrefix) -> Self {
        prefix.as_str().to_string()
    }
}

impl fmt::Display for RangePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
