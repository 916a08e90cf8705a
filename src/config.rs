use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{BumpStrategy, RangePrefix, ReleaseStrategy, TagFormat};
use crate::error::Result;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "multirelease.toml";

/// Represents the complete configuration for multi-release.
///
/// Contains the tag format, dependency bump rules and release branches.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tag_format: TagFormat,

    #[serde(default)]
    pub deps: DepsConfig,

    #[serde(default = "default_branches")]
    pub branches: Vec<BranchConfig>,
}

/// How local dependency releases propagate to dependents.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepsConfig {
    /// Rewrite rule for dependency ranges
    #[serde(default)]
    pub bump: BumpStrategy,

    /// Release type of a dependent forced to release by its dependencies
    #[serde(default)]
    pub release: ReleaseStrategy,

    /// Operator prepended to overridden ranges
    #[serde(default)]
    pub prefix: RangePrefix,
}

/// A branch releases are published from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BranchConfig {
    pub name: String,

    /// `true` publishes pre-releases named after the branch, a string names
    /// the channel explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<PrereleaseSetting>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PrereleaseSetting {
    Enabled(bool),
    Channel(String),
}

impl BranchConfig {
    /// A branch publishing plain releases
    pub fn release(name: impl Into<String>) -> Self {
        BranchConfig {
            name: name.into(),
            prerelease: None,
        }
    }

    /// A branch publishing pre-releases named after the branch
    pub fn prerelease(name: impl Into<String>) -> Self {
        BranchConfig {
            name: name.into(),
            prerelease: Some(PrereleaseSetting::Enabled(true)),
        }
    }

    /// Pre-release channel published from this branch, if any
    pub fn channel(&self) -> Option<String> {
        match &self.prerelease {
            Some(PrereleaseSetting::Enabled(true)) => Some(self.name.clone()),
            Some(PrereleaseSetting::Channel(channel)) if !channel.is_empty() => {
                Some(channel.clone())
            }
            _ => None,
        }
    }
}

/// Returns the default release branches.
fn default_branches() -> Vec<BranchConfig> {
    vec![
        BranchConfig::release("master"),
        BranchConfig::release("main"),
        BranchConfig::release("next"),
        BranchConfig::release("next-major"),
        BranchConfig::prerelease("beta"),
        BranchConfig::prerelease("alpha"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_format: TagFormat::default(),
            deps: DepsConfig::default(),
            branches: default_branches(),
        }
    }
}

/// Path of the user-level config file, if a config directory exists
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("multi-release").join("config.toml"))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `multirelease.toml` in current directory
/// 3. `multi-release/config.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or its tag
///   format has no `{version}` placeholder
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(PathBuf::from(path))
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        Some(PathBuf::from(LOCAL_CONFIG_FILE))
    } else {
        user_config_path().filter(|path| path.exists())
    };

    let Some(path) = path else {
        debug!("no config file found, using defaults");
        return Ok(Config::default());
    };

    debug!(path = %path.display(), "loading config");
    let config_str = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&config_str)?;
    config.tag_format.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deps() {
        let config = Config::default();
        assert_eq!(config.deps.bump, BumpStrategy::Override);
        assert_eq!(config.deps.release, ReleaseStrategy::Patch);
        assert_eq!(config.deps.prefix, RangePrefix::Exact);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
[deps]
release = "inherit"
"#,
        )
        .unwrap();
        assert_eq!(config.deps.release, ReleaseStrategy::Inherit);
        assert_eq!(config.deps.bump, BumpStrategy::Override);
        assert_eq!(config.branches, default_branches());
    }

    #[test]
    fn test_branch_channels() {
        let config: Config = toml::from_str(
            r#"
[[branches]]
name = "main"

[[branches]]
name = "next"
prerelease = "rc"

[[branches]]
name = "beta"
prerelease = true

[[branches]]
name = "legacy"
prerelease = false
"#,
        )
        .unwrap();
        let channels: Vec<Option<String>> =
            config.branches.iter().map(BranchConfig::channel).collect();
        assert_eq!(
            channels,
            vec![None, Some("rc".to_string()), Some("beta".to_string()), None]
        );
    }

    #[test]
    fn test_unknown_strategy_falls_back() {
        let config: Config = toml::from_str(
            r#"
[deps]
bump = "sideways"
prefix = "^"
"#,
        )
        .unwrap();
        assert_eq!(config.deps.bump, BumpStrategy::Override);
        assert_eq!(config.deps.prefix, RangePrefix::Caret);
    }
}
