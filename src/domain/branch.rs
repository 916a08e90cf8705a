use crate::config::BranchConfig;
use crate::error::{MultiReleaseError, Result};

/// The branch being released from, with its pre-release channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub pre_release: Option<String>,
}

impl BranchContext {
    /// Create a release branch context
    pub fn new(name: impl Into<String>) -> Self {
        BranchContext {
            name: name.into(),
            pre_release: None,
        }
    }

    /// Create a pre-release branch context publishing to `channel`
    pub fn pre_release(name: impl Into<String>, channel: impl Into<String>) -> Self {
        BranchContext {
            name: name.into(),
            pre_release: Some(channel.into()),
        }
    }

    /// Look up `name` among the configured branches
    pub fn from_config(name: &str, branches: &[BranchConfig]) -> Result<Self> {
        let branch = branches
            .iter()
            .find(|branch| branch.name == name)
            .ok_or_else(|| {
                MultiReleaseError::config(format!(
                    "Branch '{}' is not configured for releases",
                    name
                ))
            })?;

        Ok(BranchContext {
            name: branch.name.clone(),
            pre_release: branch.channel(),
        })
    }

    /// Check if this branch publishes plain releases
    pub fn is_release_branch(&self) -> bool {
        self.pre_release.is_none()
    }
}
