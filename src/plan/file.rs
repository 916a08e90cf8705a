//! JSON plan files describing a workspace to release.
//!
//! ```json
//! {
//!   "branch": "main",
//!   "tags": ["core@1.0.0", "app@1.0.0"],
//!   "heads": { "core@1.0.0": "4f2a9c1" },
//!   "packages": [
//!     { "manifest": "packages/core/package.json", "nextType": "minor" },
//!     { "manifest": { "name": "app", "dependencies": { "core": "^1.0.0" } } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::NextType;
use crate::engine::InMemorySource;
use crate::error::{MultiReleaseError, Result};
use crate::package::{Manifest, Package};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFile {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Commit each listed tag points at; entries for unlisted tags are ignored
    #[serde(default)]
    pub heads: IndexMap<String, String>,
    pub packages: Vec<PlanPackage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPackage {
    pub manifest: ManifestSource,
    /// Overrides the manifest's `name`
    #[serde(default)]
    pub name: Option<String>,
    /// Release type the package's own changes call for
    #[serde(default)]
    pub next_type: NextType,
}

/// A manifest given by path (relative to the plan file) or inline
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManifestSource {
    Path(PathBuf),
    Inline(Manifest),
}

/// Packages of a plan file and the source answering for their tags and
/// release types
#[derive(Debug, Clone)]
pub struct PlanWorkspace {
    pub branch: Option<String>,
    pub packages: Vec<Package>,
    pub source: InMemorySource,
}

impl PlanFile {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| MultiReleaseError::config(format!("Invalid plan file: {}", e)))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            MultiReleaseError::config(format!("Invalid plan file '{}': {}", path.display(), e))
        })
    }

    /// Load manifests, resolving relative paths against `base_dir`
    pub fn into_workspace(self, base_dir: &Path) -> Result<PlanWorkspace> {
        let mut source = InMemorySource::new();
        for tag in &self.tags {
            source.add_tag(tag.as_str(), self.heads.get(tag).map(String::as_str));
        }
        for tag in self.heads.keys().filter(|tag| !self.tags.contains(tag)) {
            warn!(tag = %tag, "ignoring head of a tag missing from the tag list");
        }

        let mut packages = Vec::with_capacity(self.packages.len());
        for entry in self.packages {
            let (manifest, manifest_path) = match entry.manifest {
                ManifestSource::Path(path) => {
                    let path = base_dir.join(path);
                    debug!(path = %path.display(), "reading manifest");
                    (Manifest::read(&path)?, Some(path))
                }
                ManifestSource::Inline(manifest) => (manifest, None),
            };

            let mut package = match entry.name {
                Some(name) => Package::new(name, manifest),
                None => match &manifest_path {
                    Some(path) => Package::from_manifest(manifest)
                        .map_err(|_| MultiReleaseError::manifest(path, "manifest has no name"))?,
                    None => Package::from_manifest(manifest)?,
                },
            };
            package.manifest_path = manifest_path;
            source.set_next_type(package.name.as_str(), entry.next_type);
            packages.push(package);
        }

        Ok(PlanWorkspace {
            branch: self.branch,
            packages,
            source,
        })
    }
}
