//! Workspace packages and their manifests.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{next_pre_version, next_version, BranchContext, NextType};
use crate::error::{MultiReleaseError, Result};

/// Index of a package inside a [`crate::graph::PackageGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId(pub(crate) usize);

impl PackageId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Manifest section declaring dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyScope {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
}

impl DependencyScope {
    pub const ALL: [DependencyScope; 4] = [
        DependencyScope::Dependencies,
        DependencyScope::DevDependencies,
        DependencyScope::PeerDependencies,
        DependencyScope::OptionalDependencies,
    ];

    /// Manifest key of the section
    pub fn key(&self) -> &'static str {
        match self {
            DependencyScope::Dependencies => "dependencies",
            DependencyScope::DevDependencies => "devDependencies",
            DependencyScope::PeerDependencies => "peerDependencies",
            DependencyScope::OptionalDependencies => "optionalDependencies",
        }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A package.json document.
///
/// Kept as a JSON object so fields this crate does not know about, and their
/// order, survive a write-back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    document: Map<String, Value>,
}

impl Manifest {
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Manifest with only a `name`
    pub fn named(name: impl Into<String>) -> Self {
        let mut document = Map::new();
        document.insert("name".to_string(), Value::String(name.into()));
        Manifest { document }
    }

    /// Parse a manifest, which must be a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(document) => Ok(Manifest { document }),
            _ => Err(MultiReleaseError::manifest(
                "<inline>",
                "manifest must be a JSON object",
            )),
        }
    }

    /// Read a manifest from disk
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Manifest::from_json(&content)
            .map_err(|e| MultiReleaseError::manifest(path, e.to_string()))
    }

    /// Write the manifest as pretty JSON with a trailing newline
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.document)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.document.get("version").and_then(Value::as_str)
    }

    /// Declared range of `name` in `scope`
    pub fn dependency(&self, scope: DependencyScope, name: &str) -> Option<&str> {
        self.document
            .get(scope.key())?
            .as_object()?
            .get(name)?
            .as_str()
    }

    /// All `(name, range)` pairs of `scope`, in declaration order
    pub fn dependencies(&self, scope: DependencyScope) -> Vec<(&str, &str)> {
        self.document
            .get(scope.key())
            .and_then(Value::as_object)
            .map(|section| {
                section
                    .iter()
                    .filter_map(|(name, range)| Some((name.as_str(), range.as_str()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names declared in any scope, first declaration wins the position
    pub fn dependency_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for scope in DependencyScope::ALL {
            for (name, _) in self.dependencies(scope) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Set the range of `name` in `scope`, creating the section if needed
    pub fn set_dependency(
        &mut self,
        scope: DependencyScope,
        name: impl Into<String>,
        range: impl Into<String>,
    ) {
        let section = self
            .document
            .entry(scope.key())
            .or_insert_with(|| Value::Object(Map::new()));
        if !section.is_object() {
            *section = Value::Object(Map::new());
        }
        if let Value::Object(section) = section {
            section.insert(name.into(), Value::String(range.into()));
        }
    }

    /// Builder form of [`Manifest::set_dependency`]
    pub fn with_dependency(
        mut self,
        scope: DependencyScope,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        self.set_dependency(scope, name, range);
        self
    }
}

/// The most recent release of a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastRelease {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_head: Option<String>,
}

impl LastRelease {
    pub fn version(version: impl Into<String>) -> Self {
        LastRelease {
            version: Some(version.into()),
            ..LastRelease::default()
        }
    }
}

/// A workspace package as handed to the resolver.
///
/// `next_type` is the package's own release type as reported by the release
/// engine; dependency-driven types are kept apart in
/// [`crate::resolver::Resolution`].
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub manifest: Manifest,
    pub manifest_path: Option<PathBuf>,
    pub last_release: Option<LastRelease>,
    pub next_type: NextType,
    pub branch: String,
    pub pre_release: Option<String>,
    pub(crate) local_deps: Vec<PackageId>,
}

impl Package {
    pub fn new(name: impl Into<String>, manifest: Manifest) -> Self {
        Package {
            name: name.into(),
            manifest,
            manifest_path: None,
            last_release: None,
            next_type: NextType::Undetermined,
            branch: String::new(),
            pre_release: None,
            local_deps: Vec::new(),
        }
    }

    /// Package named after its manifest's `name` field
    pub fn from_manifest(manifest: Manifest) -> Result<Self> {
        let name = manifest
            .name()
            .map(str::to_string)
            .ok_or_else(|| MultiReleaseError::manifest("<inline>", "manifest has no name"))?;
        Ok(Package::new(name, manifest))
    }

    pub fn with_last_release(mut self, version: impl Into<String>) -> Self {
        self.last_release = Some(LastRelease::version(version));
        self
    }

    pub fn with_next_type(mut self, next_type: impl Into<NextType>) -> Self {
        self.next_type = next_type.into();
        self
    }

    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Place the package on `branch`, taking its pre-release channel
    pub fn on_branch(mut self, branch: &BranchContext) -> Self {
        self.branch = branch.name.clone();
        self.pre_release = branch.pre_release.clone();
        self
    }

    pub fn last_version(&self) -> Option<&str> {
        self.last_release.as_ref()?.version.as_deref()
    }

    /// Local dependencies, in manifest order
    pub fn local_deps(&self) -> &[PackageId] {
        &self.local_deps
    }

    /// Version this package gets when released with `next_type`, on its
    /// pre-release channel if it has one
    pub fn next_version_for(&self, next_type: NextType) -> String {
        match &self.pre_release {
            Some(channel) => next_pre_version(self.last_version(), next_type, channel),
            None => next_version(self.last_version(), next_type),
        }
    }
}
