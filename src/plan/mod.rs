//! Release planning: from packages and tags to the versions to publish.

pub mod file;

pub use file::{ManifestSource, PlanFile, PlanPackage, PlanWorkspace};

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::tag::latest_tagged_version;
use crate::domain::{BranchContext, NextType};
use crate::engine::{ReleaseEngine, TagSource};
use crate::error::Result;
use crate::graph::PackageGraph;
use crate::package::{LastRelease, Manifest, Package, PackageId};
use crate::resolver::{RangeChange, ReleaseResolver, Resolution};
use crate::warning::PlanWarning;

/// What happens to one package in a release
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRelease {
    pub name: String,
    pub next_type: NextType,
    pub last_version: Option<String>,
    pub last_tag: Option<String>,
    pub next_version: Option<String>,
    pub next_tag: Option<String>,
    pub dependency_updates: Vec<RangeChange>,
    /// Manifest with rewritten dependency ranges
    #[serde(skip)]
    pub manifest: Manifest,
    #[serde(skip)]
    pub manifest_path: Option<PathBuf>,
}

impl PlannedRelease {
    pub fn is_release(&self) -> bool {
        self.next_version.is_some()
    }
}

/// Outcome of planning, packages listed dependencies first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlan {
    pub branch: String,
    pub channel: Option<String>,
    pub releases: Vec<PlannedRelease>,
    pub warnings: Vec<PlanWarning>,
}

impl ReleasePlan {
    pub fn release(&self, name: &str) -> Option<&PlannedRelease> {
        self.releases.iter().find(|release| release.name == name)
    }

    /// Packages that get a new version
    pub fn releasing(&self) -> impl Iterator<Item = &PlannedRelease> {
        self.releases.iter().filter(|release| release.is_release())
    }

    /// On-disk manifests whose dependency ranges changed
    pub fn manifests_to_write(&self) -> impl Iterator<Item = (&Path, &Manifest)> {
        self.releases.iter().filter_map(|release| {
            if release.dependency_updates.is_empty() {
                return None;
            }
            let path = release.manifest_path.as_deref()?;
            Some((path, &release.manifest))
        })
    }

    /// Write rewritten manifests back to disk
    ///
    /// # Returns
    /// * `Ok(Vec<PathBuf>)` - Paths that were written
    /// * `Err` - If a manifest cannot be written
    pub fn write_manifests(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (path, manifest) in self.manifests_to_write() {
            manifest.write(path)?;
            info!(path = %path.display(), "wrote manifest");
            written.push(path.to_path_buf());
        }
        Ok(written)
    }
}

/// Plans the release of a set of packages from one branch
pub struct Planner<'a, E, T> {
    config: &'a Config,
    branch: BranchContext,
    engine: &'a E,
    tags: &'a T,
}

impl<'a, E: ReleaseEngine, T: TagSource> Planner<'a, E, T> {
    pub fn new(config: &'a Config, branch: BranchContext, engine: &'a E, tags: &'a T) -> Self {
        Planner {
            config,
            branch,
            engine,
            tags,
        }
    }

    /// Plan the release of `packages`.
    ///
    /// Each package gets its last release from the branch tags (unless it
    /// already carries one) and its own release type from the engine. The
    /// graph is then resolved and every package gets its next version and
    /// tag.
    pub fn plan(&self, packages: Vec<Package>) -> Result<ReleasePlan> {
        let tags = self.tags.tags()?;
        let mut warnings = Vec::new();

        let mut prepared = Vec::with_capacity(packages.len());
        for package in packages {
            let mut package = package.on_branch(&self.branch);
            if package.last_release.is_none() {
                package.last_release = self.last_release(&package.name, &tags, &mut warnings)?;
            }
            if package.last_version().is_none() {
                warnings.push(PlanWarning::FirstRelease {
                    package: package.name.clone(),
                });
            }
            package.next_type = self.engine.next_type(&package, &self.branch)?;
            debug!(
                package = %package.name,
                last_version = package.last_version().unwrap_or("-"),
                next_type = %package.next_type,
                "analyzed package"
            );
            prepared.push(package);
        }

        let graph = PackageGraph::new(prepared)?;
        let resolution = ReleaseResolver::new(&graph, self.config.deps).resolve_all();

        warnings.extend(resolution.cycles().iter().map(|&(from, to)| {
            PlanWarning::DependencyCycle {
                package: graph.package(from).name.clone(),
                dependency: graph.package(to).name.clone(),
            }
        }));

        let releases: Vec<PlannedRelease> = graph
            .release_order()
            .into_iter()
            .map(|id| self.planned_release(&resolution, id))
            .collect();

        info!(
            branch = %self.branch.name,
            packages = releases.len(),
            releasing = releases.iter().filter(|r| r.is_release()).count(),
            "planned release"
        );

        Ok(ReleasePlan {
            branch: self.branch.name.clone(),
            channel: self.branch.pre_release.clone(),
            releases,
            warnings,
        })
    }

    fn last_release(
        &self,
        name: &str,
        tags: &[String],
        warnings: &mut Vec<PlanWarning>,
    ) -> Result<Option<LastRelease>> {
        let format = &self.config.tag_format;
        for tag in tags {
            if format.claims(name, tag) && format.parse_version(name, tag).is_none() {
                warnings.push(PlanWarning::UnparsableTag {
                    package: name.to_string(),
                    tag: tag.clone(),
                });
            }
        }

        let channel = self.branch.pre_release.as_deref();
        let Some(latest) =
            latest_tagged_version(format, name, tags.iter().map(String::as_str), channel)
        else {
            return Ok(None);
        };

        Ok(Some(LastRelease {
            version: Some(latest.version.to_string()),
            git_head: self.tags.tag_head(&latest.tag)?,
            git_tag: Some(latest.tag),
        }))
    }

    fn planned_release(&self, resolution: &Resolution<'_>, id: PackageId) -> PlannedRelease {
        let package = resolution.graph().package(id);
        let next_version = resolution.next_version(id);
        let next_tag = next_version
            .as_deref()
            .map(|version| self.config.tag_format.format(&package.name, version));

        PlannedRelease {
            name: package.name.clone(),
            next_type: resolution.next_type(id),
            last_version: package.last_version().map(str::to_string),
            last_tag: package
                .last_release
                .as_ref()
                .and_then(|release| release.git_tag.clone()),
            next_version,
            next_tag,
            dependency_updates: resolution.changed_ranges(id),
            manifest: resolution.manifest(id).clone(),
            manifest_path: package.manifest_path.clone(),
        }
    }
}
