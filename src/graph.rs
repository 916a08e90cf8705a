//! Arena of workspace packages linked by their local dependencies.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{MultiReleaseError, Result};
use crate::package::{Package, PackageId};

/// Workspace packages addressed by [`PackageId`].
///
/// Packages are immutable once the graph is built; edges point from a
/// package to the workspace packages its manifest declares in any scope.
#[derive(Debug, Clone)]
pub struct PackageGraph {
    packages: Vec<Package>,
    index: IndexMap<String, PackageId>,
}

impl PackageGraph {
    /// Build the graph, linking each package to its local dependencies.
    ///
    /// Fails when two packages share a name.
    pub fn new(mut packages: Vec<Package>) -> Result<Self> {
        let mut index = IndexMap::with_capacity(packages.len());
        for (i, package) in packages.iter().enumerate() {
            if index.insert(package.name.clone(), PackageId(i)).is_some() {
                return Err(MultiReleaseError::graph(format!(
                    "Duplicate package name '{}'",
                    package.name
                )));
            }
        }

        for package in &mut packages {
            let local_deps: Vec<PackageId> = package
                .manifest
                .dependency_names()
                .into_iter()
                .filter(|name| *name != package.name)
                .filter_map(|name| index.get(name).copied())
                .collect();
            debug!(package = %package.name, local_deps = local_deps.len(), "linked package");
            package.local_deps = local_deps;
        }

        Ok(PackageGraph { packages, index })
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    pub fn id_of(&self, name: &str) -> Option<PackageId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.id_of(name).map(|id| self.package(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.index.values().copied()
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Packages ordered so that dependencies come before their dependents.
    ///
    /// Cycles are broken at the edge that closes them, so every package
    /// appears exactly once.
    pub fn release_order(&self) -> Vec<PackageId> {
        let mut visited = vec![false; self.packages.len()];
        let mut order = Vec::with_capacity(self.packages.len());
        for id in self.ids() {
            self.visit(id, &mut visited, &mut order);
        }
        order
    }

    fn visit(&self, id: PackageId, visited: &mut [bool], order: &mut Vec<PackageId>) {
        if visited[id.0] {
            return;
        }
        visited[id.0] = true;
        for &dep in self.package(id).local_deps() {
            self.visit(dep, visited, order);
        }
        order.push(id);
    }
}
