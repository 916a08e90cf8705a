//! Release type resolution across local dependencies.
//!
//! A package releases when its own changes call for it, or when one of its
//! local dependencies releases. In the latter case the dependency ranges in
//! its manifest are rewritten to follow the dependency's next version.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DepsConfig;
use crate::domain::{resolve_next_version, BumpStrategy, NextType, ReleaseType};
use crate::graph::PackageGraph;
use crate::package::{DependencyScope, Manifest, PackageId};

/// A dependency range rewritten during resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeChange {
    pub scope: DependencyScope,
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Resolves the release type of every package of a [`PackageGraph`].
///
/// The graph stays untouched; resolved types and rewritten manifests are held
/// by the resolver and handed out as a [`Resolution`].
pub struct ReleaseResolver<'g> {
    graph: &'g PackageGraph,
    deps: DepsConfig,
    next_types: Vec<NextType>,
    manifests: Vec<Manifest>,
    settled: Vec<bool>,
    visited: HashSet<PackageId>,
    path: Vec<PackageId>,
    cycles: Vec<(PackageId, PackageId)>,
    seen_cycles: HashSet<Vec<PackageId>>,
}

impl<'g> ReleaseResolver<'g> {
    pub fn new(graph: &'g PackageGraph, deps: DepsConfig) -> Self {
        let packages = graph.packages();
        ReleaseResolver {
            graph,
            deps,
            next_types: packages.iter().map(|p| p.next_type).collect(),
            manifests: packages.iter().map(|p| p.manifest.clone()).collect(),
            settled: vec![false; packages.len()],
            visited: HashSet::new(),
            path: Vec::new(),
            cycles: Vec::new(),
            seen_cycles: HashSet::new(),
        }
    }

    /// Resolve the release type of `id`, walking its dependencies first.
    ///
    /// A package keeps its own release type when it has one. Otherwise it
    /// releases when a previously released dependency does, with the type
    /// picked by the configured release strategy. Calling this again for an
    /// already determined package returns the same value without touching
    /// any manifest.
    pub fn resolve_release_type(&mut self, id: PackageId) -> NextType {
        self.visited.clear();
        self.path.clear();
        self.resolve(id)
    }

    /// Resolve every package, dependencies first.
    ///
    /// Once every type is settled, the ranges of each package are rewritten
    /// once more against the final types of its dependencies. A package that
    /// settled before its cycle partner was resolved still follows it.
    pub fn resolve_all(mut self) -> Resolution<'g> {
        let order = self.graph.release_order();
        for &id in &order {
            self.resolve_release_type(id);
        }
        if self.deps.bump != BumpStrategy::Ignore {
            for &id in &order {
                self.follow_dependencies(id);
            }
        }
        self.finish()
    }

    /// Hand out the results computed so far
    pub fn finish(self) -> Resolution<'g> {
        Resolution {
            graph: self.graph,
            next_types: self.next_types,
            manifests: self.manifests,
            cycles: self.cycles,
        }
    }

    fn resolve(&mut self, id: PackageId) -> NextType {
        let current = self.next_types[id.index()];
        if self.settled[id.index()] {
            return current;
        }

        if !self.visited.insert(id) {
            if self.path.contains(&id) {
                self.record_cycle(id);
            }
            return current;
        }

        let graph = self.graph;
        let package = graph.package(id);
        self.path.push(id);

        let mut highest: Option<ReleaseType> = None;
        for &dep_id in package.local_deps() {
            let dep_type = self.resolve(dep_id);
            let Some(release) = dep_type.release_type() else {
                continue;
            };

            let dependency = graph.package(dep_id);
            if self.deps.bump != BumpStrategy::Ignore {
                let next_version = dependency.next_version_for(dep_type);
                self.bump_dependency(id, &dependency.name, &next_version);
            }
            if dependency.last_version().is_some() {
                highest = highest.max(Some(release));
            }
        }

        self.path.pop();

        let resolved = match (current, highest) {
            (NextType::Undetermined, Some(highest)) => {
                NextType::Release(self.deps.release.release_type_for(highest))
            }
            _ => current,
        };
        debug!(
            package = %package.name,
            next_type = %resolved,
            intrinsic = %package.next_type,
            "resolved release type"
        );

        self.next_types[id.index()] = resolved;
        self.settled[id.index()] = resolved.is_determined();
        resolved
    }

    /// Rewrite the ranges of `id` for every dependency that releases
    fn follow_dependencies(&mut self, id: PackageId) {
        let graph = self.graph;
        for &dep_id in graph.package(id).local_deps() {
            let dep_type = self.next_types[dep_id.index()];
            if dep_type.is_release() {
                let dependency = graph.package(dep_id);
                let next_version = dependency.next_version_for(dep_type);
                self.bump_dependency(id, &dependency.name, &next_version);
            }
        }
    }

    fn bump_dependency(&mut self, id: PackageId, dependency: &str, next_version: &str) {
        let manifest = &mut self.manifests[id.index()];
        for scope in DependencyScope::ALL {
            let Some(current) = manifest.dependency(scope, dependency) else {
                continue;
            };
            let resolved =
                resolve_next_version(current, next_version, self.deps.bump, self.deps.prefix);
            if resolved != current {
                debug!(
                    package = %self.graph.package(id).name,
                    dependency,
                    %scope,
                    from = current,
                    to = %resolved,
                    "rewrote dependency range"
                );
                manifest.set_dependency(scope, dependency, resolved);
            }
        }
    }

    /// Report a cycle once, whichever package it was entered from
    fn record_cycle(&mut self, id: PackageId) {
        let (Some(start), Some(&from)) = (
            self.path.iter().position(|p| *p == id),
            self.path.last(),
        ) else {
            return;
        };
        let mut members = self.path[start..].to_vec();
        members.sort();
        if !self.seen_cycles.insert(members) {
            return;
        }
        warn!(
            package = %self.graph.package(from).name,
            dependency = %self.graph.package(id).name,
            "dependency cycle"
        );
        self.cycles.push((from, id));
    }
}

/// Outcome of resolving a [`PackageGraph`]
#[derive(Debug, Clone)]
pub struct Resolution<'g> {
    graph: &'g PackageGraph,
    next_types: Vec<NextType>,
    manifests: Vec<Manifest>,
    cycles: Vec<(PackageId, PackageId)>,
}

impl<'g> Resolution<'g> {
    pub fn graph(&self) -> &'g PackageGraph {
        self.graph
    }

    pub fn next_type(&self, id: PackageId) -> NextType {
        self.next_types[id.index()]
    }

    /// Manifest of `id` with its dependency ranges rewritten
    pub fn manifest(&self, id: PackageId) -> &Manifest {
        &self.manifests[id.index()]
    }

    /// Version `id` is released as, if it releases at all
    pub fn next_version(&self, id: PackageId) -> Option<String> {
        let next_type = self.next_type(id);
        next_type
            .is_release()
            .then(|| self.graph.package(id).next_version_for(next_type))
    }

    /// Ranges of `id` that differ from its original manifest
    pub fn changed_ranges(&self, id: PackageId) -> Vec<RangeChange> {
        let original = &self.graph.package(id).manifest;
        let updated = self.manifest(id);
        let mut changes = Vec::new();
        for scope in DependencyScope::ALL {
            for (name, to) in updated.dependencies(scope) {
                let from = original.dependency(scope, name).unwrap_or_default();
                if from != to {
                    changes.push(RangeChange {
                        scope,
                        name: name.to_string(),
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
            }
        }
        changes
    }

    /// Dependency edges that closed a cycle, as `(dependent, dependency)`
    pub fn cycles(&self) -> &[(PackageId, PackageId)] {
        &self.cycles
    }
}
