// src/resolver/mod.rs

//! Dependency resolution and change planning
//!
//! The [`Planner`] turns an install, remove or upgrade request into a
//! [`Plan`]: the package versions to add (dependencies first) and the ones
//! to remove. It reads two package lists, what is available and what is
//! installed, and never modifies either. Each call is independent.

mod conflict;
mod engine;
mod graph;
mod plan;

pub use conflict::Conflict;
pub use graph::{DependencyEdge, DependencyGraph, GraphStats, NodeId, PackageNode};
pub use plan::{Plan, PlanSummary};

use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::package::{PackageList, PackageVersion};
use crate::version::VersionSpec;
use engine::{ResolveOptions, Resolution};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Spec matching every version, the default for all planner calls
pub const ANY_VERSION: &str = "*";

/// One or several package names
///
/// Lets batch operations take either a single name or a collection.
pub trait PackageNames {
    fn into_names(self) -> Vec<String>;
}

impl PackageNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl PackageNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl<T: AsRef<str>> PackageNames for &[T] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>, const N: usize> PackageNames for [T; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>, const N: usize> PackageNames for &[T; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>> PackageNames for Vec<T> {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

/// Computes install, remove and upgrade plans
pub struct Planner<'a> {
    available: &'a PackageList,
    installed: &'a PackageList,
    allow_multiple_versions: bool,
}

impl<'a> Planner<'a> {
    /// Create a planner allowing one installed version per package
    pub fn new(available: &'a PackageList, installed: &'a PackageList) -> Self {
        Self {
            available,
            installed,
            allow_multiple_versions: false,
        }
    }

    pub fn with_config(available: &'a PackageList, installed: &'a PackageList, config: &PlannerConfig) -> Self {
        Self::new(available, installed).allow_multiple_versions(config.allow_multiple_versions)
    }

    /// Let different versions of one package be installed side by side
    pub fn allow_multiple_versions(mut self, allow: bool) -> Self {
        self.allow_multiple_versions = allow;
        self
    }

    fn options(&self, follow_dependencies: bool, cascade_upgrades: bool) -> ResolveOptions {
        ResolveOptions {
            allow_multiple_versions: self.allow_multiple_versions,
            follow_dependencies,
            cascade_upgrades,
        }
    }

    /// Plan installing a version of `name` matching `spec`
    ///
    /// An installed version satisfying `spec` is kept in preference to a
    /// newer available one. Anything missing from the dependency closure is
    /// added, dependencies first. When only one version may be installed, a
    /// different installed version of a selected package is removed.
    pub fn install_plan(&self, name: &str, spec: &str, follow_dependencies: bool) -> Result<Plan> {
        info!("Planning install of {} {}", name, spec);

        let package = self
            .available
            .get(name)
            .ok_or_else(|| Error::UnknownPackage(name.to_string()))?;
        let version_spec = VersionSpec::parse(spec)?;

        if package.find(&version_spec).is_none() && self.installed.find(name, &version_spec).is_none() {
            if let Some(closest) = package.find_closest(&version_spec) {
                debug!("Closest available version of {} is {}", name, closest.version());
            }
            return Err(Error::UnknownPackageVersion {
                name: name.to_string(),
                spec: spec.to_string(),
            });
        }

        let mut resolution = Resolution::new(
            self.available,
            self.installed,
            self.options(follow_dependencies, false),
        );
        resolution.request(name, version_spec)?;
        let plan = resolution.finish()?;

        if plan.is_empty() {
            info!("{} {} is already installed", name, spec);
        }
        Ok(plan)
    }

    /// Plan removing the installed versions of `names` matching `spec`
    ///
    /// Removal is refused while an installed package outside the batch
    /// still needs a removed version. Packages removed in the same batch do
    /// not block each other. Dependents are removed before dependencies.
    pub fn remove_plan(&self, names: impl PackageNames, spec: &str, follow_dependencies: bool) -> Result<Plan> {
        let names = names.into_names();
        info!("Planning removal of {} {}", names.join(", "), spec);

        let version_spec = VersionSpec::parse(spec)?;
        let mut removing: IndexMap<NodeId, PackageVersion> = IndexMap::new();

        for name in &names {
            let matched: Vec<&PackageVersion> = self
                .installed
                .get(name)
                .map(|pkg| pkg.matching(&version_spec).collect())
                .unwrap_or_default();
            if matched.is_empty() {
                return Err(Error::NotInstalled(name.clone()));
            }
            for pv in matched {
                removing.insert(NodeId::of(pv), pv.clone());
            }
        }

        if follow_dependencies {
            self.check_removal(&removing)?;
        }

        // Order the batch so dependents go before what they depend on
        let mut graph = DependencyGraph::new();
        for pv in removing.values() {
            graph.add_node(PackageNode::new(pv.clone(), true));
        }
        for (id, pv) in &removing {
            for (dep, dep_spec) in pv.dependencies() {
                graph.add_edge(DependencyEdge {
                    from: id.clone(),
                    to: dep.clone(),
                    constraint: *dep_spec,
                });
            }
        }
        let roots: Vec<NodeId> = removing.keys().cloned().collect();
        let remove: Vec<PackageVersion> = graph
            .install_order(&roots)
            .iter()
            .rev()
            .filter_map(|id| removing.get(id).cloned())
            .collect();

        Ok(Plan::new(Vec::new(), remove))
    }

    /// Fail if an installed package outside the batch needs a removed version
    fn check_removal(&self, removing: &IndexMap<NodeId, PackageVersion>) -> Result<()> {
        for id in removing.keys() {
            for (dependent, dep_spec) in self.installed.dependents_of(&id.name) {
                if removing.contains_key(&NodeId::of(dependent)) {
                    continue;
                }
                let still_satisfied = self
                    .installed
                    .get(&id.name)
                    .into_iter()
                    .flat_map(|pkg| pkg.versions())
                    .filter(|pv| !removing.contains_key(&NodeId::of(pv)))
                    .any(|pv| dep_spec.is_satisfied_by(&pv.version()));
                if !still_satisfied {
                    return Err(Error::HasDependent {
                        name: id.name.clone(),
                        dependent: dependent.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Plan upgrading installed `names` to the newest version matching `spec`
    ///
    /// A package with nothing newer to offer is left alone. When following
    /// dependencies, installed packages whose declared ranges exclude a new
    /// version are upgraded as well, transitively.
    pub fn upgrade_plan(&self, names: impl PackageNames, spec: &str, follow_dependencies: bool) -> Result<Plan> {
        let names = names.into_names();
        info!("Planning upgrade of {} {}", names.join(", "), spec);

        let version_spec = VersionSpec::parse(spec)?;

        let mut current = Vec::with_capacity(names.len());
        for name in &names {
            let newest_installed = self
                .installed
                .get(name)
                .and_then(|pkg| pkg.newest())
                .ok_or_else(|| Error::NotInstalled(name.clone()))?;
            current.push(newest_installed);
        }

        let mut resolution = Resolution::new(
            self.available,
            self.installed,
            self.options(follow_dependencies, true),
        );

        for installed in current {
            let target = self.available.get(installed.name()).and_then(|pkg| {
                pkg.newer_than(installed.version())
                    .find(|pv| version_spec.is_satisfied_by(&pv.version()))
            });
            match target {
                Some(target) => resolution.pin(target, Some(installed))?,
                None => debug!("No newer version of {} matches {}", installed, spec),
            }
        }

        resolution.finish()
    }
}
