// src/resolver/engine.rs

//! Per-call resolution state
//!
//! A [`Resolution`] assigns concrete versions to every package a request
//! needs. Versions are selected depth-first: each selected node resolves its
//! own dependencies before control returns to its requirer. When a new
//! requirement rules out the version already selected for a package (and
//! only one version may be installed), the selection is swapped for one
//! that satisfies every live requirement, and nodes that no longer serve any
//! root are dropped.
//!
//! After resolution, installed packages that stay behind are checked
//! against the versions that are leaving the project. During upgrades a
//! broken dependent is itself upgraded (a cascade); otherwise it is an
//! error.

use crate::error::{Error, Result};
use crate::package::{PackageList, PackageVersion};
use crate::version::VersionSpec;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::conflict::Conflict;
use super::graph::{DependencyEdge, DependencyGraph, NodeId, PackageNode};
use super::plan::Plan;

/// Behavior switches for one resolution
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolveOptions {
    pub allow_multiple_versions: bool,
    pub follow_dependencies: bool,
    /// Upgrade dependents broken by a leaving version instead of failing
    pub cascade_upgrades: bool,
}

/// A top-level requirement: something the caller asked for by name
#[derive(Debug, Clone)]
struct Request {
    name: String,
    spec: VersionSpec,
}

/// A version that could be selected, with where it comes from
struct Candidate {
    package: PackageVersion,
    installed: bool,
}

pub(crate) struct Resolution<'a> {
    available: &'a PackageList,
    installed: &'a PackageList,
    options: ResolveOptions,
    graph: DependencyGraph,
    requests: Vec<Request>,
    /// Installed versions explicitly replaced by upgrades and cascades
    replaced: IndexMap<NodeId, PackageVersion>,
    /// Nodes whose dependencies are currently being resolved
    resolving: HashSet<NodeId>,
    reselections: HashMap<String, usize>,
}

impl<'a> Resolution<'a> {
    pub fn new(available: &'a PackageList, installed: &'a PackageList, options: ResolveOptions) -> Self {
        Self {
            available,
            installed,
            options,
            graph: DependencyGraph::new(),
            requests: Vec::new(),
            replaced: IndexMap::new(),
            resolving: HashSet::new(),
            reselections: HashMap::new(),
        }
    }

    /// Require some version of `name` on behalf of the caller
    pub fn request(&mut self, name: &str, spec: VersionSpec) -> Result<()> {
        self.requests.push(Request {
            name: name.to_string(),
            spec,
        });
        self.require(name, spec, None)
    }

    /// Require one exact version, replacing an installed one
    pub fn pin(&mut self, package: &PackageVersion, replacing: Option<&PackageVersion>) -> Result<()> {
        if let Some(old) = replacing {
            debug!("Replacing {} with {}", old, package);
            self.replaced.insert(NodeId::of(old), old.clone());
        }
        self.request(package.name(), VersionSpec::Exact(package.version()))
    }

    /// Check remaining installed packages, then order the result into a plan
    pub fn finish(mut self) -> Result<Plan> {
        if self.options.follow_dependencies {
            while let Some((dependent, name)) = self.find_broken_dependent()? {
                self.cascade(&dependent, &name)?;
            }
        }

        let roots = self.roots();
        self.graph.retain_reachable(&roots);
        debug!("Resolved graph: {:?}", self.graph.stats());

        let order = self.graph.install_order(&roots);
        let add: Vec<PackageVersion> = order
            .iter()
            .filter_map(|id| self.graph.get_node(id))
            .filter(|node| !node.installed)
            .map(|node| node.package.clone())
            .collect();

        let mut leaving = self.leaving();
        let mut remove = Vec::new();
        for pv in &add {
            let same_name: Vec<NodeId> = leaving
                .keys()
                .filter(|id| id.name == pv.name())
                .cloned()
                .collect();
            for id in same_name {
                if let Some(old) = leaving.shift_remove(&id) {
                    remove.push(old);
                }
            }
        }
        remove.extend(leaving.into_values());

        Ok(Plan::new(add, remove))
    }

    fn require(&mut self, name: &str, spec: VersionSpec, from: Option<&NodeId>) -> Result<()> {
        if let Some(from) = from {
            self.graph.add_edge(DependencyEdge {
                from: from.clone(),
                to: name.to_string(),
                constraint: spec,
            });
        }

        if let Some(existing) = self.graph.resolve_target(name, &spec) {
            debug!("{} already satisfies {} {}", existing.id, name, spec);
            return Ok(());
        }

        let current: Vec<NodeId> = self.graph.nodes_named(name).map(|n| n.id.clone()).collect();

        if current.is_empty() || self.options.allow_multiple_versions {
            let required = if self.options.allow_multiple_versions {
                vec![spec]
            } else {
                self.requirement_specs(name)
            };
            let candidate = self.choose(name, &required).ok_or_else(|| self.unsatisfiable(name, spec, from))?;
            return self.select(candidate);
        }

        // Only one version may be selected: find one everybody accepts
        let required = self.requirement_specs(name);
        let Some(candidate) = self.choose(name, &required) else {
            // Ranges that all overlap only lack a published version in between
            if ranges_overlap(&required) {
                return Err(self.unsatisfiable(name, spec, from));
            }
            return Err(Conflict::ConflictingConstraints {
                package: name.to_string(),
                constraints: self
                    .requirements_on(name)
                    .into_iter()
                    .map(|(requirer, spec)| (requirer, spec.to_string()))
                    .collect(),
            }
            .into());
        };

        let attempts = self.reselections.entry(name.to_string()).or_default();
        *attempts += 1;
        let attempts = *attempts;
        if attempts > self.candidates(name).len() {
            return Err(Conflict::TooManyCandidates {
                package: name.to_string(),
                attempts,
            }
            .into());
        }

        for old in &current {
            debug!("Re-selecting {} as {}", old, NodeId::of(&candidate.package));
            self.graph.remove_node(old);
            self.resolving.remove(old);
        }
        self.select(candidate)?;

        let roots = self.roots();
        for dropped in self.graph.retain_reachable(&roots) {
            debug!("Dropping {}, nothing requires it any more", dropped.id);
            self.resolving.remove(&dropped.id);
        }
        Ok(())
    }

    fn select(&mut self, candidate: Candidate) -> Result<()> {
        let node = PackageNode::new(candidate.package, candidate.installed);
        let id = node.id.clone();
        debug!(
            "Selected {}{}",
            id,
            if node.installed { " (installed)" } else { "" }
        );
        self.graph.add_node(node);

        if self.options.follow_dependencies {
            self.resolve_dependencies(&id)?;
        }
        Ok(())
    }

    fn resolve_dependencies(&mut self, id: &NodeId) -> Result<()> {
        if !self.resolving.insert(id.clone()) {
            return Ok(());
        }

        let dependencies: Vec<(String, VersionSpec)> = match self.graph.get_node(id) {
            Some(node) => node
                .package
                .dependencies()
                .iter()
                .map(|(name, spec)| (name.clone(), *spec))
                .collect(),
            None => Vec::new(),
        };

        for (name, spec) in dependencies {
            // A swap further down may have replaced this very node
            if !self.graph.contains(id) {
                break;
            }
            self.require(&name, spec, Some(id))?;
        }

        self.resolving.remove(id);
        Ok(())
    }

    /// Preferred candidate satisfying every spec
    ///
    /// Installed versions win over available ones. Among those, a version
    /// that also keeps installed dependents happy is preferred.
    fn choose(&self, name: &str, required: &[VersionSpec]) -> Option<Candidate> {
        let hints = self.installed_hints(name);
        let candidates: Vec<Candidate> = self
            .candidates(name)
            .into_iter()
            .filter(|c| required.iter().all(|spec| spec.is_satisfied_by(&c.package.version())))
            .collect();

        let preferred = candidates
            .iter()
            .position(|c| hints.iter().all(|spec| spec.is_satisfied_by(&c.package.version())))
            .unwrap_or(0);

        candidates.into_iter().nth(preferred)
    }

    /// Installed versions (newest first), then available ones (newest first)
    fn candidates(&self, name: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        if let Some(pkg) = self.installed.get(name) {
            for pv in pkg.versions().iter().rev() {
                let id = NodeId::of(pv);
                if self.replaced.contains_key(&id) {
                    continue;
                }
                seen.insert(pv.version());
                candidates.push(Candidate {
                    package: pv.clone(),
                    installed: true,
                });
            }
        }

        if let Some(pkg) = self.available.get(name) {
            for pv in pkg.versions().iter().rev() {
                if self.installed.contains_version(name, pv.version()) || !seen.insert(pv.version()) {
                    continue;
                }
                candidates.push(Candidate {
                    package: pv.clone(),
                    installed: false,
                });
            }
        }

        candidates
    }

    /// Specs declared on `name` by installed packages that stay
    fn installed_hints(&self, name: &str) -> Vec<VersionSpec> {
        if self.options.allow_multiple_versions || !self.options.follow_dependencies {
            return Vec::new();
        }
        self.installed
            .dependents_of(name)
            .filter(|(pv, _)| !self.is_leaving(pv))
            .map(|(_, spec)| *spec)
            .collect()
    }

    /// Every requirement on `name`, labelled with who asked for it
    fn requirements_on(&self, name: &str) -> Vec<(String, VersionSpec)> {
        let mut requirements: Vec<(String, VersionSpec)> = self
            .requests
            .iter()
            .filter(|r| r.name == name)
            .map(|r| ("requested".to_string(), r.spec))
            .collect();
        requirements.extend(
            self.graph
                .requirements_on(name)
                .into_iter()
                .map(|edge| (edge.from.to_string(), edge.constraint)),
        );
        requirements
    }

    fn requirement_specs(&self, name: &str) -> Vec<VersionSpec> {
        self.requirements_on(name).into_iter().map(|(_, spec)| spec).collect()
    }

    fn unsatisfiable(&self, name: &str, spec: VersionSpec, from: Option<&NodeId>) -> Error {
        let required_by = from.map_or_else(|| "request".to_string(), |id| id.to_string());
        let closest = self
            .available
            .get(name)
            .or_else(|| self.installed.get(name))
            .and_then(|pkg| pkg.find_closest(&spec));

        match closest {
            None => Conflict::MissingPackage {
                package: name.to_string(),
                required_by: vec![required_by],
            },
            Some(pv) => Conflict::UnsatisfiableConstraint {
                package: name.to_string(),
                version: Some(pv.version().to_string()),
                required_constraint: spec.to_string(),
                required_by,
            },
        }
        .into()
    }

    /// Selected nodes serving each request
    fn roots(&self) -> Vec<NodeId> {
        self.requests
            .iter()
            .filter_map(|r| self.graph.resolve_target(&r.name, &r.spec))
            .map(|node| node.id.clone())
            .collect()
    }

    fn is_leaving(&self, package: &PackageVersion) -> bool {
        let id = NodeId::of(package);
        if self.graph.contains(&id) {
            return false;
        }
        self.replaced.contains_key(&id)
            || (!self.options.allow_multiple_versions
                && self.graph.nodes_named(package.name()).any(|node| !node.installed))
    }

    /// Installed versions that the plan removes
    fn leaving(&self) -> IndexMap<NodeId, PackageVersion> {
        let mut leaving: IndexMap<NodeId, PackageVersion> = self
            .replaced
            .iter()
            .filter(|(id, _)| !self.graph.contains(id))
            .map(|(id, pv)| (id.clone(), pv.clone()))
            .collect();

        if !self.options.allow_multiple_versions {
            for node in self.graph.nodes().filter(|node| !node.installed) {
                let Some(pkg) = self.installed.get(&node.id.name) else {
                    continue;
                };
                for pv in pkg.versions() {
                    let id = NodeId::of(pv);
                    if !self.graph.contains(&id) {
                        leaving.entry(id).or_insert_with(|| pv.clone());
                    }
                }
            }
        }

        leaving
    }

    /// An installed package that stays but loses every version it accepts
    fn find_broken_dependent(&self) -> Result<Option<(PackageVersion, String)>> {
        let leaving = self.leaving();

        for id in leaving.keys() {
            for (dependent, spec) in self.installed.dependents_of(&id.name) {
                if leaving.contains_key(&NodeId::of(dependent)) {
                    continue;
                }
                if self.remaining_satisfies(&id.name, spec, &leaving) {
                    continue;
                }

                if self.options.cascade_upgrades {
                    return Ok(Some((dependent.clone(), id.name.clone())));
                }

                let replacement = self
                    .graph
                    .nodes_named(&id.name)
                    .map(|node| node.id.version.to_string())
                    .next();
                return Err(Conflict::UnsatisfiableConstraint {
                    package: id.name.clone(),
                    version: replacement,
                    required_constraint: spec.to_string(),
                    required_by: dependent.to_string(),
                }
                .into());
            }
        }

        Ok(None)
    }

    /// Whether some version of `name` left after the plan satisfies `spec`
    fn remaining_satisfies(
        &self,
        name: &str,
        spec: &VersionSpec,
        leaving: &IndexMap<NodeId, PackageVersion>,
    ) -> bool {
        let kept_installed = self
            .installed
            .get(name)
            .into_iter()
            .flat_map(|pkg| pkg.versions())
            .filter(|pv| !leaving.contains_key(&NodeId::of(pv)))
            .any(|pv| spec.is_satisfied_by(&pv.version()));

        kept_installed || self.graph.resolve_target(name, spec).is_some()
    }

    /// Upgrade `dependent` to a version that accepts what remains of `name`
    fn cascade(&mut self, dependent: &PackageVersion, name: &str) -> Result<()> {
        let has_dependent = || Error::HasDependent {
            name: name.to_string(),
            dependent: dependent.name().to_string(),
        };
        if self.replaced.contains_key(&NodeId::of(dependent)) {
            return Err(has_dependent());
        }

        let leaving = self.leaving();
        let upgrade = self.available.get(dependent.name()).and_then(|pkg| {
            pkg.newer_than(dependent.version()).find(|candidate| {
                candidate
                    .dependency_on(name)
                    .is_none_or(|spec| self.remaining_satisfies(name, spec, &leaving))
            })
        });

        match upgrade {
            Some(upgrade) => {
                debug!("Cascading upgrade of {} to {} for {}", dependent, upgrade.version(), name);
                let upgrade = upgrade.clone();
                self.pin(&upgrade, Some(dependent))
            }
            None => Err(has_dependent()),
        }
    }
}

/// Whether every pair of specs accepts some common version
///
/// For intervals this also means one version could satisfy all of them.
fn ranges_overlap(specs: &[VersionSpec]) -> bool {
    specs
        .iter()
        .enumerate()
        .all(|(i, a)| specs[i + 1..].iter().all(|b| a.is_compatible_with(b)))
}
