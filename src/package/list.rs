// src/package/list.rs

//! Name-keyed package collections

use super::{ListKind, PackageVersion};
use crate::resolver::Plan;
use crate::version::{Version, VersionSpec};
use indexmap::IndexMap;
use std::cmp::Ordering;
use tracing::warn;

/// A named package and its versions, sorted ascending and unique
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    versions: Vec<PackageVersion>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All versions, oldest first
    pub fn versions(&self) -> &[PackageVersion] {
        &self.versions
    }

    pub fn newest(&self) -> Option<&PackageVersion> {
        self.versions.last()
    }

    pub fn oldest(&self) -> Option<&PackageVersion> {
        self.versions.first()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, version: Version) -> Option<&PackageVersion> {
        self.versions
            .binary_search_by(|pv| pv.version().cmp(&version))
            .ok()
            .map(|idx| &self.versions[idx])
    }

    /// Newest version satisfying `spec`
    pub fn find(&self, spec: &VersionSpec) -> Option<&PackageVersion> {
        self.versions
            .iter()
            .rev()
            .find(|pv| spec.is_satisfied_by(&pv.version()))
    }

    /// Versions satisfying `spec`, newest first
    pub fn matching<'a>(
        &'a self,
        spec: &'a VersionSpec,
    ) -> impl Iterator<Item = &'a PackageVersion> + 'a {
        self.versions
            .iter()
            .rev()
            .filter(move |pv| spec.is_satisfied_by(&pv.version()))
    }

    /// Version closest to satisfying `spec`
    ///
    /// Returns the same as [`find`](Self::find) when something matches.
    /// Otherwise the newest version if every version is too old, or the
    /// oldest one that is too new.
    pub fn find_closest(&self, spec: &VersionSpec) -> Option<&PackageVersion> {
        if let Some(found) = self.find(spec) {
            return Some(found);
        }
        self.versions
            .iter()
            .find(|pv| spec.compare_against_version(&pv.version()) == Ordering::Greater)
            .or_else(|| self.newest())
    }

    /// Versions strictly newer than `version`, newest first
    pub fn newer_than(&self, version: Version) -> impl Iterator<Item = &PackageVersion> {
        self.versions
            .iter()
            .rev()
            .take_while(move |pv| pv.version() > version)
    }

    /// Insert a version, keeping the sequence sorted
    ///
    /// Returns the previous entry if the same version was already present.
    pub fn insert(&mut self, package_version: PackageVersion) -> Option<PackageVersion> {
        match self
            .versions
            .binary_search_by(|pv| pv.version().cmp(&package_version.version()))
        {
            Ok(idx) => Some(std::mem::replace(&mut self.versions[idx], package_version)),
            Err(idx) => {
                self.versions.insert(idx, package_version);
                None
            }
        }
    }

    fn remove(&mut self, version: Version) -> Option<PackageVersion> {
        let idx = self
            .versions
            .binary_search_by(|pv| pv.version().cmp(&version))
            .ok()?;
        Some(self.versions.remove(idx))
    }
}

/// Insertion-ordered collection of packages keyed by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageList {
    kind: ListKind,
    packages: IndexMap<String, Package>,
}

impl PackageList {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            packages: IndexMap::new(),
        }
    }

    /// Build a list from versions in any order
    pub fn from_versions(kind: ListKind, versions: impl IntoIterator<Item = PackageVersion>) -> Self {
        let mut list = Self::new(kind);
        for pv in versions {
            list.insert(pv);
        }
        list
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Add a version, creating its package on first sight
    pub fn insert(&mut self, package_version: PackageVersion) -> Option<PackageVersion> {
        let replaced = self
            .packages
            .entry(package_version.name().to_string())
            .or_insert_with(|| Package::new(package_version.name()))
            .insert(package_version);
        if let Some(ref old) = replaced {
            warn!("Duplicate {} entry for {}, keeping the last one", self.kind.as_str(), old);
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name).filter(|pkg| !pkg.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn contains_version(&self, name: &str, version: Version) -> bool {
        self.get(name).is_some_and(|pkg| pkg.get(version).is_some())
    }

    /// Newest version of `name` satisfying `spec`
    pub fn find(&self, name: &str, spec: &VersionSpec) -> Option<&PackageVersion> {
        self.get(name).and_then(|pkg| pkg.find(spec))
    }

    /// Packages in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values().filter(|pkg| !pkg.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|pkg| pkg.name())
    }

    /// Every version of every package
    pub fn all_versions(&self) -> impl Iterator<Item = &PackageVersion> {
        self.iter().flat_map(|pkg| pkg.versions().iter())
    }

    /// Versions declaring a dependency on `name`, with the version spec they declare
    pub fn dependents_of<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a PackageVersion, &'a VersionSpec)> + 'a {
        self.all_versions()
            .filter(move |pv| pv.name() != name)
            .filter_map(move |pv| pv.dependency_on(name).map(|spec| (pv, spec)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The list as it would look after a plan is carried out
    ///
    /// Removals happen before additions, matching how plans are executed.
    pub fn apply(&self, plan: &Plan) -> PackageList {
        let mut next = self.clone();
        for pv in plan.removed() {
            if let Some(pkg) = next.packages.get_mut(pv.name()) {
                pkg.remove(pv.version());
            }
        }
        for pv in plan.added() {
            next.packages
                .entry(pv.name().to_string())
                .or_insert_with(|| Package::new(pv.name()))
                .insert(pv.clone());
        }
        next
    }
}
