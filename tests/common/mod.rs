// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use vulture::{ListKind, PackageList, PackageVersion, Plan, Version, VersionSpec};

/// A package version with dependencies given as (name, spec) pairs
pub fn pv(name: &str, version: &str, deps: &[(&str, &str)]) -> PackageVersion {
    deps.iter().fold(
        PackageVersion::new(name, Version::parse(version).unwrap()),
        |pv, (dep, spec)| pv.with_dependency(*dep, VersionSpec::parse(spec).unwrap()),
    )
}

/// Available package list
pub fn repository(versions: Vec<PackageVersion>) -> PackageList {
    PackageList::from_versions(ListKind::Repository, versions)
}

/// Installed package list
pub fn project(versions: Vec<PackageVersion>) -> PackageList {
    PackageList::from_versions(ListKind::Installed, versions)
}

pub fn empty_project() -> PackageList {
    PackageList::new(ListKind::Installed)
}

/// Added versions rendered as `name@version`
pub fn added(plan: &Plan) -> Vec<String> {
    plan.added().iter().map(|pv| pv.to_string()).collect()
}

/// Removed versions rendered as `name@version`
pub fn removed(plan: &Plan) -> Vec<String> {
    plan.removed().iter().map(|pv| pv.to_string()).collect()
}
