// src/package/mod.rs

//! Package data model
//!
//! A [`PackageVersion`] is one concrete, immutable release of a package with
//! its declared dependencies. Versions are grouped by name into a
//! [`Package`], and packages into a [`PackageList`]. Two lists take part in
//! every planning call: what a repository makes available, and what a
//! project currently has installed.

mod list;

pub use list::{Package, PackageList};

use crate::version::{Version, VersionSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a package list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Versions offered by a local repository
    Repository,
    /// Versions currently installed in a project
    Installed,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Installed => "installed",
        }
    }
}

/// Free-form metadata value attached to a package version
///
/// Install hooks, descriptions and the like. The planner never reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
}

/// One release of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVersion {
    name: String,
    version: Version,
    dependencies: IndexMap<String, VersionSpec>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, PropertyValue>,
}

impl PackageVersion {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            dependencies: IndexMap::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Declare a dependency on another package
    pub fn with_dependency(mut self, name: impl Into<String>, spec: VersionSpec) -> Self {
        self.dependencies.insert(name.into(), spec);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Name of the package this version belongs to
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Declared dependencies, package name → acceptable versions
    pub fn dependencies(&self) -> &IndexMap<String, VersionSpec> {
        &self.dependencies
    }

    /// Spec this version declares for `name`, if it depends on it
    pub fn dependency_on(&self, name: &str) -> Option<&VersionSpec> {
        self.dependencies.get(name)
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if this is the given release
    pub fn is(&self, name: &str, version: Version) -> bool {
        self.name == name && self.version == version
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_version_accessors() {
        let pv = PackageVersion::new("app", Version::new(1, 2, 0))
            .with_dependency("lib", VersionSpec::parse("1.0+").unwrap())
            .with_property("description", PropertyValue::Text("An app".to_string()))
            .with_property(
                "hooks",
                PropertyValue::List(vec!["post-install.sh".to_string()]),
            );

        assert_eq!(pv.name(), "app");
        assert_eq!(pv.version(), Version::new(1, 2, 0));
        assert_eq!(pv.to_string(), "app@1.2.0");
        assert_eq!(
            pv.dependency_on("lib"),
            Some(&VersionSpec::AtLeast(Version::new(1, 0, 0)))
        );
        assert!(pv.dependency_on("other").is_none());
        assert_eq!(pv.properties().len(), 2);
        assert!(pv.is("app", Version::new(1, 2, 0)));
        assert!(!pv.is("app", Version::new(1, 2, 1)));
    }

    #[test]
    fn test_dependencies_keep_declaration_order() {
        let pv = PackageVersion::new("app", Version::new(1, 0, 0))
            .with_dependency("zlib", VersionSpec::Any)
            .with_dependency("alpha", VersionSpec::Any);
        let names: Vec<&str> = pv.dependencies().keys().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["zlib", "alpha"]);
    }
}
