// src/manifest.rs

//! Parser for repository indexes and project manifests
//!
//! Both files share one shape, a list of package versions:
//!
//! ```toml
//! [[package]]
//! name = "app"
//! version = "1.2.0"
//! dependencies = { lib = "1.0+", log = "*" }
//!
//! [package.properties]
//! description = "Example application"
//! hooks = ["post-install.sh"]
//! ```
//!
//! A repository index describes what can be installed; a project manifest
//! records what is installed.

use crate::error::{Error, Result};
use crate::package::{ListKind, PackageList, PackageVersion, PropertyValue};
use crate::version::{Version, VersionSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// On-disk form of a package list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "package")]
    pub packages: Vec<ManifestEntry>,
}

/// One `[[package]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub name: String,
    pub version: Version,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, VersionSpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl ManifestEntry {
    fn into_package_version(self) -> PackageVersion {
        let pv = self
            .dependencies
            .into_iter()
            .fold(PackageVersion::new(self.name, self.version), |pv, (name, spec)| {
                pv.with_dependency(name, spec)
            });
        self.properties
            .into_iter()
            .fold(pv, |pv, (key, value)| pv.with_property(key, value))
    }
}

impl From<&PackageVersion> for ManifestEntry {
    fn from(pv: &PackageVersion) -> Self {
        Self {
            name: pv.name().to_string(),
            version: pv.version(),
            dependencies: pv.dependencies().clone(),
            properties: pv.properties().clone(),
        }
    }
}

impl Manifest {
    /// Parse a manifest from a TOML string
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Build a package list of the given kind
    pub fn into_list(self, kind: ListKind) -> PackageList {
        PackageList::from_versions(
            kind,
            self.packages.into_iter().map(ManifestEntry::into_package_version),
        )
    }

    /// Snapshot a package list, e.g. to write the post-plan project state
    pub fn from_list(list: &PackageList) -> Self {
        Self {
            packages: list.all_versions().map(ManifestEntry::from).collect(),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn load(path: &Path, kind: ListKind) -> Result<PackageList> {
    let content = std::fs::read_to_string(path)?;
    let manifest = Manifest::parse(&content).map_err(|source| Error::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    let list = manifest.into_list(kind);
    debug!(
        "Loaded {} {} packages from {}",
        list.len(),
        kind.as_str(),
        path.display()
    );
    Ok(list)
}

/// Load the available package list from a repository index
pub fn load_repository(path: &Path) -> Result<PackageList> {
    load(path, ListKind::Repository)
}

/// Load the installed package list from a project manifest
///
/// A project without a manifest has nothing installed.
pub fn load_installed(path: &Path) -> Result<PackageList> {
    if !path.exists() {
        debug!("No project manifest at {}, nothing installed", path.display());
        return Ok(PackageList::new(ListKind::Installed));
    }
    load(path, ListKind::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
[[package]]
name = "lib"
version = "1.0"

[[package]]
name = "app"
version = "2.1.0"
dependencies = { lib = "1.0+", log = "0.3-0.5" }

[package.properties]
description = "An app"
hooks = ["post-install.sh", "pre-remove.sh"]

[[package]]
name = "lib"
version = "0.9"
"#;

    #[test]
    fn test_parse_manifest() {
        let list = Manifest::parse(INDEX).unwrap().into_list(ListKind::Repository);
        assert_eq!(list.kind(), ListKind::Repository);
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["lib", "app"]);
        assert_eq!(list.get("lib").unwrap().len(), 2);
        assert_eq!(
            list.get("lib").unwrap().oldest().unwrap().version(),
            Version::new(0, 9, 0)
        );

        let app = list.get("app").unwrap().newest().unwrap();
        assert_eq!(app.version(), Version::new(2, 1, 0));
        assert_eq!(
            app.dependency_on("log"),
            Some(&VersionSpec::Range(Version::new(0, 3, 0), Version::new(0, 5, 0)))
        );
        assert_eq!(
            app.property("hooks"),
            Some(&PropertyValue::List(vec![
                "post-install.sh".to_string(),
                "pre-remove.sh".to_string()
            ]))
        );
        assert_eq!(
            app.property("description"),
            Some(&PropertyValue::Text("An app".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_spec() {
        let err = Manifest::parse(
            r#"
[[package]]
name = "app"
version = "1.0"
dependencies = { lib = "1.0!!" }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Malformed version spec"));
    }

    #[test]
    fn test_parse_rejects_malformed_version() {
        assert!(Manifest::parse("[[package]]\nname = \"a\"\nversion = \"one\"\n").is_err());
    }

    #[test]
    fn test_load_installed_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let list = load_installed(&dir.path().join("vulture.lock")).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.kind(), ListKind::Installed);
    }

    #[test]
    fn test_load_repository_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_repository(&dir.path().join("repository.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repository.toml");
        std::fs::write(&path, "[[package]]\nname = 3\n").unwrap();

        match load_repository(&path) {
            Err(Error::Manifest { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected manifest error, got {:?}", other),
        }
    }

    #[test]
    fn test_manifest_snapshot_roundtrip() {
        let list = Manifest::parse(INDEX).unwrap().into_list(ListKind::Installed);
        let rendered = Manifest::from_list(&list).to_toml().unwrap();
        let reloaded = Manifest::parse(&rendered).unwrap().into_list(ListKind::Installed);
        assert_eq!(reloaded, list);
    }
}
