// tests/workflow.rs

//! End-to-end planning against manifests on disk.

use std::fs;
use tempfile::TempDir;
use vulture::manifest::{self, Manifest};
use vulture::{Config, Planner, ANY_VERSION};

const REPOSITORY: &str = r#"
[[package]]
name = "lib"
version = "1.0"

[[package]]
name = "lib"
version = "2.0"

[[package]]
name = "app"
version = "1.0.0"
dependencies = { lib = "2.0+" }

[package.properties]
description = "Example application"
"#;

#[test]
fn test_install_then_reload_project() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("repository.toml"), REPOSITORY).unwrap();
    fs::write(
        dir.path().join("vulture.toml"),
        "[paths]\nrepository = \"repository.toml\"\nproject = \"vulture.lock\"\n",
    )
    .unwrap();

    let config = Config::load(&dir.path().join("vulture.toml")).unwrap();
    assert_eq!(config.paths.repository, dir.path().join("repository.toml"));

    let available = manifest::load_repository(&config.paths.repository).unwrap();
    let installed = manifest::load_installed(&config.paths.project).unwrap();
    assert!(installed.is_empty());

    let planner = Planner::with_config(&available, &installed, &config.planner);
    let plan = planner.install_plan("app", ANY_VERSION, true).unwrap();
    assert_eq!(plan.to_string(), "+ lib@2.0.0\n+ app@1.0.0\n");

    let result = Manifest::from_list(&installed.apply(&plan));
    fs::write(&config.paths.project, result.to_toml().unwrap()).unwrap();

    let reloaded = manifest::load_installed(&config.paths.project).unwrap();
    assert_eq!(reloaded.len(), 2);
    let app = reloaded.find("app", &"1.0".parse().unwrap()).unwrap();
    assert!(app.property("description").is_some());

    let again = Planner::new(&available, &reloaded)
        .install_plan("app", ANY_VERSION, true)
        .unwrap();
    assert!(again.is_empty());
}

#[test]
fn test_malformed_repository_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("repository.toml");
    fs::write(&path, "[[package]]\nname = \"lib\"\nversion = \"one\"\n").unwrap();

    let err = manifest::load_repository(&path).unwrap_err();
    assert!(err.to_string().contains("repository.toml"));
}
