// tests/upgrade.rs

//! Upgrade planning, including cascades through installed dependents.

mod common;

use common::{added, project, pv, removed, repository};
use vulture::{Error, Planner, ANY_VERSION};

#[test]
fn test_upgrade_nothing_newer() {
    let available = repository(vec![pv("lib", "1.0", &[]), pv("lib", "2.0", &[])]);
    let installed = project(vec![pv("lib", "2.0", &[])]);

    let plan = Planner::new(&available, &installed)
        .upgrade_plan("lib", ANY_VERSION, true)
        .unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_upgrade_not_installed() {
    let available = repository(vec![pv("lib", "1.0", &[])]);
    let installed = project(vec![pv("app", "1.0", &[])]);

    let result = Planner::new(&available, &installed).upgrade_plan(["app", "lib"], ANY_VERSION, true);
    assert!(matches!(result, Err(Error::NotInstalled(name)) if name == "lib"));
}

#[test]
fn test_upgrade_to_newest() {
    let available = repository(vec![
        pv("lib", "1.0", &[]),
        pv("lib", "1.5", &[]),
        pv("lib", "2.0", &[]),
    ]);
    let installed = project(vec![pv("lib", "1.0", &[])]);

    let plan = Planner::new(&available, &installed)
        .upgrade_plan("lib", ANY_VERSION, true)
        .unwrap();
    assert_eq!(added(&plan), vec!["lib@2.0.0"]);
    assert_eq!(removed(&plan), vec!["lib@1.0.0"]);
}

#[test]
fn test_upgrade_limited_by_spec() {
    let available = repository(vec![
        pv("lib", "1.0", &[]),
        pv("lib", "1.5", &[]),
        pv("lib", "2.0", &[]),
    ]);
    let installed = project(vec![pv("lib", "1.0", &[])]);

    let plan = Planner::new(&available, &installed)
        .upgrade_plan("lib", "1.9-", true)
        .unwrap();
    assert_eq!(added(&plan), vec!["lib@1.5.0"]);
    assert_eq!(removed(&plan), vec!["lib@1.0.0"]);
}

#[test]
fn test_upgrade_cascades_to_dependent() {
    let available = repository(vec![
        pv("lib", "1.0", &[]),
        pv("lib", "2.0", &[]),
        pv("app", "1.0", &[("lib", "1.0-1.9")]),
        pv("app", "2.0", &[("lib", "2.0+")]),
    ]);
    let installed = project(vec![
        pv("lib", "1.0", &[]),
        pv("app", "1.0", &[("lib", "1.0-1.9")]),
    ]);

    let plan = Planner::new(&available, &installed)
        .upgrade_plan("lib", ANY_VERSION, true)
        .unwrap();
    assert_eq!(added(&plan), vec!["lib@2.0.0", "app@2.0.0"]);
    assert_eq!(removed(&plan), vec!["lib@1.0.0", "app@1.0.0"]);
    assert_eq!(plan.summary().upgrades, 2);

    let after = installed.apply(&plan);
    let again = Planner::new(&available, &after)
        .upgrade_plan("lib", ANY_VERSION, true)
        .unwrap();
    assert!(again.is_empty());
}

#[test]
fn test_upgrade_cascades_transitively() {
    let available = repository(vec![
        pv("base", "2.0", &[]),
        pv("mid", "2.0", &[("base", "2.0+")]),
        pv("top", "2.0", &[("mid", "2.0+")]),
    ]);
    let installed = project(vec![
        pv("base", "1.0", &[]),
        pv("mid", "1.0", &[("base", "1.0-1.9")]),
        pv("top", "1.0", &[("mid", "1.0-1.9")]),
    ]);

    let plan = Planner::new(&available, &installed)
        .upgrade_plan("base", ANY_VERSION, true)
        .unwrap();
    assert_eq!(added(&plan), vec!["base@2.0.0", "mid@2.0.0", "top@2.0.0"]);
    assert_eq!(removed(&plan), vec!["base@1.0.0", "mid@1.0.0", "top@1.0.0"]);
}

#[test]
fn test_upgrade_blocked_by_dependent_without_upgrade() {
    let available = repository(vec![
        pv("lib", "2.0", &[]),
        pv("app", "1.0", &[("lib", "1.0-1.9")]),
    ]);
    let installed = project(vec![
        pv("lib", "1.0", &[]),
        pv("app", "1.0", &[("lib", "1.0-1.9")]),
    ]);
    let planner = Planner::new(&available, &installed);

    match planner.upgrade_plan("lib", ANY_VERSION, true) {
        Err(Error::HasDependent { name, dependent }) => {
            assert_eq!(name, "lib");
            assert_eq!(dependent, "app");
        }
        other => panic!("Expected HasDependent, got {:?}", other),
    }

    // Unchecked upgrades leave app behind
    let plan = planner.upgrade_plan("lib", ANY_VERSION, false).unwrap();
    assert_eq!(added(&plan), vec!["lib@2.0.0"]);
    assert_eq!(removed(&plan), vec!["lib@1.0.0"]);
}

#[test]
fn test_upgrade_pulls_newer_dependency() {
    let available = repository(vec![
        pv("lib", "1.0", &[]),
        pv("lib", "2.0", &[]),
        pv("app", "1.0", &[("lib", "1.0+")]),
        pv("app", "2.0", &[("lib", "2.0+")]),
    ]);
    let installed = project(vec![
        pv("lib", "1.0", &[]),
        pv("app", "1.0", &[("lib", "1.0+")]),
    ]);

    let plan = Planner::new(&available, &installed)
        .upgrade_plan("app", ANY_VERSION, true)
        .unwrap();
    assert_eq!(added(&plan), vec!["lib@2.0.0", "app@2.0.0"]);
    assert_eq!(removed(&plan), vec!["lib@1.0.0", "app@1.0.0"]);
}

#[test]
fn test_upgrade_batch() {
    let available = repository(vec![
        pv("lib", "2.0", &[]),
        pv("log", "0.4", &[]),
        pv("log", "0.5", &[]),
    ]);
    let installed = project(vec![pv("lib", "1.0", &[]), pv("log", "0.4", &[])]);

    let plan = Planner::new(&available, &installed)
        .upgrade_plan(vec!["lib", "log"], ANY_VERSION, true)
        .unwrap();
    assert_eq!(added(&plan), vec!["lib@2.0.0", "log@0.5.0"]);
    assert_eq!(removed(&plan), vec!["lib@1.0.0", "log@0.4.0"]);
}

#[test]
fn test_upgrade_with_multiple_versions_replaces_newest() {
    let available = repository(vec![pv("lib", "1.0", &[]), pv("lib", "3.0", &[])]);
    let installed = project(vec![pv("lib", "1.0", &[]), pv("lib", "2.0", &[])]);

    let plan = Planner::new(&available, &installed)
        .allow_multiple_versions(true)
        .upgrade_plan("lib", ANY_VERSION, true)
        .unwrap();
    assert_eq!(added(&plan), vec!["lib@3.0.0"]);
    assert_eq!(removed(&plan), vec!["lib@2.0.0"]);
}
