// src/lib.rs

//! Vulture package planner
//!
//! Computes what has to change in a project to install, remove or upgrade
//! packages, given the versions a repository offers and the versions the
//! project already has.
//!
//! # Architecture
//!
//! - Versions: numeric `major.minor.revision` with spec-based constraints
//! - Package lists: name-keyed, insertion-ordered collections of versions
//! - Planner: dependency resolution producing an ordered add/remove plan
//! - Pure planning: no I/O during resolution; executing a plan is left to
//!   the caller

pub mod config;
mod error;
pub mod manifest;
pub mod package;
pub mod resolver;
pub mod version;

pub use config::{Config, PlannerConfig};
pub use error::{Error, Result};
pub use package::{ListKind, Package, PackageList, PackageVersion, PropertyValue};
pub use resolver::{Conflict, PackageNames, Plan, PlanSummary, Planner, ANY_VERSION};
pub use version::{Version, VersionSpec};
