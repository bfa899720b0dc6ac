// src/config.rs

//! Configuration file for the planner and the command-line front end
//!
//! ```toml
//! [planner]
//! allow_multiple_versions = false
//! follow_dependencies = true
//!
//! [paths]
//! repository = "repository.toml"
//! project = "vulture.lock"
//! ```
//!
//! Every key is optional. A missing file means all defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "vulture.toml";

/// Default repository index path
pub const DEFAULT_REPOSITORY_PATH: &str = "repository.toml";

/// Default project manifest path
pub const DEFAULT_PROJECT_PATH: &str = "vulture.lock";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

/// Settings consumed by [`Planner`](crate::Planner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Allow several versions of one package to be installed at once
    #[serde(default)]
    pub allow_multiple_versions: bool,

    /// Resolve and check dependencies
    #[serde(default = "default_follow_dependencies")]
    pub follow_dependencies: bool,
}

fn default_follow_dependencies() -> bool {
    true
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            allow_multiple_versions: false,
            follow_dependencies: default_follow_dependencies(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Repository index listing available package versions
    #[serde(default = "default_repository_path")]
    pub repository: PathBuf,

    /// Project manifest listing installed package versions
    #[serde(default = "default_project_path")]
    pub project: PathBuf,
}

fn default_repository_path() -> PathBuf {
    PathBuf::from(DEFAULT_REPOSITORY_PATH)
}

fn default_project_path() -> PathBuf {
    PathBuf::from(DEFAULT_PROJECT_PATH)
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            repository: default_repository_path(),
            project: default_project_path(),
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults if absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        // Relative paths are taken from the configuration file's directory
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn relative_to(mut self, base: &Path) -> Self {
        if self.paths.repository.is_relative() {
            self.paths.repository = base.join(&self.paths.repository);
        }
        if self.paths.project.is_relative() {
            self.paths.project = base.join(&self.paths.project);
        }
        self
    }
}
