// src/cli.rs
//! CLI definitions for the Vulture planner
//!
//! This module contains the command-line interface definitions using clap.
//! Commands only compute and print plans; nothing is installed or removed.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vulture::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "vulture")]
#[command(author = "Vulture Contributors")]
#[command(version)]
#[command(about = "Plan package installs, removals and upgrades for a project", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Repository index listing available packages (overrides config)
    #[arg(long, global = true)]
    pub repository: Option<PathBuf>,

    /// Project manifest listing installed packages (overrides config)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Allow several versions of one package to be installed
    #[arg(long, global = true)]
    pub allow_multiple: bool,

    /// Do not resolve or check dependencies
    #[arg(long, global = true)]
    pub no_deps: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also print the project manifest as it would be after the plan
    #[arg(long, global = true)]
    pub show_result: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan installing a package and its dependencies
    Install {
        /// Package name
        package: String,

        /// Version spec (e.g. "1.2+", "1.0-2.0", "1.2.3!")
        #[arg(short = 'V', long, default_value = vulture::ANY_VERSION)]
        version: String,
    },

    /// Plan removing installed packages
    Remove {
        /// Package names, removed together as one batch
        #[arg(required = true)]
        packages: Vec<String>,

        /// Only remove installed versions matching this spec
        #[arg(short = 'V', long, default_value = vulture::ANY_VERSION)]
        version: String,
    },

    /// Plan upgrading installed packages
    Upgrade {
        /// Package names
        #[arg(required = true)]
        packages: Vec<String>,

        /// Only upgrade to versions matching this spec
        #[arg(short = 'V', long, default_value = vulture::ANY_VERSION)]
        version: String,
    },

    /// List available or installed packages
    List {
        /// List installed packages instead of available ones
        #[arg(long)]
        installed: bool,
    },
}
