// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, GlobalArgs, OutputFormat};
use tracing::info;
use vulture::manifest::{self, Manifest};
use vulture::{Config, PackageList, Plan, Planner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.global.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = load_config(&cli.global)?;

    let available = manifest::load_repository(&config.paths.repository).with_context(|| {
        format!(
            "Failed to load repository index {}",
            config.paths.repository.display()
        )
    })?;
    let installed = manifest::load_installed(&config.paths.project).with_context(|| {
        format!(
            "Failed to load project manifest {}",
            config.paths.project.display()
        )
    })?;
    info!(
        "{} packages available, {} installed",
        available.len(),
        installed.len()
    );

    let planner = Planner::with_config(&available, &installed, &config.planner);
    let follow = config.planner.follow_dependencies;

    let plan = match cli.command {
        Commands::Install { package, version } => planner
            .install_plan(&package, &version, follow)
            .with_context(|| format!("Cannot install {}", package))?,
        Commands::Remove { packages, version } => planner
            .remove_plan(packages.as_slice(), &version, follow)
            .with_context(|| format!("Cannot remove {}", packages.join(", ")))?,
        Commands::Upgrade { packages, version } => planner
            .upgrade_plan(packages.as_slice(), &version, follow)
            .with_context(|| format!("Cannot upgrade {}", packages.join(", ")))?,
        Commands::List { installed: show_installed } => {
            let list = if show_installed { &installed } else { &available };
            print_list(list, cli.global.format)?;
            return Ok(());
        }
    };

    print_plan(&plan, cli.global.format)?;

    if cli.global.show_result {
        let result = Manifest::from_list(&installed.apply(&plan));
        println!();
        print!("{}", result.to_toml()?);
    }

    Ok(())
}

/// Load the config file and apply command-line overrides
fn load_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;

    if let Some(ref repository) = args.repository {
        config.paths.repository = repository.clone();
    }
    if let Some(ref project) = args.project {
        config.paths.project = project.clone();
    }
    if args.allow_multiple {
        config.planner.allow_multiple_versions = true;
    }
    if args.no_deps {
        config.planner.follow_dependencies = false;
    }

    Ok(config)
}

fn print_plan(plan: &Plan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", plan);
            let summary = plan.summary();
            if !plan.is_empty() {
                println!(
                    "{} to add, {} to remove ({} upgrades)",
                    summary.to_add, summary.to_remove, summary.upgrades
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "add": plan.added(),
                "remove": plan.removed(),
                "summary": plan.summary(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_list(list: &PackageList, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for package in list.iter() {
                let versions: Vec<String> = package
                    .versions()
                    .iter()
                    .map(|pv| pv.version().to_string())
                    .collect();
                println!("{} ({})", package.name(), versions.join(", "));
            }
        }
        OutputFormat::Json => {
            let versions: Vec<_> = list.all_versions().collect();
            println!("{}", serde_json::to_string_pretty(&versions)?);
        }
    }
    Ok(())
}
