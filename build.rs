// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: version spec
fn version_arg(help: &'static str) -> Arg {
    Arg::new("version")
        .short('V')
        .long("version")
        .value_name("SPEC")
        .default_value("*")
        .help(help)
}

/// Common argument: one or more package names
fn packages_arg() -> Arg {
    Arg::new("packages")
        .required(true)
        .num_args(1..)
        .help("Package names")
}

fn build_cli() -> Command {
    Command::new("vulture")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Vulture Contributors")
        .about("Plan package installs, removals and upgrades for a project")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .default_value("vulture.toml")
                .help("Configuration file"),
        )
        .arg(
            Arg::new("repository")
                .long("repository")
                .value_name("PATH")
                .help("Repository index listing available packages"),
        )
        .arg(
            Arg::new("project")
                .long("project")
                .value_name("PATH")
                .help("Project manifest listing installed packages"),
        )
        .arg(
            Arg::new("allow_multiple")
                .long("allow-multiple")
                .action(ArgAction::SetTrue)
                .help("Allow several versions of one package to be installed"),
        )
        .arg(
            Arg::new("no_deps")
                .long("no-deps")
                .action(ArgAction::SetTrue)
                .help("Do not resolve or check dependencies"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("show_result")
                .long("show-result")
                .action(ArgAction::SetTrue)
                .help("Also print the project manifest as it would be after the plan"),
        )
        .subcommand(
            Command::new("install")
                .about("Plan installing a package and its dependencies")
                .arg(Arg::new("package").required(true).help("Package name"))
                .arg(version_arg("Version spec")),
        )
        .subcommand(
            Command::new("remove")
                .about("Plan removing installed packages")
                .arg(packages_arg())
                .arg(version_arg("Only remove installed versions matching this spec")),
        )
        .subcommand(
            Command::new("upgrade")
                .about("Plan upgrading installed packages")
                .arg(packages_arg())
                .arg(version_arg("Only upgrade to versions matching this spec")),
        )
        .subcommand(
            Command::new("list")
                .about("List available or installed packages")
                .arg(
                    Arg::new("installed")
                        .long("installed")
                        .action(ArgAction::SetTrue)
                        .help("List installed packages instead of available ones"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("vulture.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
