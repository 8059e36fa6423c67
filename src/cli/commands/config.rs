//! `rtm config` command - Configuration management
//!
//! Shows the effective configuration and where it comes from, and writes a
//! starter project config.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;

use super::load_config;
use crate::cli::GlobalOpts;
use crate::core::config::{ENV_VARS, PROJECT_CONFIG_FILE};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (secrets masked)
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// Write a starter rtm.yaml in the current directory
    Init(InitArgs),

    /// List the status labels in effect
    Statuses,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value (e.g. jira.url)
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing rtm.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Statuses => run_statuses(global),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?.masked();
    let value = serde_yml::to_value(&config).into_diagnostic()?;

    if let Some(key) = &args.key {
        let found = key
            .split('.')
            .try_fold(&value, |node, part| node.get(part))
            .filter(|v| !v.is_null());
        return match found {
            Some(v) => {
                let rendered = serde_yml::to_string(v).into_diagnostic()?;
                println!("{}", rendered.trim_end());
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if !global.quiet {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();
    }
    print!("{}", serde_yml::to_string(&value).into_diagnostic()?);

    if !global.quiet {
        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!(
            "  1. Environment variables ({})",
            ENV_VARS.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ")
        );
        println!("  2. Project config (./{} or --config)", PROJECT_CONFIG_FILE);
        println!("  3. Global config (~/.config/rtm/config.yaml)");
    }
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!("  {} {}", style("Global:").cyan(), style("(no home directory)").dim()),
    }
    let project = global
        .config
        .clone()
        .unwrap_or_else(Config::project_config_path);
    print_path("Project:", &project);
    Ok(())
}

fn print_path(label: &str, path: &std::path::Path) {
    let state = if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("  {} {} {}", style(label).cyan(), path.display(), state);
}

fn run_init(args: InitArgs) -> Result<()> {
    let path = Config::project_config_path();
    if path.exists() && !args.force {
        return Err(miette::miette!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    fs::write(&path, Config::starter_yaml()).into_diagnostic()?;
    println!("{} Created {}", style("✓").green(), path.display());
    Ok(())
}

fn run_statuses(global: &GlobalOpts) -> Result<()> {
    let statuses = load_config(global)?.status_map();
    for (code, label) in statuses.iter() {
        println!("{}\t{}", code, label);
    }
    Ok(())
}
