//! Configuration view, validation and init — `kp-timeline config`.

use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

use kp_timeline::config::{CONFIG_DIR, TimelineToml, default_config_path};

use super::super::{Cli, ConfigCommands};
use super::load_config;

pub fn cmd_config(cli: &Cli, project_dir: PathBuf, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            let config = load_config(cli, project_dir)?;

            println!();
            println!("Timeline Configuration");
            println!("======================");
            println!();
            match &config.config_path {
                Some(path) => println!("Config file: {}", path.display()),
                None => println!("Config file: none (using defaults)"),
            }
            println!();

            println!("[timeline]");
            println!("  base_path = \"{}\"", config.toml.timeline.base_path);
            println!("  ui = \"{}\"", config.ui);
            match config.unlocked {
                Some(stage) => println!("  unlocked = \"{}\"", stage),
                None => println!("  unlocked = (all stages open)"),
            }
            println!();

            if !config.toml.routes.is_empty() {
                println!("[routes]");
                for (route, stage) in &config.toml.routes {
                    println!("  \"{}\" = \"{}\"", route, stage);
                }
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            // Read the file without resolving it, so bad values come back as warnings.
            let path = cli.config.clone().or_else(|| {
                let path = default_config_path(&project_dir);
                path.exists().then_some(path)
            });
            let toml = match &path {
                Some(path) => TimelineToml::load(path)?,
                None => TimelineToml::default(),
            };
            let warnings = toml.validate();

            println!();
            match &path {
                Some(path) => println!("Config file: {}", path.display()),
                None => println!("Config file: none (using defaults)"),
            }
            if warnings.is_empty() {
                println!("{} Configuration is valid", style("✓").green());
            } else {
                println!("Configuration warnings:");
                for warning in &warnings {
                    println!("  {} {}", style("⚠").yellow(), warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(|| default_config_path(&project_dir));

            if path.exists() {
                println!("Config file already exists: {}", path.display());
                return Ok(());
            }

            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| project_dir.join(CONFIG_DIR));
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;

            TimelineToml::default().save(&path)?;
            println!("Created {}", path.display());
        }
    }
    Ok(())
}
