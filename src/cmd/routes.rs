//! Route table and stage listing — `kp-timeline routes` / `stages`.

use anyhow::Result;
use console::style;
use std::path::PathBuf;

use kp_timeline::stage::Stage;
use kp_timeline::ui::UiMode;

use super::super::Cli;
use super::load_config;

pub fn cmd_routes(cli: &Cli, project_dir: PathBuf) -> Result<()> {
    let config = load_config(cli, project_dir)?;
    let table = config.route_table();

    if config.ui == UiMode::Json {
        let routes: Vec<_> = table
            .iter()
            .map(|(route, stage)| serde_json::json!({ "route": route, "stage": stage }))
            .collect();
        println!(
            "{}",
            serde_json::json!({ "base_path": table.base_path(), "routes": routes })
        );
        return Ok(());
    }

    println!();
    println!("Timeline base path: {}", table.base_path());
    if let Some(path) = &config.config_path {
        println!("Config file: {}", path.display());
    }
    println!();
    println!("{:<45} {:<16} Title", "Route", "Stage");
    println!(
        "{:<45} {:<16} -----",
        "---------------------------------------------", "----------------"
    );

    // Grouped by stage so the lifecycle reads top to bottom.
    for stage in Stage::ALL {
        for route in table.routes_for(stage) {
            println!("{:<45} {:<16} {}", route, stage.key(), stage.title());
        }
    }
    println!();

    let warnings = table.validate();
    for warning in &warnings {
        println!("  {} {}", style("warning:").yellow(), warning);
    }
    if !warnings.is_empty() {
        println!();
    }
    println!("{} routes", table.len());
    Ok(())
}

pub fn cmd_stages() {
    println!();
    println!("{:<4} {:<16} Title", "#", "Key");
    println!("{:<4} {:<16} -----", "----", "----------------");
    for stage in Stage::ALL {
        println!(
            "{:<4} {:<16} {}",
            stage.ordinal() + 1,
            stage.key(),
            stage.title()
        );
    }
    println!();
}
