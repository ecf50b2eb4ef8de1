//! CLI command implementations.
//!
//! | Module   | Commands handled   |
//! |----------|--------------------|
//! | `walk`   | `Walk`, `Show`     |
//! | `routes` | `Routes`, `Stages` |
//! | `config` | `Config`           |

pub mod config;
pub mod routes;
pub mod walk;

pub use config::cmd_config;
pub use routes::{cmd_routes, cmd_stages};
pub use walk::{cmd_show, cmd_walk};

use anyhow::{Context, Result};
use std::path::PathBuf;

use kp_timeline::config::Config;
use kp_timeline::stage::Stage;
use kp_timeline::ui::UiMode;

use super::Cli;

/// Resolve configuration with the global CLI flags applied.
pub(crate) fn load_config(cli: &Cli, project_dir: PathBuf) -> Result<Config> {
    let unlocked = cli
        .unlocked
        .as_deref()
        .map(str::parse::<Stage>)
        .transpose()
        .context("Invalid --unlocked")?;
    let ui = cli.ui.as_deref().map(UiMode::parse);

    Config::load(project_dir, cli.config.clone(), ui, unlocked, cli.verbose)
}
