use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "kp-timeline")]
#[command(version, about = "Internship (KP) stage timeline")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Path to timeline.toml. Defaults to .kp/timeline.toml in the project directory
    #[arg(long, global = true, env = "KP_TIMELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// UI output mode: full, minimal, json
    #[arg(long, global = true, ignore_case = true, value_parser = ["full", "minimal", "json"])]
    pub ui: Option<String>,

    /// Furthest unlocked stage (e.g. IN_PROGRESS). Stages after it are locked
    #[arg(long, global = true)]
    pub unlocked: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Navigate the given paths in order and render the timeline after each
    Walk {
        #[arg(required = true)]
        paths: Vec<String>,

        /// Keep going after a rejected navigation
        #[arg(long)]
        keep_going: bool,
    },
    /// Render the timeline for a stage (no stage: not started)
    Show {
        #[arg(short, long)]
        stage: Option<String>,
    },
    /// List the effective route table
    Routes,
    /// List the stages in lifecycle order
    Stages,
    /// View, validate or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default .kp/timeline.toml
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    kp_timeline::logging::init(cli.verbose)?;

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Walk { paths, keep_going } => {
            cmd::cmd_walk(&cli, project_dir, paths, *keep_going)?
        }
        Commands::Show { stage } => cmd::cmd_show(&cli, project_dir, stage.as_deref())?,
        Commands::Routes => cmd::cmd_routes(&cli, project_dir)?,
        Commands::Stages => cmd::cmd_stages(),
        Commands::Config { command } => cmd::cmd_config(&cli, project_dir, command.clone())?,
    }

    Ok(())
}
