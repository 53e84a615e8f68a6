//! CLI module for mediaconv
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::session::ResetPolicy;

pub mod args;
pub mod commands;

/// mediaconv - convert and trim media files through ffmpeg
#[derive(Parser, Debug)]
#[command(name = "mediaconv")]
#[command(about = "mediaconv - Convert and trim media files")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level or filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file (default: mediaconv.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// When to discard the engine instance: never, after-every-render, after-failure
    #[arg(long, global = true)]
    pub reset_policy: Option<ResetPolicy>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a source file and write the result
    Render(args::RenderArgs),
    /// Show the engine command a render would run
    Plan(args::PlanArgs),
    /// Inspect a source file
    Inspect(args::InspectArgs),
    /// List supported output containers
    Containers,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(policy) = self.reset_policy {
            config.session.reset_policy = policy;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}
