//! mediaconv CLI
//!
//! Converts and trims media files through an external ffmpeg engine.
//!
//! # Usage
//!
//! ```bash
//! mediaconv render --input clip.mp4 --ss 1.5 --to 0:04 --container gif
//! mediaconv plan --input clip.mp4 --container webp --json
//! mediaconv inspect --input clip.mp4 --format yaml
//! mediaconv containers
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use mediaconv_cli::cli::{commands, Cli, Commands};
use mediaconv_cli::config::AppConfig;
use mediaconv_cli::error::ConvertError;
use mediaconv_cli::utils::logging::{init_logging, LogFormat};

/// Main entry point for the mediaconv CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).map_err(|e| ConvertError::ConfigError {
        message: e.to_string(),
    })?;
    cli.apply_overrides(&mut config);
    config.validate().map_err(|e| ConvertError::ConfigError {
        message: e.to_string(),
    })?;

    init_logging(
        &config.logging.level,
        LogFormat::from_json_flag(config.logging.json),
    )?;
    info!("Starting mediaconv {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Render(args) => {
            info!("Executing render command");
            commands::render(args, &config).await?;
        }
        Commands::Plan(args) => commands::plan(args, &config).await?,
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(args, &config).await?;
        }
        Commands::Containers => commands::containers()?,
    }

    Ok(())
}
