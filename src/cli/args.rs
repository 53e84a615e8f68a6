//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::app::ReportFormat;

/// Source and conversion options shared by `render` and `plan`
#[derive(Args, Debug, Clone)]
pub struct ConvertOptionArgs {
    /// Source media file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Trim start (seconds, MM:SS, or HH:MM:SS)
    #[arg(long)]
    pub ss: Option<String>,

    /// Trim end (seconds, MM:SS, or HH:MM:SS)
    #[arg(long)]
    pub to: Option<String>,

    /// Output container (default: the source extension)
    #[arg(short, long)]
    pub container: Option<String>,

    /// Output pixel format, e.g. yuv420p
    #[arg(long)]
    pub pix_fmt: Option<String>,

    /// Output frame rate
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub framerate: Option<u32>,

    /// Disable palette-based GIF encoding
    #[arg(long)]
    pub no_hq_gif: bool,

    /// Disable infinite looping for WebP output
    #[arg(long)]
    pub no_loop: bool,
}

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub options: ConvertOptionArgs,

    /// Output file path (default: the engine's output name in the working directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub options: ConvertOptionArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Source media file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Json,
    Yaml,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Yaml => ReportFormat::Yaml,
        }
    }
}
