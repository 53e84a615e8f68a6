//! Command planning: option records to an ordered engine argument vector

use serde::Serialize;

use crate::domain::model::OutputOptions;

pub mod command;
pub mod filters;

pub use command::{ArgumentList, CommandBuilder};
pub use filters::{FilterGraph, HQ_GIF_PALETTE_FILTER};

/// Everything the session needs to run one conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    /// Positional arguments for the engine, in contractual order
    pub args: Vec<String>,
    /// Name the engine writes the result under
    pub output_file_name: String,
    /// MIME type of the result
    pub output_mime: String,
    /// Output options with the container resolved
    pub resolved_output: OutputOptions,
}

impl RenderPlan {
    /// Resolved container name
    pub fn container(&self) -> &str {
        self.resolved_output.container.as_deref().unwrap_or_default()
    }
}
