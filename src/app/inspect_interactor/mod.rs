// Inspect interactor - Orchestrates source inspection use case

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::containers;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::{format_file_size, time::format_hms};

/// How an inspection report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Yaml,
}

/// What is known about a source file before converting it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub path: String,
    pub name: String,
    pub size: u64,
    pub media_type: String,
    pub kind: MediaKind,
    /// Source extension when it names a supported container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Duration in seconds, when the prober could determine one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Interactor for source inspection
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected probe
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Load the source and probe its duration
    pub async fn inspect(&self, path: &Path) -> Result<(SourceFile, InspectReport), DomainError> {
        info!("Inspecting {}", path.display());
        let file = SourceFile::from_path(path).await?;
        let path_text = path.to_string_lossy().to_string();

        // Still images have no duration; a failed probe is not fatal
        let duration = match self.probe_port.probe_duration(&path_text).await {
            Ok(duration) => Some(duration),
            Err(e) => {
                warn!("Could not determine duration of {}: {}", path_text, e);
                None
            }
        };

        let container = file
            .extension()
            .map(str::to_ascii_lowercase)
            .filter(|extension| containers::lookup(extension).is_ok());

        let report = InspectReport {
            path: path_text,
            name: file.name.clone(),
            size: file.size,
            media_type: file.media_type.clone(),
            kind: file.kind(),
            container,
            duration,
        };
        Ok((file, report))
    }

    /// Render a report in the requested format
    pub fn format_report(report: &InspectReport, format: ReportFormat) -> Result<String, DomainError> {
        match format {
            ReportFormat::Json => serde_json::to_string_pretty(report)
                .map_err(|e| DomainError::Io(format!("JSON serialization failed: {}", e))),
            ReportFormat::Yaml => serde_yaml::to_string(report)
                .map_err(|e| DomainError::Io(format!("YAML serialization failed: {}", e))),
            ReportFormat::Text => Ok(Self::format_as_text(report)),
        }
    }

    fn format_as_text(report: &InspectReport) -> String {
        let mut output = String::new();
        output.push_str("Source File Information:\n");
        output.push_str(&format!("  File: {}\n", report.path));
        output.push_str(&format!("  Name: {}\n", report.name));
        output.push_str(&format!("  Size: {}\n", format_file_size(report.size)));
        output.push_str(&format!("  Type: {} ({})\n", report.media_type, report.kind));
        output.push_str(&format!(
            "  Container: {}\n",
            report.container.as_deref().unwrap_or("unsupported")
        ));
        match report.duration {
            Some(duration) => output.push_str(&format!(
                "  Duration: {} ({:.3}s)\n",
                format_hms(duration),
                duration
            )),
            None => output.push_str("  Duration: unknown\n"),
        }
        output
    }
}
