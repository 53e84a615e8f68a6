//! FFprobe adapter for media file probing

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FfprobeAdapter {
    ffprobe_path: PathBuf,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

/// Parse ffprobe's bare `format=duration` output
pub fn parse_duration_output(output: &str) -> Option<f64> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|duration| duration.is_finite() && *duration >= 0.0)
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_duration(&self, file_path: &str) -> Result<f64, DomainError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(file_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DomainError::Io(format!("Cannot run {}: {}", self.ffprobe_path.display(), e)))?;

        if !output.status.success() {
            return Err(DomainError::Io(format!(
                "ffprobe failed for {}: {}",
                file_path,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("ffprobe duration output for {}: {:?}", file_path, stdout);
        parse_duration_output(&stdout).ok_or_else(|| {
            DomainError::Io(format!("ffprobe reported no duration for {}", file_path))
        })
    }
}
