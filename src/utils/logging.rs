//! Logging initialization and render progress reporting

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Pretty,
    /// JSON lines for structured logging
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `level` when set. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), DomainError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(level),
    }
    .map_err(|e| DomainError::Config(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| DomainError::Config(format!("Logging already initialized: {}", e)))?;

    tracing::debug!("Logging initialized at level {} ({:?})", level, format);
    Ok(())
}

/// Progress reporter for a running render
pub struct ProgressReporter {
    operation: String,
    start_time: Instant,
    last_reported: Option<u32>,
}

impl ProgressReporter {
    /// Start reporting a new operation
    pub fn start(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        tracing::info!("Starting: {}", operation);
        Self {
            operation,
            start_time: Instant::now(),
            last_reported: None,
        }
    }

    /// Report a percentage in `[0, 100]`; repeated whole percentages are skipped
    pub fn update(&mut self, percent: f64) {
        let whole = percent.clamp(0.0, 100.0).floor() as u32;
        if self.last_reported == Some(whole) {
            return;
        }
        self.last_reported = Some(whole);

        let elapsed = self.start_time.elapsed().as_secs_f64();
        tracing::info!("{}", format_progress(percent, elapsed));
    }

    /// Finish the operation
    pub fn complete(self, success: bool) {
        let status = if success { "completed" } else { "failed" };
        tracing::info!(
            "{} {} in {:.2}s",
            self.operation,
            status,
            self.start_time.elapsed().as_secs_f64()
        );
    }
}

/// One progress line, with an ETA once some progress has been made
pub fn format_progress(percent: f64, elapsed_secs: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let mut message = format!("[{:>3.0}%] Rendering...", percent);

    if percent > 0.0 && percent < 100.0 {
        let eta = elapsed_secs * (100.0 - percent) / percent;
        message.push_str(&format!(" (ETA: {:.0}s)", eta));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progress() {
        assert_eq!(format_progress(0.0, 0.0), "[  0%] Rendering...");
        assert_eq!(format_progress(50.0, 10.0), "[ 50%] Rendering... (ETA: 10s)");
        assert_eq!(format_progress(100.0, 20.0), "[100%] Rendering...");
        assert_eq!(format_progress(140.0, 20.0), "[100%] Rendering...");
    }

    #[test]
    fn test_log_format_from_flag() {
        assert_eq!(LogFormat::from_json_flag(true), LogFormat::Json);
        assert_eq!(LogFormat::from_json_flag(false), LogFormat::Pretty);
    }
}
