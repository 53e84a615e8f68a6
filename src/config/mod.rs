//! Configuration loading and hierarchy management
//!
//! Precedence: CLI > environment > file > defaults. The CLI layer is applied
//! by the binary; this module covers the rest.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::OutputOptions;
use crate::session::ResetPolicy;

/// Configuration file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "mediaconv.toml";

/// Environment variables and the settings they override
pub const ENV_LOG_LEVEL: &str = "MEDIACONV_LOG_LEVEL";
pub const ENV_FFMPEG_PATH: &str = "MEDIACONV_FFMPEG_PATH";
pub const ENV_FFPROBE_PATH: &str = "MEDIACONV_FFPROBE_PATH";
pub const ENV_RESET_POLICY: &str = "MEDIACONV_RESET_POLICY";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingSettings,
    pub engine: EngineSettings,
    pub session: SessionSettings,
    pub output: OutputDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `mediaconv_cli=debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub reset_policy: ResetPolicy,
}

/// Defaults for the per-container output extras
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDefaults {
    pub hq_gif: bool,
    pub loop_output: bool,
}

impl Default for OutputDefaults {
    fn default() -> Self {
        Self {
            hq_gif: true,
            loop_output: true,
        }
    }
}

impl AppConfig {
    /// Load from an explicit file, else from [`DEFAULT_CONFIG_FILE`] if present,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        info!("Loading configuration from: {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Apply overrides looked up by environment variable name
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            debug!("Environment override: {} = {}", ENV_LOG_LEVEL, level);
            self.logging.level = level;
        }
        if let Some(path) = lookup(ENV_FFMPEG_PATH) {
            debug!("Environment override: {} = {}", ENV_FFMPEG_PATH, path);
            self.engine.ffmpeg_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_FFPROBE_PATH) {
            debug!("Environment override: {} = {}", ENV_FFPROBE_PATH, path);
            self.engine.ffprobe_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup(ENV_RESET_POLICY) {
            debug!("Environment override: {} = {}", ENV_RESET_POLICY, policy);
            self.session.reset_policy = policy.parse()?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        tracing_subscriber::EnvFilter::try_new(&self.logging.level).map_err(|e| {
            DomainError::Config(format!("Invalid log level '{}': {}", self.logging.level, e))
        })?;
        if self.engine.ffmpeg_path.as_os_str().is_empty() {
            return Err(DomainError::Config("engine.ffmpeg_path is empty".to_string()));
        }
        Ok(())
    }

    /// Output options a fresh conversion starts from
    pub fn default_output_options(&self) -> OutputOptions {
        OutputOptions {
            hq_gif: Some(self.output.hq_gif),
            loop_output: Some(self.output.loop_output),
            ..OutputOptions::empty()
        }
    }
}
